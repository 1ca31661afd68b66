use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Colours
// ---------------------------------------------------------------------------

/// First colour of the usual scientific-plotting cycle.
pub const CYCLE_BLUE: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
/// Second colour of the cycle.
pub const CYCLE_ORANGE: RGBColor = RGBColor(0xff, 0x7f, 0x0e);

pub const PURE_BLUE: RGBColor = RGBColor(0, 0, 255);
pub const PURE_RED: RGBColor = RGBColor(255, 0, 0);
pub const REFERENCE_GREY: RGBColor = RGBColor(128, 128, 128);

// ---------------------------------------------------------------------------
// Typography and stroke sizes, in points
// ---------------------------------------------------------------------------

pub const TICK_PT: f64 = 10.0;
pub const LABEL_PT: f64 = 10.0;
pub const LEGEND_PT: f64 = 10.0;
pub const TITLE_PT: f64 = 12.0;
pub const LINE_PT: f64 = 1.5;
pub const AXIS_PT: f64 = 0.8;
pub const GRID_PT: f64 = 0.8;

// ---------------------------------------------------------------------------
// Trace styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    /// Unfilled circle drawn at every sample.
    HollowCircle,
}

/// How a single trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStyle {
    pub color: RGBColor,
    pub line: LineStyle,
    pub line_width_pt: f64,
    pub marker: Marker,
    /// Marker diameter.
    pub marker_size_pt: f64,
}

impl TraceStyle {
    pub fn solid(color: RGBColor) -> Self {
        TraceStyle {
            color,
            line: LineStyle::Solid,
            line_width_pt: LINE_PT,
            marker: Marker::None,
            marker_size_pt: 0.0,
        }
    }

    pub fn dashed(color: RGBColor) -> Self {
        TraceStyle {
            line: LineStyle::Dashed,
            ..Self::solid(color)
        }
    }

    pub fn with_marker(self, marker: Marker, size_pt: f64) -> Self {
        TraceStyle {
            marker,
            marker_size_pt: size_pt,
            ..self
        }
    }

    pub fn with_line_width(self, width_pt: f64) -> Self {
        TraceStyle {
            line_width_pt: width_pt,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas geometry
// ---------------------------------------------------------------------------

/// Physical figure size; the raster is `inches × dpi` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for FigureSize {
    fn default() -> Self {
        FigureSize {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 300,
        }
    }
}

impl FigureSize {
    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    /// Points to (fractional) pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    /// Points to whole pixels, never below one.
    pub fn px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canvas_is_300_dpi() {
        let size = FigureSize::default();
        assert_eq!(size.pixels(), (1920, 1440));
        assert_eq!(size.px(72.0), 300);
        assert_eq!(size.px(0.0), 1);
    }

    #[test]
    fn builders_keep_other_fields() {
        let s = TraceStyle::dashed(PURE_RED).with_marker(Marker::HollowCircle, 3.0);
        assert_eq!(s.line, LineStyle::Dashed);
        assert_eq!(s.color, PURE_RED);
        assert_eq!(s.marker, Marker::HollowCircle);
        assert_eq!(s.line_width_pt, LINE_PT);
    }
}
