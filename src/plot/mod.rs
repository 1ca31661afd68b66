//! Figure description and PNG rendering.
//!
//! A [`Figure`] is plain data (axes, traces, reference lines); `render`
//! turns it into pixels with plotters and `save_png` encodes them.

pub mod backend;
pub mod fonts;
mod render;
pub mod style;

use std::path::Path;

use anyhow::{Context, Result};

use crate::data::Series;
pub use style::{FigureSize, LineStyle, Marker, TraceStyle};

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

/// Everything about a single coordinate system except the data.
#[derive(Debug, Clone)]
pub struct Axes {
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub x_label: String,
    pub y_label: String,
    pub title: Option<String>,
    /// Fixed x range; automatic from the data when `None`.
    pub x_limits: Option<(f64, f64)>,
    pub grid: bool,
    /// Series legend in the lower-left corner.
    pub legend: bool,
}

impl Axes {
    pub fn new(x_scale: Scale, y_scale: Scale) -> Self {
        Axes {
            x_scale,
            y_scale,
            x_label: String::new(),
            y_label: String::new(),
            title: None,
            x_limits: None,
            grid: false,
            legend: false,
        }
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn x_limits(mut self, lo: f64, hi: f64) -> Self {
        self.x_limits = Some((lo, hi));
        self
    }

    pub fn grid(mut self, on: bool) -> Self {
        self.grid = on;
        self
    }

    pub fn legend(mut self, on: bool) -> Self {
        self.legend = on;
        self
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Trace {
    pub label: String,
    pub series: Series,
    pub style: TraceStyle,
}

/// Horizontal line across the whole x range, never shown in the legend.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceLine {
    pub y: f64,
    pub style: TraceStyle,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub axes: Axes,
    pub traces: Vec<Trace>,
    pub reference_lines: Vec<ReferenceLine>,
    pub size: FigureSize,
}

impl Figure {
    pub fn new(axes: Axes) -> Self {
        Figure {
            axes,
            traces: Vec::new(),
            reference_lines: Vec::new(),
            size: FigureSize::default(),
        }
    }

    pub fn add_trace(&mut self, label: impl Into<String>, series: Series, style: TraceStyle) {
        self.traces.push(Trace {
            label: label.into(),
            series,
            style,
        });
    }

    pub fn add_reference_line(&mut self, y: f64, style: TraceStyle) {
        self.reference_lines.push(ReferenceLine { y, style });
    }

    /// Render and write a PNG, replacing any existing file at `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let (width, height, pixels) =
            render::render_rgb(self).with_context(|| format!("rendering {}", path.display()))?;
        let image = image::RgbImage::from_raw(width, height, pixels)
            .context("pixel buffer does not match canvas size")?;
        image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing {}", path.display()))?;

        log::info!(
            "wrote {} ({width}×{height} px at {} dpi)",
            path.display(),
            self.size.dpi
        );
        Ok(())
    }
}
