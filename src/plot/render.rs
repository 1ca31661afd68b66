use anyhow::{bail, ensure, Result};
use plotters::chart::SeriesAnno;
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::IntoLogRange;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::backend::TextSafeBackend;
use super::fonts;
use super::style::{
    FigureSize, LineStyle, Marker, TraceStyle, AXIS_PT, GRID_PT, LABEL_PT, LEGEND_PT, TICK_PT,
    TITLE_PT,
};
use super::{Figure, Scale};
use crate::data::Series;

/// Render a figure into a packed RGB8 buffer.
pub(super) fn render_rgb(fig: &Figure) -> Result<(u32, u32, Vec<u8>)> {
    fonts::ensure_registered();

    let (width, height) = fig.size.pixels();
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    let segments: Vec<Vec<Vec<(f64, f64)>>> = fig
        .traces
        .iter()
        .map(|t| {
            plottable_segments(
                &t.series,
                fig.axes.x_scale,
                fig.axes.y_scale,
                fig.axes.x_limits,
            )
        })
        .collect();

    let x_bounds = match fig.axes.x_limits {
        Some(limits) => limits,
        None => padded_bounds(
            fig.axes.x_scale,
            extent(segments.iter().flatten().flatten().map(|p| p.0)),
        ),
    };
    let y_bounds = padded_bounds(
        fig.axes.y_scale,
        extent(
            segments
                .iter()
                .flatten()
                .flatten()
                .map(|p| p.1)
                .chain(fig.reference_lines.iter().map(|r| r.y))
                .filter(|&y| accepts(fig.axes.y_scale, y)),
        ),
    );
    log::debug!("axis bounds x={x_bounds:?} y={y_bounds:?}");
    check_bounds("x", fig.axes.x_scale, x_bounds)?;
    check_bounds("y", fig.axes.y_scale, y_bounds)?;

    {
        let backend = BitMapBackend::with_buffer(&mut pixels, (width, height));
        let root = TextSafeBackend::new(backend).into_drawing_area();
        root.fill(&WHITE)?;

        let (x0, x1) = x_bounds;
        let (y0, y1) = y_bounds;
        match (fig.axes.x_scale, fig.axes.y_scale) {
            (Scale::Linear, Scale::Linear) => {
                draw_chart(&root, fig, &segments, x_bounds, x0..x1, y0..y1)?
            }
            (Scale::Log, Scale::Linear) => {
                draw_chart(&root, fig, &segments, x_bounds, (x0..x1).log_scale(), y0..y1)?
            }
            (Scale::Linear, Scale::Log) => {
                draw_chart(&root, fig, &segments, x_bounds, x0..x1, (y0..y1).log_scale())?
            }
            (Scale::Log, Scale::Log) => draw_chart(
                &root,
                fig,
                &segments,
                x_bounds,
                (x0..x1).log_scale(),
                (y0..y1).log_scale(),
            )?,
        }
        root.present()?;
    }

    Ok((width, height, pixels))
}

fn font(size: &FigureSize, points: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size.pt(points), FontStyle::Normal)
}

fn draw_chart<DB, XS, YS>(
    root: &DrawingArea<DB, Shift>,
    fig: &Figure,
    segments: &[Vec<Vec<(f64, f64)>>],
    (x_lo, x_hi): (f64, f64),
    x_spec: XS,
    y_spec: YS,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    XS: AsRangedCoord<Value = f64>,
    YS: AsRangedCoord<Value = f64>,
    XS::CoordDescType: ValueFormatter<f64>,
    YS::CoordDescType: ValueFormatter<f64>,
{
    let size = &fig.size;
    let axes = &fig.axes;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(size.px(12.0))
        .x_label_area_size(size.px(30.0))
        .y_label_area_size(size.px(42.0));
    if let Some(title) = &axes.title {
        builder.caption(title, font(size, TITLE_PT));
    }
    let mut chart = builder.build_cartesian_2d(x_spec, y_spec)?;

    let tick = |v: &f64| format_tick(*v);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .label_style(font(size, TICK_PT))
        .axis_desc_style(font(size, LABEL_PT))
        .axis_style(BLACK.stroke_width(size.px(AXIS_PT)))
        .x_label_formatter(&tick)
        .y_label_formatter(&tick);
    if axes.grid {
        mesh.bold_line_style(BLACK.mix(0.15).stroke_width(size.px(GRID_PT)))
            .light_line_style(TRANSPARENT.stroke_width(1));
    } else {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    for line in &fig.reference_lines {
        let points = vec![(x_lo, line.y), (x_hi, line.y)];
        draw_line(&mut chart, points, &line.style, size)?;
    }

    for (trace, trace_segments) in fig.traces.iter().zip(segments) {
        let style = &trace.style;
        let shape = style.color.stroke_width(size.px(style.line_width_pt));

        // A trace with nothing drawable still gets its legend entry.
        let first = trace_segments.first().cloned().unwrap_or_default();
        let anno = draw_line(&mut chart, first, style, size)?;
        anno.label(trace.label.as_str());
        let handle = size.px(20.0) as i32;
        match (style.line, style.marker) {
            (LineStyle::Solid, Marker::None) => {
                anno.legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + handle, y)], shape)
                });
            }
            (LineStyle::Solid, Marker::HollowCircle) => {
                let r = size.px(style.marker_size_pt / 2.0);
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![(0, 0), (handle, 0)], shape)
                        + Circle::new((handle / 2, 0), r, shape)
                });
            }
            (LineStyle::Dashed, _) => {
                let dash = handle * 2 / 5;
                anno.legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![(0, 0), (dash, 0)], shape)
                        + PathElement::new(vec![(handle - dash, 0), (handle, 0)], shape)
                });
            }
        }

        for segment in trace_segments.iter().skip(1) {
            draw_line(&mut chart, segment.clone(), style, size)?;
        }

        if style.marker == Marker::HollowCircle {
            let r = size.px(style.marker_size_pt / 2.0);
            for segment in trace_segments {
                chart.draw_series(PointSeries::of_element(
                    segment.iter().copied(),
                    r,
                    shape,
                    &|c, s, st| EmptyElement::at(c) + Circle::new((0, 0), s, st),
                ))?;
            }
        }
    }

    if axes.legend && !fig.traces.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerLeft)
            .margin(size.px(6.0))
            .legend_area_size(size.px(24.0))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .label_font(font(size, LEGEND_PT))
            .draw()?;
    }

    Ok(())
}

/// Draw one connected polyline in the trace's line style.
fn draw_line<'a, 'b, DB, X, Y>(
    chart: &'b mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    points: Vec<(f64, f64)>,
    style: &TraceStyle,
    size: &FigureSize,
) -> Result<&'b mut SeriesAnno<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let shape = style.color.stroke_width(size.px(style.line_width_pt));
    let anno = match style.line {
        LineStyle::Solid => chart.draw_series(LineSeries::new(points, shape))?,
        LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(
            points,
            size.px(4.0 * style.line_width_pt),
            size.px(1.5 * style.line_width_pt),
            shape,
        ))?,
    };
    Ok(anno)
}

// ---------------------------------------------------------------------------
// Data preparation
// ---------------------------------------------------------------------------

fn accepts(scale: Scale, v: f64) -> bool {
    v.is_finite() && (scale == Scale::Linear || v > 0.0)
}

/// Split a series into runs of drawable points.
///
/// A point is dropped when either coordinate is not finite, is non-positive
/// on a log axis, or `x` falls outside `x_limits`; the line breaks there.
pub(crate) fn plottable_segments(
    series: &Series,
    x_scale: Scale,
    y_scale: Scale,
    x_limits: Option<(f64, f64)>,
) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (x, y) in series.points() {
        let in_limits = x_limits.map_or(true, |(lo, hi)| x >= lo && x <= hi);
        if accepts(x_scale, x) && accepts(y_scale, y) && in_limits {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Pad a data extent by 5% (in decades on a log axis).
pub(crate) fn padded_bounds(scale: Scale, extent: Option<(f64, f64)>) -> (f64, f64) {
    match (scale, extent) {
        (Scale::Linear, None) => (0.0, 1.0),
        (Scale::Log, None) => (1.0, 10.0),
        (Scale::Linear, Some((lo, hi))) => {
            let span = hi - lo;
            let pad = if span > 0.0 {
                0.05 * span
            } else {
                0.05 * lo.abs().max(1.0)
            };
            (lo - pad, hi + pad)
        }
        (Scale::Log, Some((lo, hi))) => {
            let (lo, hi) = (lo.log10(), hi.log10());
            let span = hi - lo;
            let pad = if span > 0.0 { 0.05 * span } else { 0.5 };
            (10f64.powf(lo - pad), 10f64.powf(hi + pad))
        }
    }
}

/// Largest magnitude allowed at either end of a log axis.
pub(crate) const LOG_AXIS_LIMIT: f64 = 1e300;
/// Widest log axis, in decades.
pub(crate) const MAX_LOG_DECADES: f64 = 250.0;

/// Reject axis ranges plotters cannot lay out: non-finite or empty ranges,
/// and log ranges that are too wide or too close to the f64 limits.
pub(crate) fn check_bounds(axis: &str, scale: Scale, (lo, hi): (f64, f64)) -> Result<()> {
    ensure!(
        lo.is_finite() && hi.is_finite() && lo < hi,
        "{axis} axis range [{lo:e}, {hi:e}] is not usable"
    );
    if scale == Scale::Log {
        if lo <= 0.0 {
            bail!("log {axis} axis needs positive limits, got [{lo:e}, {hi:e}]");
        }
        let decades = hi.log10() - lo.log10();
        ensure!(
            lo >= 1.0 / LOG_AXIS_LIMIT && hi <= LOG_AXIS_LIMIT && decades <= MAX_LOG_DECADES,
            "log {axis} axis range [{lo:e}, {hi:e}] spans {decades:.0} decades, \
             at most {MAX_LOG_DECADES} within [1e-300, 1e300] can be drawn"
        );
    }
    Ok(())
}

/// Compact tick text: plain decimals near unity, exponent form otherwise.
pub(crate) fn format_tick(v: f64) -> String {
    let a = v.abs();
    if v == 0.0 {
        "0".to_string()
    } else if (1e-3..1e4).contains(&a) {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        format!("{v:.0e}")
    }
}
