//! Warm and fuzzy dark matter transfer functions as ratios to ΛCDM on a
//! semilog-x axis.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use thiserror::Error;

use crate::data::transform::{grids_match, ratio_to_reference, TransformError};
use crate::data::{load_table, LoadError, Series};
use crate::plot::style::{PURE_BLUE, PURE_RED, REFERENCE_GREY};
use crate::plot::{Axes, Figure, Scale, TraceStyle};

pub const OUTPUT_FILE: &str = "TF_Compare_LCDM_WDM_FDM.png";
pub const K_LIMITS: (f64, f64) = (0.01, 100.0);

const REQUIRED_COLUMNS: usize = 2;

#[derive(Parser, Debug, Default)]
#[command(
    name = "TFCompare_LCDM_FDM_WDM",
    about = "Plot transfer function ratios relative to LCDM."
)]
pub struct Args {
    /// Warm dark matter, 0.85 keV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file_wdm1: Option<PathBuf>,

    /// Warm dark matter, 2.1 keV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file_wdm2: Option<PathBuf>,

    /// Fuzzy dark matter, 1e-22 eV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file_fdm1: Option<PathBuf>,

    /// Fuzzy dark matter, 1e-21 eV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file_fdm2: Option<PathBuf>,

    /// ΛCDM reference every other file is divided by
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file_lcdm: Option<PathBuf>,

    /// Directory the figure is written to
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub output_dir: PathBuf,
}

impl Args {
    /// Supplied comparison files in drawing order.
    pub fn comparisons(&self) -> Vec<(Model, &Path)> {
        Model::ALL
            .into_iter()
            .filter_map(|m| {
                let path = match m {
                    Model::Wdm1 => &self.file_wdm1,
                    Model::Wdm2 => &self.file_wdm2,
                    Model::Fdm1 => &self.file_fdm1,
                    Model::Fdm2 => &self.file_fdm2,
                };
                path.as_deref().map(|p| (m, p))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Wdm1,
    Wdm2,
    Fdm1,
    Fdm2,
}

impl Model {
    pub const ALL: [Model; 4] = [Model::Wdm1, Model::Wdm2, Model::Fdm1, Model::Fdm2];

    pub fn label(self) -> &'static str {
        match self {
            Model::Wdm1 => "m_WDM = 0.85 keV",
            Model::Wdm2 => "m_WDM = 2.1 keV",
            Model::Fdm1 => "m_FDM = 10⁻²² eV",
            Model::Fdm2 => "m_FDM = 10⁻²¹ eV",
        }
    }

    /// WDM in blue, FDM in red; the heavier particle of each pair dashed.
    pub fn style(self) -> TraceStyle {
        match self {
            Model::Wdm1 => TraceStyle::solid(PURE_BLUE),
            Model::Wdm2 => TraceStyle::dashed(PURE_BLUE),
            Model::Fdm1 => TraceStyle::solid(PURE_RED),
            Model::Fdm2 => TraceStyle::dashed(PURE_RED),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that end the program with status 1.
#[derive(Debug, Error)]
pub enum RatioError {
    #[error("You must provide --file-lcdm to compute ratios.")]
    MissingReference,

    #[error("File {} must contain at least two columns.", path.display())]
    TooFewColumns { path: PathBuf },

    #[error("Error loading file {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("Cannot divide {} by LCDM", path.display())]
    Ratio {
        path: PathBuf,
        #[source]
        source: TransformError,
    },
}

/// Load a `(k, T)` pair from the first two columns.
///
/// A single data row does not count as a two-dimensional table and is
/// rejected like a single column.
pub fn load_series(path: &Path) -> Result<Series, RatioError> {
    let table = load_table(path, REQUIRED_COLUMNS).map_err(|e| match e {
        LoadError::TooFewColumns { path, .. } => RatioError::TooFewColumns { path },
        other => RatioError::Load {
            path: path.to_path_buf(),
            source: other,
        },
    })?;
    if table.n_rows() < 2 {
        return Err(RatioError::TooFewColumns {
            path: path.to_path_buf(),
        });
    }
    let k = table.column(0).unwrap_or_default().to_vec();
    let t = table.column(1).unwrap_or_default().to_vec();
    Ok(Series { x: k, y: t })
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// A comparison series divided by the reference.
#[derive(Debug, Clone)]
pub struct RatioCurve {
    pub model: Model,
    pub source: PathBuf,
    pub ratio: Series,
    /// The file's k grid differs from the reference grid.
    pub grid_mismatch: bool,
}

pub fn ratio_curve(model: Model, path: &Path, reference: &Series) -> Result<RatioCurve, RatioError> {
    let series = load_series(path)?;
    let grid_mismatch = !grids_match(&series.x, &reference.x);
    let ratio = ratio_to_reference(&series, reference).map_err(|source| RatioError::Ratio {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RatioCurve {
        model,
        source: path.to_path_buf(),
        ratio,
        grid_mismatch,
    })
}

pub fn ratio_figure(curves: &[RatioCurve]) -> Figure {
    let axes = Axes::new(Scale::Log, Scale::Linear)
        .labels("Wavenumber k", "T(k) / T_ΛCDM(k)")
        .title("Transfer Function Ratios Relative to ΛCDM")
        .x_limits(K_LIMITS.0, K_LIMITS.1)
        .grid(true)
        .legend(true);
    let mut fig = Figure::new(axes);
    fig.add_reference_line(1.0, TraceStyle::dashed(REFERENCE_GREY).with_line_width(0.8));
    for curve in curves {
        fig.add_trace(curve.model.label(), curve.ratio.clone(), curve.model.style());
    }
    fig
}

/// Compute every supplied ratio and write the figure; returns its path.
///
/// Grid mismatches are reported on stderr as they are found and do not stop
/// the run.
pub fn run(args: &Args) -> Result<PathBuf> {
    let lcdm = args
        .file_lcdm
        .as_deref()
        .ok_or(RatioError::MissingReference)?;
    let reference = load_series(lcdm)?;
    log::info!("reference {}: {} k samples", lcdm.display(), reference.len());

    let mut curves = Vec::new();
    for (model, path) in args.comparisons() {
        let curve = ratio_curve(model, path, &reference)?;
        if curve.grid_mismatch {
            eprintln!(
                "Warning: k values in {} do not exactly match LCDM.",
                curve.source.display()
            );
        }
        curves.push(curve);
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let output = super::output_path(&args.output_dir, OUTPUT_FILE);
    ratio_figure(&curves).save_png(&output)?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    const LCDM: &str = "0.01 1.0\n0.1 0.9\n1.0 0.5\n10.0 0.1\n";

    #[test]
    fn comparisons_keep_fixed_order() {
        let args = Args {
            file_fdm2: Some("d".into()),
            file_wdm1: Some("a".into()),
            ..Args::default()
        };
        let models: Vec<Model> = args.comparisons().into_iter().map(|(m, _)| m).collect();
        assert_eq!(models, [Model::Wdm1, Model::Fdm2]);
    }

    #[test]
    fn same_file_gives_unit_ratio_without_warning() {
        let dir = tempfile::tempdir().unwrap();
        let lcdm = write(dir.path(), "lcdm.txt", LCDM);
        let reference = load_series(&lcdm).unwrap();

        let curve = ratio_curve(Model::Wdm1, &lcdm, &reference).unwrap();
        assert!(!curve.grid_mismatch);
        assert!(curve.ratio.y.iter().all(|&r| r == 1.0));
    }

    #[test]
    fn shifted_grid_is_flagged_but_computed() {
        let dir = tempfile::tempdir().unwrap();
        let lcdm = write(dir.path(), "lcdm.txt", LCDM);
        let wdm = write(dir.path(), "wdm.txt", "0.02 0.5\n0.2 0.45\n2.0 0.1\n20.0 0.01\n");
        let reference = load_series(&lcdm).unwrap();

        let curve = ratio_curve(Model::Wdm2, &wdm, &reference).unwrap();
        assert!(curve.grid_mismatch);
        assert_eq!(curve.ratio.x, vec![0.02, 0.2, 2.0, 20.0]);
        assert_eq!(curve.ratio.y[0], 0.5);
    }

    #[test]
    fn one_column_file_reports_column_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "one.txt", "1\n2\n");
        let err = load_series(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("File {} must contain at least two columns.", path.display())
        );
    }

    #[test]
    fn single_row_file_is_rejected_as_too_few_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "one_row.txt", "# k T\n0.01 1.0\n");
        let err = load_series(&path).unwrap_err();
        assert!(matches!(err, RatioError::TooFewColumns { .. }));
        assert_eq!(
            err.to_string(),
            format!("File {} must contain at least two columns.", path.display())
        );
    }

    #[test]
    fn unreadable_file_reports_load_error() {
        let err = load_series(Path::new("/nonexistent/lcdm.txt")).unwrap_err();
        assert!(matches!(err, RatioError::Load { .. }));
        assert!(err.to_string().starts_with("Error loading file /nonexistent/lcdm.txt"));
    }

    #[test]
    fn row_count_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let lcdm = write(dir.path(), "lcdm.txt", LCDM);
        let short = write(dir.path(), "short.txt", "0.01 1.0\n0.1 0.9\n");
        let reference = load_series(&lcdm).unwrap();
        assert!(matches!(
            ratio_curve(Model::Fdm1, &short, &reference),
            Err(RatioError::Ratio { .. })
        ));
    }

    #[test]
    fn missing_reference_is_reported() {
        let err = run(&Args::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatioError>(),
            Some(RatioError::MissingReference)
        ));
    }

    #[test]
    fn figure_has_fixed_range_grid_and_styles() {
        let s = Series::new(vec![0.01, 1.0], vec![1.0, 0.5]).unwrap();
        let curves: Vec<RatioCurve> = Model::ALL
            .into_iter()
            .map(|model| RatioCurve {
                model,
                source: PathBuf::from("x"),
                ratio: s.clone(),
                grid_mismatch: false,
            })
            .collect();
        let fig = ratio_figure(&curves);
        assert_eq!(fig.axes.x_limits, Some(K_LIMITS));
        assert_eq!((fig.axes.x_scale, fig.axes.y_scale), (Scale::Log, Scale::Linear));
        assert!(fig.axes.grid);
        assert_eq!(fig.reference_lines.len(), 1);
        assert_eq!(fig.reference_lines[0].y, 1.0);
        let styles: Vec<_> = fig.traces.iter().map(|t| (t.style.color, t.style.line)).collect();
        use crate::plot::LineStyle::{Dashed, Solid};
        assert_eq!(
            styles,
            [(PURE_BLUE, Solid), (PURE_BLUE, Dashed), (PURE_RED, Solid), (PURE_RED, Dashed)]
        );
    }

    #[test]
    fn run_writes_figure() {
        let dir = tempfile::tempdir().unwrap();
        let lcdm = write(dir.path(), "lcdm.txt", LCDM);
        let args = Args {
            file_lcdm: Some(lcdm.clone()),
            file_wdm1: Some(lcdm),
            output_dir: dir.path().join("out"),
            ..Args::default()
        };
        let output = run(&args).unwrap();
        assert_eq!(output, dir.path().join("out").join(OUTPUT_FILE));
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
