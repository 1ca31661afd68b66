//! CosmicIC vs CLASS: columns 2 and 3 normalized to their first value,
//! one log-log figure per column.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};

use crate::data::transform::normalized;
use crate::data::{load_table, Series};
use crate::plot::style::{CYCLE_BLUE, CYCLE_ORANGE};
use crate::plot::{Axes, Figure, Marker, Scale, TraceStyle};

pub const FIG_COL2: &str = "fig1_col2.png";
pub const FIG_COL3: &str = "fig2_col3.png";

/// Columns used: k, and the two transfer functions.
const REQUIRED_COLUMNS: usize = 3;

#[derive(Parser, Debug)]
#[command(
    name = "TFCompare_CosmicIC_CLASS",
    about = "Compare normalized CosmicIC and CLASS transfer-function columns"
)]
pub struct Args {
    /// CosmicIC output table (k in column 1, transfer functions in 2 and 3)
    #[arg(long = "file_cosmicic", value_hint = ValueHint::FilePath)]
    pub file_cosmicic: PathBuf,

    /// CLASS output table with the same column layout
    #[arg(long = "file_class", value_hint = ValueHint::FilePath)]
    pub file_class: PathBuf,

    /// Directory the figures are written to
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub output_dir: PathBuf,
}

/// Columns 2 and 3 of one file, each divided by its first value.
#[derive(Debug, Clone)]
pub struct NormalizedColumns {
    pub col2: Series,
    pub col3: Series,
}

pub fn load_and_normalize(path: &Path) -> Result<NormalizedColumns> {
    let table = load_table(path, REQUIRED_COLUMNS)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(NormalizedColumns {
        col2: normalized(&table.series(0, 1)?),
        col3: normalized(&table.series(0, 2)?),
    })
}

/// Overlay of one normalized column from both codes.
pub fn column_figure(column: usize, cosmicic: &Series, class: &Series) -> Figure {
    let axes = Axes::new(Scale::Log, Scale::Log)
        .labels("Column 1", format!("Normalized Column {column}"))
        .legend(true);
    let mut fig = Figure::new(axes);
    fig.add_trace(
        "cosmicic",
        cosmicic.clone(),
        TraceStyle::solid(CYCLE_BLUE).with_marker(Marker::HollowCircle, 3.0),
    );
    fig.add_trace("class", class.clone(), TraceStyle::solid(CYCLE_ORANGE));
    fig
}

/// Load, normalize, and write both figures. Returns the files written.
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
    let cosmicic = load_and_normalize(&args.file_cosmicic)?;
    let class = load_and_normalize(&args.file_class)?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    let figures = [
        (FIG_COL2, column_figure(2, &cosmicic.col2, &class.col2)),
        (FIG_COL3, column_figure(3, &cosmicic.col3, &class.col3)),
    ];

    let mut written = Vec::with_capacity(figures.len());
    for (name, fig) in figures {
        let path = super::output_path(&args.output_dir, name);
        fig.save_png(&path)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadError;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn first_row_normalizes_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tf.txt",
            "1e-3 4.2e5 3.9e5\n1e-2 4.0e5 3.1e5\n1e-1 1.0e5 2.0e4\n",
        );
        let cols = load_and_normalize(&path).unwrap();
        assert_eq!(cols.col2.y[0], 1.0);
        assert_eq!(cols.col3.y[0], 1.0);
        assert_eq!(cols.col2.x, vec![1e-3, 1e-2, 1e-1]);
    }

    #[test]
    fn two_column_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "short.txt", "1 2\n3 4\n");
        let err = load_and_normalize(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::TooFewColumns { required: 3, .. })
        ));
    }

    #[test]
    fn figure_overlays_both_codes_on_log_axes() {
        let s = Series::new(vec![1.0, 2.0], vec![1.0, 0.5]).unwrap();
        let fig = column_figure(3, &s, &s);
        assert_eq!(fig.axes.x_scale, Scale::Log);
        assert_eq!(fig.axes.y_scale, Scale::Log);
        assert_eq!(fig.axes.y_label, "Normalized Column 3");
        let labels: Vec<_> = fig.traces.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["cosmicic", "class"]);
        assert_eq!(fig.traces[0].style.marker, Marker::HollowCircle);
        assert!(!fig.axes.grid);
    }

    #[test]
    fn args_use_underscore_flags() {
        let args = Args::try_parse_from([
            "TFCompare_CosmicIC_CLASS",
            "--file_cosmicic",
            "a.txt",
            "--file_class",
            "b.txt",
        ])
        .unwrap();
        assert_eq!(args.file_cosmicic, PathBuf::from("a.txt"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        let missing = Args::try_parse_from(["TFCompare_CosmicIC_CLASS", "--file_class", "b.txt"]);
        assert!(missing.is_err());
    }
}
