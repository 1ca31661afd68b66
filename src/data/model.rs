use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

// ---------------------------------------------------------------------------
// Table – one parsed input file
// ---------------------------------------------------------------------------

/// A rectangular numeric table, stored column-major.
///
/// Every column has the same length and there is at least one row; the
/// loader refuses to build anything else.
#[derive(Debug, Clone)]
pub struct Table {
    /// File the table was read from (used in error messages).
    pub source: PathBuf,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Build a table from already-validated columns.
    pub(crate) fn from_columns(source: &Path, columns: Vec<Vec<f64>>) -> Self {
        Table {
            source: source.to_path_buf(),
            columns,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Borrow column `idx` (0-based).
    pub fn column(&self, idx: usize) -> Option<&[f64]> {
        self.columns.get(idx).map(Vec::as_slice)
    }

    /// Pair two columns into a [`Series`].
    pub fn series(&self, x_col: usize, y_col: usize) -> Result<Series> {
        let (Some(x), Some(y)) = (self.column(x_col), self.column(y_col)) else {
            bail!(
                "{}: requested columns {} and {} but the table has {}",
                self.source.display(),
                x_col + 1,
                y_col + 1,
                self.n_columns()
            );
        };
        Series::new(x.to_vec(), y.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Series – (independent, dependent) pair
// ---------------------------------------------------------------------------

/// An ordered pair of equal-length sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Independent variable (the wavenumber k for transfer functions).
    pub x: Vec<f64>,
    /// Dependent variable – same length as `x`.
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            bail!("x has {} values but y has {}", x.len(), y.len());
        }
        Ok(Series { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate over `(x, y)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}
