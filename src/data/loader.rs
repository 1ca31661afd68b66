use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::Table;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}, line {line}: '{token}' is not a number", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{}, line {line}: expected {expected} columns, found {found}", path.display())]
    Ragged {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{} contains no data rows", path.display())]
    Empty { path: PathBuf },

    #[error("{} has {found} column(s), at least {required} required", path.display())]
    TooFewColumns {
        path: PathBuf,
        found: usize,
        required: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a whitespace-delimited numeric table and require `min_columns`.
///
/// `#` starts a comment; blank and comment-only lines are ignored.
pub fn load_table(path: &Path, min_columns: usize) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(&text, path)?;

    if table.n_columns() < min_columns {
        return Err(LoadError::TooFewColumns {
            path: path.to_path_buf(),
            found: table.n_columns(),
            required: min_columns,
        });
    }

    log::debug!(
        "loaded {}: {} rows × {} columns",
        path.display(),
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

/// Parse table text. `path` is only used to label errors.
pub fn parse_table(text: &str, path: &Path) -> Result<Table, LoadError> {
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let data = raw.split('#').next().unwrap_or("");
        let tokens: Vec<&str> = data.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        if columns.is_empty() {
            columns = vec![Vec::new(); tokens.len()];
        } else if tokens.len() != columns.len() {
            return Err(LoadError::Ragged {
                path: path.to_path_buf(),
                line: line_no,
                expected: columns.len(),
                found: tokens.len(),
            });
        }

        for (col, tok) in columns.iter_mut().zip(&tokens) {
            let value = tok.parse::<f64>().map_err(|_| LoadError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                token: tok.to_string(),
            })?;
            col.push(value);
        }
    }

    if columns.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(Table::from_columns(path, columns))
}

/// Write equal-length columns in the format [`load_table`] reads.
pub fn save_table(path: &Path, header: Option<&str>, columns: &[&[f64]]) -> Result<()> {
    let n_rows = columns.first().map_or(0, |c| c.len());
    if let Some(bad) = columns.iter().position(|c| c.len() != n_rows) {
        anyhow::bail!(
            "column {} has {} values, expected {n_rows}",
            bad + 1,
            columns[bad].len()
        );
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    if let Some(header) = header {
        writeln!(out, "# {header}")?;
    }
    for row in 0..n_rows {
        let line: Vec<String> = columns.iter().map(|c| format!("{:.8e}", c[row])).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
