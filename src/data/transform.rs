use thiserror::Error;

use super::model::Series;

/// Relative tolerance used when comparing wavenumber grids.
pub const GRID_RTOL: f64 = 1e-5;
/// Absolute tolerance used when comparing wavenumber grids.
pub const GRID_ATOL: f64 = 1e-8;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("series has {found} rows but the reference has {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Divide every value by the first one.
///
/// A zero (or non-finite) first value yields non-finite output rather than
/// an error; the caller decides whether that matters.
pub fn normalize_to_first(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if first == 0.0 || !first.is_finite() {
        log::warn!("normalizing by first value {first}; result is not finite");
    }
    values.iter().map(|v| v / first).collect()
}

/// Normalize the dependent variable of a series, keeping its grid.
pub fn normalized(series: &Series) -> Series {
    Series {
        x: series.x.clone(),
        y: normalize_to_first(&series.y),
    }
}

// ---------------------------------------------------------------------------
// Ratios against a reference
// ---------------------------------------------------------------------------

/// Pointwise `series.y / reference.y`, plotted against `series.x`.
///
/// The grids are not compared here (see [`grids_match`]); no resampling is
/// done.
pub fn ratio_to_reference(series: &Series, reference: &Series) -> Result<Series, TransformError> {
    if series.len() != reference.len() {
        return Err(TransformError::LengthMismatch {
            expected: reference.len(),
            found: series.len(),
        });
    }
    let y = series
        .y
        .iter()
        .zip(&reference.y)
        .map(|(t, t_ref)| t / t_ref)
        .collect();
    Ok(Series {
        x: series.x.clone(),
        y,
    })
}

/// Whether two grids agree sample by sample within
/// `|a - b| <= GRID_ATOL + GRID_RTOL * |b|`.
pub fn grids_match(grid: &[f64], reference: &[f64]) -> bool {
    grid.len() == reference.len()
        && grid
            .iter()
            .zip(reference)
            .all(|(&a, &b)| (a - b).abs() <= GRID_ATOL + GRID_RTOL * b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(x: &[f64], y: &[f64]) -> Series {
        Series::new(x.to_vec(), y.to_vec()).unwrap()
    }

    #[test]
    fn normalized_first_value_is_exactly_one() {
        for col in [[3.7, 1.2, 0.4], [1e-12, 5e-13, 1e-14], [-2.0, -1.0, 0.5]] {
            let n = normalize_to_first(&col);
            assert_eq!(n[0], 1.0);
        }
    }

    #[test]
    fn normalized_scales_the_rest() {
        let n = normalized(&series(&[1.0, 2.0, 3.0], &[4.0, 2.0, 1.0]));
        assert_eq!(n.x, vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(n.y[1], 0.5);
        assert_relative_eq!(n.y[2], 0.25);
    }

    #[test]
    fn normalizing_by_zero_gives_non_finite() {
        let n = normalize_to_first(&[0.0, 1.0]);
        assert!(n[0].is_nan());
        assert!(n[1].is_infinite());
        assert!(normalize_to_first(&[]).is_empty());
    }

    #[test]
    fn ratio_against_itself_is_all_ones() {
        let s = series(&[0.01, 0.1, 1.0, 10.0], &[1.0, 0.8, 0.1, 1e-4]);
        let r = ratio_to_reference(&s, &s).unwrap();
        assert!(r.y.iter().all(|&v| v == 1.0));
        assert_eq!(r.x, s.x);
    }

    #[test]
    fn ratio_uses_comparison_grid() {
        let reference = series(&[1.0, 2.0], &[2.0, 4.0]);
        let other = series(&[1.5, 2.5], &[1.0, 1.0]);
        let r = ratio_to_reference(&other, &reference).unwrap();
        assert_eq!(r.x, vec![1.5, 2.5]);
        assert_relative_eq!(r.y[0], 0.5);
        assert_relative_eq!(r.y[1], 0.25);
    }

    #[test]
    fn ratio_length_mismatch_is_error() {
        let reference = series(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]);
        let other = series(&[1.0, 2.0], &[1.0, 1.0]);
        assert_eq!(
            ratio_to_reference(&other, &reference),
            Err(TransformError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn grid_comparison_tolerances() {
        let k = [1e-3, 1e-1, 10.0];
        assert!(grids_match(&k, &k));
        assert!(grids_match(&[1e-3, 1e-1, 10.0 * (1.0 + 5e-6)], &k));
        assert!(!grids_match(&[1e-3, 1e-1, 10.1], &k));
        assert!(!grids_match(&k[..2], &k));
    }
}
