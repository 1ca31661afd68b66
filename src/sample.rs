//! Synthetic transfer-function tables from standard fitting formulae.
//!
//! Wavenumbers are in h/Mpc throughout.

use std::f64::consts::LN_10;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::loader::save_table;

pub const OMEGA_M: f64 = 0.31;
pub const HUBBLE_H: f64 = 0.68;

/// `n` points spaced evenly in log10 between `k_min` and `k_max`.
pub fn log_grid(k_min: f64, k_max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![k_min],
        _ => {
            let (a, b) = (k_min.log10(), k_max.log10());
            let step = (b - a) / (n - 1) as f64;
            (0..n).map(|i| ((a + step * i as f64) * LN_10).exp()).collect()
        }
    }
}

/// Bardeen, Bond, Kaiser & Szalay (1986) CDM transfer function.
pub fn bbks(k: f64) -> f64 {
    let q = k / (OMEGA_M * HUBBLE_H);
    if q < 1e-8 {
        return 1.0;
    }
    let poly = 1.0 + 3.89 * q + (16.1 * q).powi(2) + (5.46 * q).powi(3) + (6.71 * q).powi(4);
    (1.0 + 2.34 * q).ln() / (2.34 * q) * poly.powf(-0.25)
}

/// Thermal-relic WDM suppression relative to CDM (Viel et al. 2005).
pub fn wdm_suppression(k: f64, mass_kev: f64) -> f64 {
    const NU: f64 = 1.12;
    let alpha = 0.049
        * mass_kev.powf(-1.11)
        * (OMEGA_M / 0.25).powf(0.11)
        * (HUBBLE_H / 0.7).powf(1.22);
    (1.0 + (alpha * k).powf(2.0 * NU)).powf(-5.0 / NU)
}

/// Ultralight-axion suppression relative to CDM (Hu, Barkana & Gruzinov
/// 2000). `mass_ev` is the particle mass in eV.
pub fn fdm_suppression(k: f64, mass_ev: f64) -> f64 {
    let m22 = mass_ev / 1e-22;
    let k_jeq = 9.0 * m22.sqrt(); // 1/Mpc
    let x = 1.61 * m22.powf(1.0 / 18.0) * (k * HUBBLE_H) / k_jeq;
    (x.powi(3)).cos() / (1.0 + x.powi(8))
}

/// Baryons trail the CDM on small scales; a simple filtering form.
fn baryon_filter(k: f64, k_filter: f64) -> f64 {
    1.0 / (1.0 + (k / k_filter).powi(2))
}

// ---------------------------------------------------------------------------
// Writing sample files
// ---------------------------------------------------------------------------

pub const K_MIN: f64 = 1e-3;
pub const K_MAX: f64 = 1e3;
pub const N_K: usize = 400;

/// Write every sample table into `dir` and return their paths.
///
/// The two three-column files mimic two Boltzmann codes that disagree in
/// overall normalization and slightly in shape.
pub fn write_all(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let k = log_grid(K_MIN, K_MAX, N_K);
    let cdm: Vec<f64> = k.iter().map(|&k| bbks(k)).collect();
    let mut written = Vec::new();

    let mut three_col = |name: &str, amplitude: f64, tilt: f64, k_filter: f64| -> Result<()> {
        let c: Vec<f64> = k
            .iter()
            .zip(&cdm)
            .map(|(&k, &t)| amplitude * t * (1.0 + tilt * k.ln()))
            .collect();
        let b: Vec<f64> = k
            .iter()
            .zip(&c)
            .map(|(&k, &t)| t * baryon_filter(k, k_filter))
            .collect();
        let path = dir.join(name);
        save_table(&path, Some("k [h/Mpc]  T_cdm  T_b"), &[&k, &c, &b])?;
        written.push(path);
        Ok(())
    };
    three_col("cosmicic.txt", 3.1e5, 0.0, 60.0)?;
    three_col("class.txt", 1.0, 0.002, 55.0)?;

    let two_col: [(&str, Box<dyn Fn(f64) -> f64>); 5] = [
        ("lcdm.txt", Box::new(|_: f64| 1.0)),
        ("wdm_0.85keV.txt", Box::new(|k| wdm_suppression(k, 0.85))),
        ("wdm_2.1keV.txt", Box::new(|k| wdm_suppression(k, 2.1))),
        ("fdm_1e-22eV.txt", Box::new(|k| fdm_suppression(k, 1e-22))),
        ("fdm_1e-21eV.txt", Box::new(|k| fdm_suppression(k, 1e-21))),
    ];
    for (name, suppression) in two_col {
        let t: Vec<f64> = k.iter().zip(&cdm).map(|(&k, &t)| t * suppression(k)).collect();
        let path = dir.join(name);
        save_table(&path, Some("k [h/Mpc]  T"), &[&k, &t])?;
        written.push(path);
    }

    log::info!("wrote {} sample tables to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn grid_is_log_spaced_with_exact_ends() {
        let k = log_grid(1e-3, 1e3, 7);
        assert_eq!(k.len(), 7);
        for (i, v) in k.iter().enumerate() {
            assert_relative_eq!(v.log10(), -3.0 + i as f64, epsilon = 1e-12);
        }
        assert!(log_grid(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn bbks_is_unity_on_large_scales_and_falls() {
        assert_relative_eq!(bbks(1e-6), 1.0, epsilon = 1e-3);
        assert!(bbks(1.0) < bbks(0.1));
        assert!(bbks(10.0) < 1e-2);
    }

    #[test]
    fn lighter_wdm_suppresses_more() {
        assert_relative_eq!(wdm_suppression(1e-3, 0.85), 1.0, epsilon = 1e-4);
        assert!(wdm_suppression(10.0, 0.85) < wdm_suppression(10.0, 2.1));
        assert!(wdm_suppression(100.0, 0.85) < 1e-3);
    }

    #[test]
    fn fdm_cuts_off_earlier_for_lighter_mass() {
        assert_relative_eq!(fdm_suppression(1e-3, 1e-22), 1.0, epsilon = 1e-6);
        assert!(fdm_suppression(10.0, 1e-22).abs() < fdm_suppression(10.0, 1e-21).abs());
    }

    #[test]
    fn write_all_produces_loadable_tables() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_all(dir.path()).unwrap();
        assert_eq!(files.len(), 7);

        let cosmicic = crate::data::load_table(&dir.path().join("cosmicic.txt"), 3).unwrap();
        assert_eq!(cosmicic.n_rows(), N_K);
        let lcdm = crate::data::load_table(&dir.path().join("lcdm.txt"), 2).unwrap();
        assert_eq!(lcdm.n_columns(), 2);
    }
}
