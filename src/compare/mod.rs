//! The two comparison programs, each as `Args` + `run`.
//!
//! ```text
//!   normalized   two 3-column tables → fig1_col2.png, fig2_col3.png
//!   ratio        LCDM + up to 4 models → TF_Compare_LCDM_WDM_FDM.png
//! ```
use std::path::{Path, PathBuf};

pub mod normalized;
pub mod ratio;

/// `dir/name`, or just `name` when writing to the working directory.
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    if dir.as_os_str().is_empty() || dir == Path::new(".") {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_directory_outputs_are_bare_names() {
        assert_eq!(output_path(Path::new("."), "a.png"), PathBuf::from("a.png"));
        assert_eq!(output_path(Path::new(""), "a.png"), PathBuf::from("a.png"));
        assert_eq!(output_path(Path::new("out"), "a.png"), Path::new("out").join("a.png"));
    }
}
