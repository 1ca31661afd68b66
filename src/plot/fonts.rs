use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

/// Environment variable naming a TrueType file to use for all plot text.
pub const FONT_ENV: &str = "TF_COMPARE_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Register a sans-serif face with plotters, once per process.
///
/// Returns the file that was registered, or `None` when nothing usable was
/// found; plots are then drawn without text.
pub fn ensure_registered() -> Option<&'static Path> {
    REGISTERED.get_or_init(register_first_available).as_deref()
}

fn candidates() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = std::env::var_os(FONT_ENV)
        .map(PathBuf::from)
        .into_iter()
        .collect();
    paths.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
    paths
}

fn register_first_available() -> Option<PathBuf> {
    for path in candidates() {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        // plotters keeps registered faces for the life of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match register_font("sans-serif", FontStyle::Normal, bytes) {
            Ok(()) => {
                log::debug!("using font {}", path.display());
                return Some(path);
            }
            Err(_) => log::warn!("{} is not a usable TrueType font", path.display()),
        }
    }
    log::warn!("no TrueType font found (set {FONT_ENV}); plots will have no text");
    None
}
