//! Font resolution for card text.
//!
//! Paths come from [`FontConfig`]. Anything left unset is looked up by file
//! name in the user font directory and the usual system font directories.

use ab_glyph::FontVec;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::Result;
use crate::api::models::WifiCardError;

/// Regular/bold file name pairs tried in order during discovery.
const KNOWN_FONTS: &[(&str, &str)] = &[
    ("FreeSans.ttf", "FreeSansBold.ttf"),
    ("DejaVuSans.ttf", "DejaVuSans-Bold.ttf"),
    ("LiberationSans-Regular.ttf", "LiberationSans-Bold.ttf"),
    ("Arial.ttf", "Arial Bold.ttf"),
];

/// Directories searched after the user font directory.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Maximum directory depth walked below each font root.
const MAX_DEPTH: usize = 4;

/// Font files to use for card text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontConfig {
    /// Regular weight font file
    pub regular: Option<PathBuf>,
    /// Bold weight font file
    pub bold: Option<PathBuf>,
}

impl FontConfig {
    /// Uses the given files for both weights.
    pub fn new(regular: impl Into<PathBuf>, bold: impl Into<PathBuf>) -> Self {
        Self {
            regular: Some(regular.into()),
            bold: Some(bold.into()),
        }
    }
}

/// Loaded regular and bold fonts.
pub struct CardFonts {
    pub(crate) regular: FontVec,
    pub(crate) bold: FontVec,
}

impl CardFonts {
    /// Loads the configured fonts, discovering any that are not set.
    ///
    /// If only one weight is found, it is used for both.
    ///
    /// # Errors
    ///
    /// Returns [`WifiCardError::FontUnavailable`] if no font file can be
    /// found or parsed, and [`WifiCardError::Io`] if a configured file
    /// cannot be read.
    pub fn load(config: &FontConfig) -> Result<Self> {
        let discovered = if config.regular.is_none() || config.bold.is_none() {
            discover()
        } else {
            (None, None)
        };

        let regular = config.regular.clone().or(discovered.0);
        let bold = config.bold.clone().or(discovered.1);

        let (regular, bold) = match (regular, bold) {
            (Some(r), Some(b)) => (r, b),
            (Some(one), None) | (None, Some(one)) => (one.clone(), one),
            (None, None) => {
                return Err(WifiCardError::FontUnavailable(format!(
                    "none of {} found in the user or system font directories",
                    KNOWN_FONTS
                        .iter()
                        .map(|(regular, _)| *regular)
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        };

        debug!(
            "Using fonts regular={} bold={}",
            regular.display(),
            bold.display()
        );

        Ok(Self {
            regular: read_font(&regular)?,
            bold: read_font(&bold)?,
        })
    }

    /// Discovers fonts without any configured paths.
    pub fn discover() -> Result<Self> {
        Self::load(&FontConfig::default())
    }
}

fn read_font(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)?;
    FontVec::try_from_vec(data)
        .map_err(|e| WifiCardError::FontUnavailable(format!("{}: {e}", path.display())))
}

fn font_roots() -> Vec<PathBuf> {
    dirs::font_dir()
        .into_iter()
        .chain(SYSTEM_FONT_DIRS.iter().map(PathBuf::from))
        .filter(|dir| dir.is_dir())
        .collect()
}

/// Finds the first known regular/bold pair, falling back to any single match.
fn discover() -> (Option<PathBuf>, Option<PathBuf>) {
    let roots = font_roots();
    let mut partial = (None, None);

    for (regular_name, bold_name) in KNOWN_FONTS {
        let regular = roots.iter().find_map(|root| find_file(root, regular_name));
        let bold = roots.iter().find_map(|root| find_file(root, bold_name));

        match (regular, bold) {
            (Some(r), Some(b)) => return (Some(r), Some(b)),
            (r, b) => {
                if partial.0.is_none() {
                    partial.0 = r;
                }
                if partial.1.is_none() {
                    partial.1 = b;
                }
            }
        }
    }

    debug!("Font discovery found only {partial:?}");
    partial
}

/// Finds `name` in `root` or up to `MAX_DEPTH` directories below it.
fn find_file(root: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .max_depth(MAX_DEPTH + 1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wifi-card-fonts-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn find_file_walks_subdirectories() {
        let root = scratch_dir("walk");
        let nested = root.join("truetype").join("freefont");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("FreeSans.ttf"), b"").unwrap();

        assert_eq!(
            find_file(&root, "FreeSans.ttf"),
            Some(nested.join("FreeSans.ttf"))
        );
        assert_eq!(find_file(&root, "Missing.ttf"), None);

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn find_file_respects_depth_limit() {
        let root = scratch_dir("depth");
        let mut deep = root.clone();
        for level in 0..=MAX_DEPTH {
            deep.push(format!("d{level}"));
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("Deep.ttf"), b"").unwrap();

        assert_eq!(find_file(&root, "Deep.ttf"), None);

        // One level up is still within reach.
        let reachable = deep.parent().unwrap().join("Reachable.ttf");
        fs::write(&reachable, b"").unwrap();
        assert_eq!(find_file(&root, "Reachable.ttf"), Some(reachable));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn invalid_font_file_is_rejected() {
        let root = scratch_dir("invalid");
        let path = root.join("Broken.ttf");
        fs::write(&path, b"not a font").unwrap();

        let config = FontConfig::new(&path, &path);
        assert!(matches!(
            CardFonts::load(&config),
            Err(WifiCardError::FontUnavailable(_))
        ));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_configured_font_is_io_error() {
        let path = std::env::temp_dir().join("wifi-card-no-such-font.ttf");
        let config = FontConfig::new(&path, &path);
        assert!(matches!(CardFonts::load(&config), Err(WifiCardError::Io(_))));
    }
}
