use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings read from `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub font: Option<PathBuf>,
    pub font_bold: Option<PathBuf>,
    pub box_size: Option<u32>,
    pub draw_border: Option<bool>,
    pub width_used_by_qr_image: Option<f32>,
}

fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push("wifi-card");
        path.push("config.json");
        path
    })
}

/// Loads `explicit` if given, otherwise the per-user config file.
///
/// A missing per-user file yields defaults. A missing explicit file, or a
/// file that does not parse, is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match get_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound && explicit.is_none() => {
            log::debug!("No config file at {}", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading config {}", path.display()));
        }
    };

    parse_config(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn parse_config(text: &str) -> Result<Config> {
    let config: Config = serde_json::from_str(text)?;
    if let Some(ratio) = config.width_used_by_qr_image {
        ensure!(
            ratio > 0.0 && ratio <= 1.0,
            "width_used_by_qr_image must be in (0, 1], got {ratio}"
        );
    }
    Ok(config)
}
