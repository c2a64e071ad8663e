//! User configuration, read from `~/.bloqs.cfg`.
//!
//! The file is YAML. Any key it sets overrides the built-in default; keys it
//! leaves out keep theirs. `BLOQS_CONFIG` points at an alternative file.

use crate::error::BloqsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".bloqs.cfg";
pub const CONFIG_ENV_VAR: &str = "BLOQS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Root directory for [`publish`](crate::export::Exporter::publish).
    pub public_dir: PathBuf,
    /// Where intermediate HTML and format-only saves are written.
    pub tmp_html_dir: PathBuf,
    pub remove_temp_files: bool,
    /// `wkhtmltopdf` or `chrome_headless`.
    pub pdf_converter: String,
    pub image_converter: String,
    /// Number of block id characters used in generated file names.
    pub id_precision: usize,
    /// Browser binary used by the `chrome_headless` converter.
    pub chrome_executable: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            public_dir: std::env::temp_dir(),
            tmp_html_dir: std::env::temp_dir(),
            remove_temp_files: true,
            pdf_converter: "wkhtmltopdf".to_string(),
            image_converter: "wkhtmltoimage".to_string(),
            id_precision: 10,
            chrome_executable: "chromium".to_string(),
        }
    }
}

impl UserConfig {
    /// Loads the user's configuration file, falling back to defaults when
    /// there is none.
    pub fn load() -> Result<Self, BloqsError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads `path`. A missing file yields defaults, a malformed one an error.
    pub fn load_from(path: &Path) -> Result<Self, BloqsError> {
        if !path.exists() {
            log::debug!("No user config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!("Loaded user config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, BloqsError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Replaces a leading `~` with the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
