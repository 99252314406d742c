use std::fs;
use std::path::{Path, PathBuf};

use crate::io::atomic::atomic_write;
use crate::model::config::{Config, ThemeMode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config {path}: {source}")]
    Document {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read text of the config file; a missing file is empty
fn read_text(path: &Path) -> Result<String, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read config.toml. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = read_text(path)?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read config.toml as a toml_edit document for round-trip-safe editing
pub fn read_config_doc(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let text = read_text(path)?;
    text.parse().map_err(|source| ConfigError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the document back, preserving formatting and comments
pub fn write_config_doc(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(path, doc.to_string().as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Set `[ui] theme` in the document
pub fn set_theme(doc: &mut toml_edit::DocumentMut, theme: ThemeMode) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["theme"] = toml_edit::value(theme.as_str());
}

// ---------------------------------------------------------------------------
// Theme preference
// ---------------------------------------------------------------------------

/// The terminal's light/dark preference, from `COLORFGBG`
pub fn system_theme() -> ThemeMode {
    theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). Background colours
/// 0-6 and 8 are dark; anything else, or no value, is light.
pub fn theme_from_colorfgbg(value: Option<&str>) -> ThemeMode {
    let bg = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match bg {
        Some(0..=6 | 8) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// Persisted light/dark preference in `[ui] theme`
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        ThemeStore {
            path: config_file.into(),
        }
    }

    /// Saved preference, if any. An unreadable config counts as unset.
    pub fn load(&self) -> Option<ThemeMode> {
        match read_config(&self.path) {
            Ok(config) => config.ui.theme,
            Err(e) => {
                tracing::warn!(error = %e, "could not read theme preference");
                None
            }
        }
    }

    pub fn save(&self, theme: ThemeMode) -> Result<(), ConfigError> {
        let mut doc = read_config_doc(&self.path)?;
        set_theme(&mut doc, theme);
        write_config_doc(&self.path, &doc)?;
        tracing::debug!(theme = theme.as_str(), "saved theme preference");
        Ok(())
    }

    /// Saved preference, else the system preference
    pub fn effective(&self) -> ThemeMode {
        self.load().unwrap_or_else(system_theme)
    }
}
