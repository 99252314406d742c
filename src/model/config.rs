use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Configuration from config.toml. Every table is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding per-user board files (default: `<data dir>/boards`)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Start new users with the sample board instead of an empty one
    #[serde(default = "default_true")]
    pub seed_sample: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig { seed_sample: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Saved theme preference; absent means "follow the terminal".
    /// Matched case-insensitively; anything unrecognised is ignored.
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Option<ThemeMode>,
}

fn lenient_theme<'de, D>(deserializer: D) -> Result<Option<ThemeMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<toml::Value>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.as_str().map(str::parse::<ThemeMode>) {
        Some(Ok(mode)) => Ok(Some(mode)),
        _ => {
            tracing::warn!(value = %raw, "ignoring unknown theme in config");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter directive (overridden by `KB_LOG`)
    #[serde(default)]
    pub level: Option<String>,
}

/// Light or dark colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("unknown theme '{}' (expected light or dark)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.storage.dir.is_none());
        assert!(config.board.seed_sample);
        assert!(config.ui.theme.is_none());
        assert!(config.log.level.is_none());
    }

    #[test]
    fn full_config() {
        let config: Config = toml::from_str(
            r#"
[storage]
dir = "/tmp/boards"

[board]
seed_sample = false

[ui]
theme = "dark"

[log]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.dir, Some(PathBuf::from("/tmp/boards")));
        assert!(!config.board.seed_sample);
        assert_eq!(config.ui.theme, Some(ThemeMode::Dark));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
    }

    #[test]
    fn theme_toggle_and_parse() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!("DARK".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn config_theme_is_case_insensitive() {
        let config: Config = toml::from_str("[ui]\ntheme = \"Dark\"\n").unwrap();
        assert_eq!(config.ui.theme, Some(ThemeMode::Dark));
    }

    #[test]
    fn unknown_config_theme_falls_back_to_system() {
        for body in ["[ui]\ntheme = \"purple\"\n", "[ui]\ntheme = 3\n"] {
            let config: Config = toml::from_str(body).unwrap();
            assert!(config.ui.theme.is_none(), "{body}");
        }
    }
}
