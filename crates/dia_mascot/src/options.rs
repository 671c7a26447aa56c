//! Mascot options
//!
//! Everything a host can tune, loadable from TOML or JSON. Every key is
//! optional:
//!
//! ```toml
//! position = "right"
//! locale = "en-US"
//! visibility_delay_ms = 1000
//!
//! [tracker]
//! idle_timeout_ms = 2000
//!
//! [theme]
//! dark_mode = "auto"
//! ```

use crate::placement::Position;
use crate::tracker::TrackerConfig;
use dia_theme::ThemeConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Delay between activation and the mascot becoming visible
pub const DEFAULT_VISIBILITY_DELAY_MS: u64 = 1000;

/// Errors loading [`MascotOptions`]
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML options: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MascotOptions {
    pub position: Position,
    pub locale: String,
    pub visibility_delay_ms: u64,
    pub tracker: TrackerConfig,
    pub theme: ThemeConfig,
}

impl MascotOptions {
    pub fn from_toml_str(src: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(src)?)
    }

    pub fn from_json_str(src: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as TOML
    pub fn from_path(path: &Path) -> Result<Self, OptionsError> {
        let raw = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_toml_str(&raw)
        }
    }
}

impl Default for MascotOptions {
    fn default() -> Self {
        Self {
            position: Position::Left,
            locale: "zh-CN".to_string(),
            visibility_delay_ms: DEFAULT_VISIBILITY_DELAY_MS,
            tracker: TrackerConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dia_theme::DarkMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(MascotOptions::from_toml_str("").unwrap(), MascotOptions::default());
    }

    #[test]
    fn test_toml_overrides() {
        let options = MascotOptions::from_toml_str(
            r#"
            position = "right"
            locale = "en-US"

            [tracker]
            idle_timeout_ms = 500

            [theme]
            dark_mode = "dark"
            "#,
        )
        .unwrap();

        assert_eq!(options.position, Position::Right);
        assert_eq!(options.locale, "en-US");
        assert_eq!(options.tracker.idle_timeout_ms, 500);
        assert_eq!(options.tracker.divisor_x, 100.0);
        assert_eq!(options.theme.dark_mode, DarkMode::Dark);
        assert_eq!(options.visibility_delay_ms, DEFAULT_VISIBILITY_DELAY_MS);
    }

    #[test]
    fn test_json_options() {
        let options =
            MascotOptions::from_json_str(r#"{ "visibility_delay_ms": 250, "theme": { "gradient": null } }"#)
                .unwrap();
        assert_eq!(options.visibility_delay_ms, 250);
        assert_eq!(options.theme.gradient, None);
    }

    #[test]
    fn test_bad_input_reports_format() {
        let err = MascotOptions::from_toml_str("position = 3").unwrap_err();
        assert!(matches!(err, OptionsError::Toml(_)));
        assert!(err.to_string().starts_with("invalid TOML options"));
    }

    #[test]
    fn test_missing_file() {
        let err = MascotOptions::from_path(Path::new("/nonexistent/aurora-dia.toml")).unwrap_err();
        assert!(matches!(err, OptionsError::Io { .. }));
    }
}
