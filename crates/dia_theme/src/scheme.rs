//! Color scheme and dark-mode override

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Light or dark presentation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized scheme or dark-mode name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color scheme `{0}`")]
pub struct ParseSchemeError(pub String);

impl FromStr for ColorScheme {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(ParseSchemeError(s.to_string())),
        }
    }
}

/// Theme-level dark mode setting
///
/// `Light` and `Dark` force the scheme; `Auto` follows the ambient preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    #[default]
    Auto,
    Light,
    Dark,
}

impl DarkMode {
    /// The scheme to use given the ambient preference
    pub fn effective(self, ambient: ColorScheme) -> ColorScheme {
        match self {
            DarkMode::Auto => ambient,
            DarkMode::Light => ColorScheme::Light,
            DarkMode::Dark => ColorScheme::Dark,
        }
    }
}

impl FromStr for DarkMode {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DarkMode::Auto),
            "light" => Ok(DarkMode::Light),
            "dark" => Ok(DarkMode::Dark),
            _ => Err(ParseSchemeError(s.to_string())),
        }
    }
}
