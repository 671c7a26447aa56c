//! Caller-supplied theme parameters
//!
//! Keys use snake_case (`dark_mode`, `header_gradient_css`,
//! `gradient.color_1`, ...). Missing keys take their value from
//! [`ThemeConfig::default`]. `gradient` and `header_gradient_css` may be set
//! to `null` explicitly, in which case the resolver falls back to empty
//! strings for the variables derived from them.

use crate::scheme::DarkMode;
use dia_core::{DiaError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered CSS property map (property name → value)
pub type StyleMap = IndexMap<String, String>;

/// Stock header gradient
pub const DEFAULT_HEADER_GRADIENT: &str =
    "linear-gradient(130deg, #24c6dc, #5433ff 41.07%, #ff0099 76.05%)";

/// Three-stop brand gradient (CSS color strings)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    #[serde(default)]
    pub color_1: String,
    #[serde(default)]
    pub color_2: String,
    #[serde(default)]
    pub color_3: String,
}

impl Gradient {
    pub fn new(
        color_1: impl Into<String>,
        color_2: impl Into<String>,
        color_3: impl Into<String>,
    ) -> Self {
        Self {
            color_1: color_1.into(),
            color_2: color_2.into(),
            color_3: color_3.into(),
        }
    }

    /// Vertical gradient from the second to the third stop (hover state)
    pub fn hover_css(&self) -> String {
        format!("linear-gradient(to bottom, {}, {})", self.color_2, self.color_3)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new("#24c6dc", "#5433ff", "#ff0099")
    }
}

/// Theme configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark_mode: DarkMode,
    pub profile_shape: String,
    pub feature: bool,
    pub gradient: Option<Gradient>,
    pub header_gradient_css: Option<String>,
    pub background_gradient_style: StyleMap,
}

impl ThemeConfig {
    /// Report the first missing sub-object, if any
    ///
    /// A missing piece is never fatal; the resolver substitutes empty
    /// strings. This exists so callers can log what was substituted.
    pub fn validate(&self) -> Result<()> {
        if self.gradient.is_none() {
            return Err(DiaError::InvalidThemeShape("gradient"));
        }
        if self.header_gradient_css.is_none() {
            return Err(DiaError::InvalidThemeShape("header_gradient_css"));
        }
        Ok(())
    }

    /// Text-clip style that paints text with the header gradient
    pub fn gradient_text_style(gradient_css: &str) -> StyleMap {
        let mut style = StyleMap::with_capacity(5);
        style.insert("background".into(), gradient_css.into());
        style.insert("-webkit-background-clip".into(), "text".into());
        style.insert("-webkit-text-fill-color".into(), "transparent".into());
        style.insert("-webkit-box-decoration-break".into(), "clone".into());
        style.insert("box-decoration-break".into(), "clone".into());
        style
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark_mode: DarkMode::Auto,
            profile_shape: "diamond".to_string(),
            feature: true,
            gradient: Some(Gradient::default()),
            header_gradient_css: Some(DEFAULT_HEADER_GRADIENT.to_string()),
            background_gradient_style: Self::gradient_text_style(DEFAULT_HEADER_GRADIENT),
        }
    }
}
