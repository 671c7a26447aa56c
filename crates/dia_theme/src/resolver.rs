//! Theme resolution
//!
//! [`resolve`] is pure: it reads its two inputs and builds a fresh
//! [`StyleVariableSet`]. It holds no state and can be called from anywhere.

use crate::config::{Gradient, ThemeConfig};
use crate::scheme::ColorScheme;
use crate::tokens::{SchemePalette, StyleVariable, StyleVariableSet};

/// Resolve the style variables for a theme under the given ambient scheme
///
/// `theme.dark_mode` is applied first, so a forced mode ignores `ambient`.
/// Missing gradient data resolves to empty strings.
pub fn resolve(theme: &ThemeConfig, ambient: ColorScheme) -> StyleVariableSet {
    let scheme = theme.dark_mode.effective(ambient);
    let palette = SchemePalette::for_scheme(scheme);
    let gradient = theme.gradient.as_ref();

    StyleVariableSet::from_fn(|var| match var {
        StyleVariable::LinearGradient => theme.header_gradient_css.clone().unwrap_or_default(),
        StyleVariable::LinearGradientHover => {
            gradient.map(Gradient::hover_css).unwrap_or_default()
        }
        StyleVariable::PlatformLight => gradient.map(|g| g.color_3.clone()).unwrap_or_default(),
        StyleVariable::TextNormal => palette.text_normal.to_string(),
        StyleVariable::TextAccent => palette.text_accent.to_string(),
        StyleVariable::TextSubAccent => palette.text_sub_accent.to_string(),
        StyleVariable::BackgroundSecondary => palette.background_secondary.to_string(),
    })
}
