//! Scheme-dependent palette

use crate::scheme::ColorScheme;

/// Text and surface colors for one color scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemePalette {
    pub text_normal: &'static str,
    pub text_accent: &'static str,
    pub text_sub_accent: &'static str,
    pub background_secondary: &'static str,
}

impl SchemePalette {
    pub const LIGHT: SchemePalette = SchemePalette {
        text_normal: "#333333",
        text_accent: "#e93796",
        text_sub_accent: "#547ce7",
        background_secondary: "#ffffff",
    };

    pub const DARK: SchemePalette = SchemePalette {
        text_normal: "#bebebe",
        text_accent: "#0fb6d6",
        text_sub_accent: "#f4569d",
        background_secondary: "#212121",
    };

    pub const fn for_scheme(scheme: ColorScheme) -> SchemePalette {
        match scheme {
            ColorScheme::Light => Self::LIGHT,
            ColorScheme::Dark => Self::DARK,
        }
    }
}
