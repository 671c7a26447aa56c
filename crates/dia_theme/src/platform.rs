//! System color scheme detection

use crate::scheme::ColorScheme;

/// Explicit override, `light` or `dark`
pub const SCHEME_ENV: &str = "AURORA_DIA_COLOR_SCHEME";

/// Detect the system light/dark preference
///
/// Checks [`SCHEME_ENV`] first, then the GTK theme name. Falls back to
/// [`ColorScheme::Light`] when nothing conclusive is found.
pub fn detect_system_color_scheme() -> ColorScheme {
    scheme_from_env(|key| std::env::var(key).ok()).unwrap_or_default()
}

fn scheme_from_env<F>(lookup: F) -> Option<ColorScheme>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(SCHEME_ENV) {
        match raw.parse::<ColorScheme>() {
            Ok(scheme) => return Some(scheme),
            Err(err) => tracing::warn!("ignoring {}: {}", SCHEME_ENV, err),
        }
    }

    lookup("GTK_THEME").and_then(|name| scheme_from_theme_name(&name))
}

fn scheme_from_theme_name(theme_name: &str) -> Option<ColorScheme> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if normalized.contains("dark") {
        Some(ColorScheme::Dark)
    } else {
        Some(ColorScheme::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_explicit_override_wins() {
        let lookup = env(&[(SCHEME_ENV, "dark"), ("GTK_THEME", "Adwaita")]);
        assert_eq!(scheme_from_env(lookup), Some(ColorScheme::Dark));
    }

    #[test]
    fn test_gtk_theme_name() {
        assert_eq!(
            scheme_from_env(env(&[("GTK_THEME", "Adwaita:dark")])),
            Some(ColorScheme::Dark)
        );
        assert_eq!(
            scheme_from_env(env(&[("GTK_THEME", "Yaru")])),
            Some(ColorScheme::Light)
        );
    }

    #[test]
    fn test_invalid_override_falls_through() {
        let lookup = env(&[(SCHEME_ENV, "sepia"), ("GTK_THEME", "Breeze-Dark")]);
        assert_eq!(scheme_from_env(lookup), Some(ColorScheme::Dark));
    }

    #[test]
    fn test_nothing_set() {
        assert_eq!(scheme_from_env(env(&[])), None);
        assert_eq!(scheme_from_theme_name("  "), None);
    }
}
