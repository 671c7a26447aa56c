//! Locale-dependent tip text
//!
//! A lookup tries the full locale, then its language subtag, then
//! [`FALLBACK_LOCALE`] (`ko_KR` tries `ko-KR`, `ko`, `en-US`), so a catalog
//! only needs entries for the languages it actually has.

use rustc_hash::FxHashMap;

/// Tried last by every lookup
pub const FALLBACK_LOCALE: &str = "en-US";

/// Catalog key for a locale tag: trimmed, with `_` separators as `-`
fn catalog_key(locale: &str) -> String {
    locale.trim().replace('_', "-")
}

/// Greeting shown in the tip bubble, per locale
#[derive(Clone, Debug)]
pub struct TipCatalog {
    greetings: FxHashMap<String, String>,
}

impl TipCatalog {
    /// An empty catalog
    pub fn empty() -> Self {
        Self {
            greetings: FxHashMap::default(),
        }
    }

    /// The built-in greetings
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert("zh-CN", "早上好呀～");
        catalog.insert("zh", "早上好呀～");
        catalog.insert("en-US", "Good morning~");
        catalog.insert("en", "Good morning~");
        catalog
    }

    pub fn insert(&mut self, locale: &str, text: impl Into<String>) {
        self.greetings.insert(catalog_key(locale), text.into());
    }

    /// Greeting for `locale`; empty when neither the locale, its language,
    /// nor [`FALLBACK_LOCALE`] has an entry
    pub fn greeting(&self, locale: &str) -> String {
        let key = catalog_key(locale);
        let language = key.split('-').next().unwrap_or_default();

        let greeting = [key.as_str(), language, FALLBACK_LOCALE]
            .into_iter()
            .filter(|candidate| !candidate.is_empty())
            .find_map(|candidate| self.greetings.get(candidate))
            .cloned()
            .unwrap_or_default();
        greeting
    }
}

impl Default for TipCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
