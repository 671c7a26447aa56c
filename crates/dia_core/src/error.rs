//! Error taxonomy for the reactive engine
//!
//! None of these errors cross the host boundary as a panic. Each one has a
//! documented safe fallback and is reported through `tracing` and, where
//! the caller asked for it, as a returned value.

use thiserror::Error;

/// Reactive engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiaError {
    /// Activation was requested before any configuration was installed.
    /// The activation state is left untouched.
    #[error("activation requested before a configuration was installed")]
    NotConfigured,

    /// A pointer sample arrived but the anchor rectangle could not be
    /// resolved. The sample is skipped.
    #[error("no anchor rectangle available for pointer sample")]
    MissingAnchor,

    /// A theme sub-object is absent; fallback values are used instead.
    #[error("theme is missing `{0}`, falling back to defaults")]
    InvalidThemeShape(&'static str),
}

/// Result type for reactive engine operations
pub type Result<T> = std::result::Result<T, DiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DiaError::NotConfigured.to_string(),
            "activation requested before a configuration was installed"
        );
        assert_eq!(
            DiaError::InvalidThemeShape("gradient").to_string(),
            "theme is missing `gradient`, falling back to defaults"
        );
    }
}
