//! Aurora Dia Theme System
//!
//! Turns a caller-supplied [`ThemeConfig`] plus the ambient light/dark
//! preference into the [`StyleVariableSet`] a rendering surface consumes.
//!
//! # Overview
//!
//! - **Color schemes**: [`ColorScheme`] and the [`DarkMode`] override carried
//!   by the theme config
//! - **Tokens**: the fixed [`SchemePalette`] table and the seven
//!   [`StyleVariable`] keys
//! - **Resolution**: [`resolve`], a pure function from theme + scheme to a
//!   complete variable set
//! - **Monitoring**: [`ColorSchemeMonitor`] follows a [`PreferenceSource`] and
//!   reports genuine light/dark flips only
//!
//! # Quick Start
//!
//! ```rust
//! use dia_theme::{resolve, ColorScheme, StyleVariable, ThemeConfig};
//!
//! let theme = ThemeConfig::default();
//! let vars = resolve(&theme, ColorScheme::Dark);
//!
//! assert_eq!(vars.len(), 7);
//! assert_eq!(vars.value(StyleVariable::BackgroundSecondary), "#212121");
//! ```

pub mod config;
pub mod monitor;
pub mod platform;
pub mod resolver;
pub mod scheme;
pub mod tokens;

pub use config::{Gradient, StyleMap, ThemeConfig};
pub use monitor::{AmbientPreference, ColorSchemeMonitor, PreferenceSource};
pub use platform::detect_system_color_scheme;
pub use resolver::resolve;
pub use scheme::{ColorScheme, DarkMode, ParseSchemeError};
pub use tokens::*;
