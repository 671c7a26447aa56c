//! Design tokens
//!
//! The scheme-dependent literal palette and the fixed set of style
//! variables handed to the rendering surface.

mod palette;
mod variables;

pub use palette::SchemePalette;
pub use variables::{StyleVariable, StyleVariableSet};
