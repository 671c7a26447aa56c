//! Read-only state handed to the rendering surface

use crate::placement::Position;
use crate::store::ActivationState;
use crate::tracker::PointerOffset;
use dia_theme::StyleVariableSet;
use serde::Serialize;

/// Everything a rendering surface needs for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MascotSnapshot {
    pub visible: bool,
    pub activation_state: ActivationState,
    pub pointer_offset: PointerOffset,
    pub is_moving: bool,
    pub style_variables: StyleVariableSet,
    pub position: Position,
    pub tip_text: String,
}

impl MascotSnapshot {
    /// Transform for both eyes
    pub fn eye_transform(&self) -> String {
        self.pointer_offset.to_css_transform()
    }

    /// Inline style carrying the style variables
    pub fn body_style(&self) -> String {
        self.style_variables.to_inline_css()
    }

    pub fn container_style(&self) -> &'static str {
        self.position.container_style()
    }

    pub fn tips_style(&self) -> &'static str {
        self.position.tips_style()
    }
}
