//! Scenario definition for headless mascot runs.
//!
//! ```json
//! {
//!   "anchor": { "left": 10, "top": 2 },
//!   "steps": [
//!     { "type": "install", "locale": "zh-CN" },
//!     { "type": "activate" },
//!     { "type": "wait", "ms": 1000 },
//!     { "type": "assert_visible", "visible": true }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use dia_core::Rect;
use dia_theme::{ColorScheme, ThemeConfig};
use serde::Deserialize;
use std::path::Path;

/// Sequence of steps driven against one mascot.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Eyes' anchor rectangle origin; samples are skipped when absent
    #[serde(default)]
    pub anchor: Option<AnchorSpec>,
    /// Ambient scheme before the first step
    #[serde(default)]
    pub initial_scheme: ColorScheme,
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AnchorSpec {
    pub left: f64,
    pub top: f64,
}

impl AnchorSpec {
    pub fn rect(self) -> Rect {
        Rect::at(self.left, self.top)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Install {
        locale: String,
    },
    Activate,
    /// Install the configured locale, activate, and schedule visibility
    Initialize,
    PointerMove {
        x: f64,
        y: f64,
    },
    Frame {
        #[serde(default = "one")]
        count: u32,
    },
    /// Advance the clock, running a frame every 16 ms
    Wait {
        ms: u64,
    },
    SetScheme {
        scheme: ColorScheme,
    },
    SetTheme {
        #[serde(default)]
        theme: ThemeConfig,
    },
    Snapshot,
    AssertVisible {
        visible: bool,
    },
    AssertOffset {
        x: f64,
        y: f64,
    },
}

fn one() -> u32 {
    1
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Install { .. } => "install",
            Step::Activate => "activate",
            Step::Initialize => "initialize",
            Step::PointerMove { .. } => "pointer_move",
            Step::Frame { .. } => "frame",
            Step::Wait { .. } => "wait",
            Step::SetScheme { .. } => "set_scheme",
            Step::SetTheme { .. } => "set_theme",
            Step::Snapshot => "snapshot",
            Step::AssertVisible { .. } => "assert_visible",
            Step::AssertOffset { .. } => "assert_offset",
        }
    }
}
