//! Style variables exposed to the rendering surface

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Style variable keys, in output order
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StyleVariable {
    // Brand gradient
    LinearGradient,
    LinearGradientHover,
    PlatformLight,

    // Scheme palette
    TextNormal,
    TextAccent,
    TextSubAccent,
    BackgroundSecondary,
}

impl StyleVariable {
    pub const ALL: [StyleVariable; 7] = [
        StyleVariable::LinearGradient,
        StyleVariable::LinearGradientHover,
        StyleVariable::PlatformLight,
        StyleVariable::TextNormal,
        StyleVariable::TextAccent,
        StyleVariable::TextSubAccent,
        StyleVariable::BackgroundSecondary,
    ];

    /// Variable name as exposed in the snapshot
    pub const fn name(self) -> &'static str {
        match self {
            StyleVariable::LinearGradient => "linear-gradient",
            StyleVariable::LinearGradientHover => "linear-gradient-hover",
            StyleVariable::PlatformLight => "platform-light",
            StyleVariable::TextNormal => "text-normal",
            StyleVariable::TextAccent => "text-accent",
            StyleVariable::TextSubAccent => "text-sub-accent",
            StyleVariable::BackgroundSecondary => "background-secondary",
        }
    }

    /// CSS custom property name; gradient keys are namespaced under `--aurora-dia--`
    pub const fn css_property(self) -> &'static str {
        match self {
            StyleVariable::LinearGradient => "--aurora-dia--linear-gradient",
            StyleVariable::LinearGradientHover => "--aurora-dia--linear-gradient-hover",
            StyleVariable::PlatformLight => "--aurora-dia--platform-light",
            StyleVariable::TextNormal => "--text-normal",
            StyleVariable::TextAccent => "--text-accent",
            StyleVariable::TextSubAccent => "--text-sub-accent",
            StyleVariable::BackgroundSecondary => "--background-secondary",
        }
    }

    pub fn from_name(name: &str) -> Option<StyleVariable> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StyleVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete, ordered set of style variables
///
/// Built only through [`StyleVariableSet::from_fn`], which produces a value
/// for every [`StyleVariable`]; the set therefore always holds exactly the
/// seven keys in [`StyleVariable::ALL`] order. It is replaced as a whole,
/// never patched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleVariableSet {
    vars: IndexMap<&'static str, String>,
}

impl StyleVariableSet {
    pub fn from_fn<F>(mut value: F) -> Self
    where
        F: FnMut(StyleVariable) -> String,
    {
        let vars = StyleVariable::ALL
            .into_iter()
            .map(|var| (var.name(), value(var)))
            .collect();
        Self { vars }
    }

    /// Value of a variable (always present)
    pub fn value(&self, var: StyleVariable) -> &str {
        self.vars
            .get_index(var.index())
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.vars.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.vars.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Render as an inline `style` attribute of CSS custom properties
    pub fn to_inline_css(&self) -> String {
        StyleVariable::ALL
            .into_iter()
            .map(|var| format!("{}: {};", var.css_property(), self.value(var)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
