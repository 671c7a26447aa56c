//! Screen placement

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which bottom corner the mascot sits in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }

    /// Inline style for the mascot container
    pub fn container_style(self) -> &'static str {
        match self {
            Position::Left => "left: 20px;",
            Position::Right => "right: 20px;",
        }
    }

    /// Inline style for the tip bubble, which opens toward the screen center
    pub fn tips_style(self) -> &'static str {
        match self {
            Position::Left => "right: -120px;",
            Position::Right => "left: -120px;",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            other => Err(format!("unknown position `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_mirror() {
        assert_eq!(Position::Left.container_style(), "left: 20px;");
        assert_eq!(Position::Left.tips_style(), "right: -120px;");
        assert_eq!(Position::Right.container_style(), "right: 20px;");
        assert_eq!(Position::Right.tips_style(), "left: -120px;");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Right".parse::<Position>(), Ok(Position::Right));
        assert!("top".parse::<Position>().is_err());
    }
}
