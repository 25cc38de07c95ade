use std::fmt;

use serde::{Deserialize, Serialize};

/// A playing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// Lowercase single letter used by `genmove`.
    pub fn gtp(&self) -> char {
        match self {
            Self::Black => 'b',
            Self::White => 'w',
        }
    }

    /// Uppercase single letter used in SGF result fields.
    pub fn sgf(&self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }

    pub fn opponent(&self) -> Color {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" => Some(Self::Black),
            "white" | "w" => Some(Self::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent(), Color::Black);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Color::parse("black"), Some(Color::Black));
        assert_eq!(Color::parse("W"), Some(Color::White));
        assert_eq!(Color::parse("green"), None);
    }

    #[test]
    fn test_letters() {
        assert_eq!(Color::Black.gtp(), 'b');
        assert_eq!(Color::White.sgf(), 'W');
    }
}
