//! Algorithm inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Values supplied by the host for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Input {
    Numbers(Vec<i64>),
    Text(String),
    /// Text plus pattern, or any two strings.
    TextPair { text: String, pattern: String },
    /// A single problem size (board width, disk count, `n`).
    Size(u32),
}

/// Which [`Input`] variant an algorithm expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputShape {
    Numbers,
    Text,
    TextPair,
    Size,
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputShape::Numbers => "a list of numbers",
            InputShape::Text => "text",
            InputShape::TextPair => "a text and a pattern",
            InputShape::Size => "a size",
        };
        f.write_str(s)
    }
}

impl Input {
    pub fn shape(&self) -> InputShape {
        match self {
            Input::Numbers(_) => InputShape::Numbers,
            Input::Text(_) => InputShape::Text,
            Input::TextPair { .. } => InputShape::TextPair,
            Input::Size(_) => InputShape::Size,
        }
    }

    pub fn numbers(&self) -> Option<&[i64]> {
        match self {
            Input::Numbers(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Input::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn pair(&self) -> Option<(&str, &str)> {
        match self {
            Input::TextPair { text, pattern } => Some((text.as_str(), pattern.as_str())),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<u32> {
        match self {
            Input::Size(n) => Some(*n),
            _ => None,
        }
    }

    /// Parse a comma- or whitespace-separated list of integers.
    pub fn parse_numbers(s: &str) -> Result<Self, String> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<i64>().map_err(|_| format!("`{t}` is not an integer")))
            .collect::<Result<Vec<_>, _>>()
            .map(Input::Numbers)
    }
}
