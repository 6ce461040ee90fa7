use serde::Serialize;
use std::fmt;

/// Decoded output unit
///
/// Numbers `0..=9` and letters are single characters; larger numbers are
/// their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Symbol {
    Char(char),
    Text(String),
}

impl Symbol {
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Char(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
