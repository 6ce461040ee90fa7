//! Byte literals accepted on the command line input
//!
//! - `0b01100110` binary
//! - `0x66` hexadecimal
//! - `102` decimal
//!
//! `_` may be used as a digit separator: `0b0110_0110`.

use std::fmt;

/// Error type for byte literal parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// No digits after the prefix
    Empty(String),
    /// Not a number in the selected radix
    Invalid(String),
    /// A number that doesn't fit in a byte
    OutOfRange(String),
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(token) => write!(f, "No digits in literal: {token}"),
            Self::Invalid(token) => write!(f, "Invalid byte literal: {token}"),
            Self::OutOfRange(token) => write!(f, "Literal does not fit in a byte: {token}"),
        }
    }
}

impl std::error::Error for LiteralError {}

/// Parse one byte literal
///
/// # Errors
///
/// Returns an error if the token has no digits, has digits invalid for its
/// radix, or is larger than 255.
pub fn parse_byte(token: &str) -> Result<u8, LiteralError> {
    let (radix, digits) = if let Some(rest) = strip_prefix_ignore_case(token, "0b") {
        (2, rest)
    } else if let Some(rest) = strip_prefix_ignore_case(token, "0x") {
        (16, rest)
    } else {
        (10, token)
    };

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err(LiteralError::Empty(token.to_string()));
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(LiteralError::Invalid(token.to_string()));
    }

    let value = u64::from_str_radix(&digits, radix)
        .map_err(|_| LiteralError::OutOfRange(token.to_string()))?;
    u8::try_from(value).map_err(|_| LiteralError::OutOfRange(token.to_string()))
}

fn strip_prefix_ignore_case<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let head = token.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        token.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radixes() {
        assert_eq!(parse_byte("0b01100110"), Ok(0b0110_0110));
        assert_eq!(parse_byte("0B11"), Ok(3));
        assert_eq!(parse_byte("0x66"), Ok(0x66));
        assert_eq!(parse_byte("0XfF"), Ok(255));
        assert_eq!(parse_byte("102"), Ok(102));
        assert_eq!(parse_byte("0"), Ok(0));
    }

    #[test]
    fn test_separators() {
        assert_eq!(parse_byte("0b0110_0110"), Ok(0b0110_0110));
        assert_eq!(parse_byte("1_0"), Ok(10));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_byte("0b"), Err(LiteralError::Empty("0b".to_string())));
        assert_eq!(parse_byte("0b012"), Err(LiteralError::Invalid("0b012".to_string())));
        assert_eq!(parse_byte("+5"), Err(LiteralError::Invalid("+5".to_string())));
        assert_eq!(parse_byte("abc"), Err(LiteralError::Invalid("abc".to_string())));
        assert_eq!(parse_byte("256"), Err(LiteralError::OutOfRange("256".to_string())));
        assert_eq!(
            parse_byte("0b1_0000_0000"),
            Err(LiteralError::OutOfRange("0b1_0000_0000".to_string()))
        );
    }
}
