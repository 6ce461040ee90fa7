//! Byte decoder
//!
//! Every input byte carries a 2-bit type tag and a 6-bit payload:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! ┌───────────────────────┬───────┐
//! │        payload        │  tag  │
//! └───────────────────────┴───────┘
//! ```
//!
//! | tag    | meaning          | payload      | symbol                     |
//! |--------|------------------|--------------|----------------------------|
//! | `0b00` | unsigned number  | `0..=9`      | digit character            |
//! |        |                  | `10..=63`    | decimal text               |
//! | `0b01` | signed number    | same as above                             |
//! | `0b10` | latin letter     | `0..=25`     | `'a'..='z'`                |
//! |        |                  | `26..=63`    | none (dropped)             |
//! | `0b11` | unknown          | any          | none (dropped)             |
//!
//! The payload is always non-negative after the shift, so signed and
//! unsigned numbers decode to the same symbols.

use std::fmt;

use crate::symbol::Symbol;

const TAG_MASK: u8 = 0b0000_0011;
const PAYLOAD_SHIFT: u32 = 2;
const PAYLOAD_MASK: u8 = 0b0011_1111;

/// Index of 'z' counted from 'a'
const LAST_LETTER: u8 = 25;

/// Decoding rule selected by the low two bits of a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    UnsignedNumber = 0b00,
    SignedNumber = 0b01,
    LatinLetter = 0b10,
    Unknown = 0b11,
}

impl TypeTag {
    #[must_use]
    pub fn of(byte: u8) -> Self {
        match byte & TAG_MASK {
            0b00 => Self::UnsignedNumber,
            0b01 => Self::SignedNumber,
            0b10 => Self::LatinLetter,
            _ => Self::Unknown,
        }
    }
}

/// Extract the 6-bit payload (`0..=63`)
#[must_use]
pub fn payload(byte: u8) -> u8 {
    (byte >> PAYLOAD_SHIFT) & PAYLOAD_MASK
}

/// Why a byte produced no symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Tag `0b11`
    UnknownType,
    /// Latin letter tag with a payload past 'z'
    LetterOutOfRange(u8),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType => write!(f, "unknown byte type"),
            Self::LetterOutOfRange(data) => write!(f, "unknown letter data: {data}"),
        }
    }
}

impl std::error::Error for SkipReason {}

/// Decode one byte, reporting why it was skipped if it yields no symbol
///
/// # Errors
///
/// Returns a [`SkipReason`] for the unknown tag and for letters past 'z'.
/// Neither is fatal: the caller is expected to drop the byte and go on.
pub fn classify(byte: u8) -> Result<Symbol, SkipReason> {
    let data = payload(byte);
    match TypeTag::of(byte) {
        TypeTag::UnsignedNumber => Ok(unsigned_number(u16::from(data))),
        TypeTag::SignedNumber => Ok(signed_number(i16::from(data))),
        TypeTag::LatinLetter => latin_letter(data),
        TypeTag::Unknown => Err(SkipReason::UnknownType),
    }
}

/// Decode one byte into at most one symbol
#[must_use]
pub fn decode(byte: u8) -> Option<Symbol> {
    classify(byte).ok()
}

/// Render a byte the way the worker logs it, e.g. `0b01100110`
#[must_use]
pub fn format_binary(byte: u8) -> String {
    format!("{byte:#010b}")
}

fn unsigned_number(value: u16) -> Symbol {
    match char::from_digit(u32::from(value), 10) {
        Some(digit) => Symbol::Char(digit),
        None => Symbol::Text(value.to_string()),
    }
}

fn signed_number(value: i16) -> Symbol {
    match u32::try_from(value)
        .ok()
        .and_then(|d| char::from_digit(d, 10))
    {
        Some(digit) => Symbol::Char(digit),
        None => Symbol::Text(value.to_string()),
    }
}

fn latin_letter(data: u8) -> Result<Symbol, SkipReason> {
    if data > LAST_LETTER {
        return Err(SkipReason::LetterOutOfRange(data));
    }
    Ok(Symbol::Char(char::from(b'a' + data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte(tag: TypeTag, data: u8) -> u8 {
        (data << PAYLOAD_SHIFT) | tag as u8
    }

    #[test]
    fn test_tag_and_payload() {
        assert_eq!(TypeTag::of(0b0110_0110), TypeTag::LatinLetter);
        assert_eq!(payload(0b0110_0110), 25);
        assert_eq!(TypeTag::of(0b1111_1111), TypeTag::Unknown);
        assert_eq!(payload(0b1111_1111), 63);
    }

    #[test]
    fn test_numbers_for_both_number_tags() {
        for tag in [TypeTag::UnsignedNumber, TypeTag::SignedNumber] {
            for data in 0..=9u8 {
                let expected = char::from(b'0' + data);
                assert_eq!(decode(byte(tag, data)), Some(Symbol::Char(expected)));
            }
            for data in 10..=63u8 {
                assert_eq!(decode(byte(tag, data)), Some(Symbol::Text(data.to_string())));
            }
        }
    }

    #[test]
    fn test_letters() {
        for data in 0..=25u8 {
            let expected = char::from(b'a' + data);
            assert_eq!(decode(byte(TypeTag::LatinLetter, data)), Some(Symbol::Char(expected)));
        }
        for data in 26..=63u8 {
            assert_eq!(
                classify(byte(TypeTag::LatinLetter, data)),
                Err(SkipReason::LetterOutOfRange(data))
            );
        }
    }

    #[test]
    fn test_unknown_tag() {
        for data in 0..=63u8 {
            assert_eq!(classify(byte(TypeTag::Unknown, data)), Err(SkipReason::UnknownType));
        }
    }

    #[test]
    fn test_format_binary() {
        assert_eq!(format_binary(0b0000_0011), "0b00000011");
        assert_eq!(format_binary(0xff), "0b11111111");
    }
}
