//! The ASCII number grammar, shared by the lexer and the writer.

use bitflags::bitflags;

bitflags! {
    /// Properties of a number token's text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NumberAttributes: u8 {
        /// The number begins with a minus sign.
        const IS_NEGATIVE = 1 << 0;
        /// The number is a `0x`/`0X` hexadecimal literal.
        const IS_HEX = 1 << 1;
        /// The number has a fractional part.
        const CONTAINS_DECIMAL_POINT = 1 << 2;
        /// The number has an exponent.
        const CONTAINS_EXPONENT = 1 << 3;
        /// The number's exponent is negative.
        const CONTAINS_NEGATIVE_EXPONENT = 1 << 4;
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterSign,
    Zero,
    Integer,
    FractionStart,
    Fraction,
    ExponentStart,
    ExponentSign,
    Exponent,
    HexStart,
    Hex,
}

/// Validates a complete number literal and computes its attributes.
///
/// Accepts the RFC 4627 grammar
/// `-? (0 | [1-9][0-9]*) ('.' [0-9]+)? ([eE] [+-]? [0-9]+)?` and the
/// ECMA-262 `HexIntegerLiteral` form `0[xX][0-9a-fA-F]+` (which cannot be
/// signed). Returns `None` for anything else, including a trailing or
/// leading excess character.
pub(crate) fn scan_number(text: &[u8]) -> Option<NumberAttributes> {
    let mut state = State::Start;
    let mut attrs = NumberAttributes::empty();
    for &b in text {
        state = match (state, b) {
            (State::Start, b'-') => {
                attrs |= NumberAttributes::IS_NEGATIVE;
                State::AfterSign
            }
            (State::Start | State::AfterSign, b'0') => State::Zero,
            (State::Start | State::AfterSign, b'1'..=b'9') => State::Integer,
            (State::Zero, b'x' | b'X') if !attrs.contains(NumberAttributes::IS_NEGATIVE) => {
                attrs |= NumberAttributes::IS_HEX;
                State::HexStart
            }
            (State::Integer, b'0'..=b'9') => State::Integer,
            (State::Zero | State::Integer, b'.') => {
                attrs |= NumberAttributes::CONTAINS_DECIMAL_POINT;
                State::FractionStart
            }
            (State::FractionStart | State::Fraction, b'0'..=b'9') => State::Fraction,
            (State::Zero | State::Integer | State::Fraction, b'e' | b'E') => {
                attrs |= NumberAttributes::CONTAINS_EXPONENT;
                State::ExponentStart
            }
            (State::ExponentStart, b'+') => State::ExponentSign,
            (State::ExponentStart, b'-') => {
                attrs |= NumberAttributes::CONTAINS_NEGATIVE_EXPONENT;
                State::ExponentSign
            }
            (State::ExponentStart | State::ExponentSign | State::Exponent, b'0'..=b'9') => {
                State::Exponent
            }
            (State::HexStart | State::Hex, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F') => State::Hex,
            _ => return None,
        };
    }
    matches!(
        state,
        State::Zero | State::Integer | State::Fraction | State::Exponent | State::Hex
    )
    .then_some(attrs)
}

/// Interprets validated number text as an IEEE 754 double.
pub(crate) fn to_f64(text: &str, attrs: NumberAttributes) -> f64 {
    if attrs.contains(NumberAttributes::IS_HEX) {
        text.bytes()
            .skip(2)
            .fold(0.0_f64, |acc, b| {
                acc * 16.0 + f64::from((b as char).to_digit(16).unwrap_or(0))
            })
    } else {
        // The decimal grammar is a subset of Rust's f64 grammar; huge
        // exponents saturate to infinity rather than failing.
        text.parse().unwrap_or(f64::NAN)
    }
}
