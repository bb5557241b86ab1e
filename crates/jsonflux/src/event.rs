//! Payload types passed to [`Handler`](crate::Handler) callbacks.

use bitflags::bitflags;
use bstr::ByteSlice;
use core::fmt;

use crate::number::{NumberAttributes, to_f64};

/// Decision returned by a handler: keep going, or abort the parse (or
/// write) with [`ErrorKind::AbortedByHandler`](crate::ErrorKind::AbortedByHandler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Verdict {
    /// Keep processing input.
    Continue,
    /// Stop; the instance latches an error at the current token.
    Abort,
}

/// Decision returned by the object-member handler. `TreatAsDuplicate` lets
/// clients that already index members (say, while building a DOM) detect
/// duplicates without the memory cost of
/// [`track_object_members`](crate::ParserOptions::track_object_members).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum MemberVerdict {
    /// Accept the member.
    Continue,
    /// Stop; the parser latches an error at the member name.
    Abort,
    /// Fail the parse with
    /// [`ErrorKind::DuplicateObjectMember`](crate::ErrorKind::DuplicateObjectMember)
    /// at the member name.
    TreatAsDuplicate,
}

/// The number literals outside the RFC 4627 grammar, recognized when
/// [`allow_special_numbers`](crate::ParserOptions::allow_special_numbers)
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialNumber {
    /// `NaN`.
    NaN,
    /// `Infinity`.
    Infinity,
    /// `-Infinity`.
    NegativeInfinity,
}

impl SpecialNumber {
    /// The literal's spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialNumber::NaN => "NaN",
            SpecialNumber::Infinity => "Infinity",
            SpecialNumber::NegativeInfinity => "-Infinity",
        }
    }

    /// The IEEE 754 value of the literal.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            SpecialNumber::NaN => f64::NAN,
            SpecialNumber::Infinity => f64::INFINITY,
            SpecialNumber::NegativeInfinity => f64::NEG_INFINITY,
        }
    }
}

bitflags! {
    /// Properties of the characters that make up a decoded string.
    ///
    /// `CONTAINS_REPLACED` is only set for U+FFFD characters the decoder
    /// substituted itself; replacement characters already present in the
    /// input do not set it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StringAttributes: u8 {
        /// Contains U+0000.
        const CONTAINS_NUL = 1 << 0;
        /// Contains a control character (U+0000 - U+001F).
        const CONTAINS_CONTROL = 1 << 1;
        /// Contains a character outside ASCII (U+0080 - U+10FFFF).
        const CONTAINS_NON_ASCII = 1 << 2;
        /// Contains a character outside the BMP (U+10000 - U+10FFFF).
        const CONTAINS_NON_BMP = 1 << 3;
        /// An invalid encoding sequence was replaced by U+FFFD.
        const CONTAINS_REPLACED = 1 << 4;
    }
}

/// A decoded string value or object member name.
///
/// The bytes are in the parser's output encoding and may legitimately
/// contain embedded NUL characters (the `\u0000` escape); the slice length is
/// authoritative.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StringData<'a> {
    bytes: &'a [u8],
    attributes: StringAttributes,
}

impl<'a> StringData<'a> {
    pub(crate) fn new(bytes: &'a [u8], attributes: StringAttributes) -> Self {
        Self { bytes, attributes }
    }

    /// The string's bytes in the output encoding.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// What kinds of characters the string contains.
    #[must_use]
    pub fn attributes(&self) -> StringAttributes {
        self.attributes
    }
}

impl fmt::Debug for StringData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringData")
            .field("bytes", &self.bytes.as_bstr())
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// A number token, carried as its ASCII text.
///
/// The text is exactly what appeared in the input (transcoded to ASCII)
/// and is guaranteed to satisfy the number grammar, so clients may feed it
/// to a bignum or decimal library without re-validating. [`value`] gives
/// the conventional IEEE 754 double interpretation.
///
/// [`value`]: NumberData::value
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NumberData<'a> {
    text: &'a str,
    attributes: NumberAttributes,
}

impl<'a> NumberData<'a> {
    pub(crate) fn new(text: &'a str, attributes: NumberAttributes) -> Self {
        Self { text, attributes }
    }

    /// The number's text: digits plus any of `-`, `+`, `.`, `e`, `E`, and
    /// for hex literals `x`, `X`, `a`-`f`, `A`-`F`.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Grammar properties of the text.
    #[must_use]
    pub fn attributes(&self) -> NumberAttributes {
        self.attributes
    }

    /// The number as an IEEE 754 double. Out-of-range magnitudes saturate
    /// to infinity.
    #[must_use]
    pub fn value(&self) -> f64 {
        to_f64(self.text, self.attributes)
    }
}

impl fmt::Debug for NumberData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberData")
            .field("text", &self.text)
            .field("attributes", &self.attributes)
            .finish()
    }
}
