use thiserror::Error;

use crate::location::Location;

/// The error taxonomy shared by the parser and the writer.
///
/// The discriminants (and therefore [`ErrorKind::code`]) are stable API;
/// clients may persist or compare them numerically. The `Display` strings
/// are likewise stable ASCII descriptions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ErrorKind {
    /// No error occurred. Never carried by an [`Error`]; present so the
    /// numeric code space starts at zero.
    #[error("no error")]
    None = 0,
    /// An allocation failed.
    #[error("could not allocate enough memory")]
    OutOfMemory = 1,
    /// A handler returned [`Verdict::Abort`](crate::Verdict::Abort).
    #[error("the operation was aborted by a handler")]
    AbortedByHandler = 2,
    /// The input begins with a byte-order mark and
    /// [`allow_bom`](crate::ParserOptions::allow_bom) is not set.
    #[error("the input begins with a byte-order mark (BOM), which is not allowed by RFC 4627")]
    BomNotAllowed = 3,
    /// A byte sequence in the input is not valid for the input encoding.
    #[error("the input contains a byte or sequence of bytes that is not valid for the input encoding")]
    InvalidEncodingSequence = 4,
    /// The input contains text that does not begin any JSON token.
    #[error("the input contains an unknown token")]
    UnknownToken = 5,
    /// A well-formed token appeared where the grammar does not allow it.
    #[error("the input contains an unexpected token")]
    UnexpectedToken = 6,
    /// The input ended in the middle of a token.
    #[error("the input ends in the middle of a token")]
    IncompleteToken = 7,
    /// The input ended although the grammar requires more tokens.
    #[error("the input ends when more tokens are expected")]
    ExpectedMoreTokens = 8,
    /// A string contains an unescaped control character (U+0000 - U+001F).
    #[error("the input contains a string containing an unescaped control character (U+0000 - U+001F)")]
    UnescapedControlCharacter = 9,
    /// A string contains a backslash escape that is not defined by RFC 4627.
    #[error("the input contains a string containing an invalid escape sequence")]
    InvalidEscapeSequence = 10,
    /// A string contains a `\uXXXX` surrogate codepoint without its mate.
    #[error("the input contains a string containing an unmatched UTF-16 surrogate codepoint")]
    UnpairedSurrogateEscapeSequence = 11,
    /// A string exceeds the configured maximum output length.
    #[error("the input contains a string that is too long")]
    TooLongString = 12,
    /// A number token violates the number grammar.
    #[error("the input contains an invalid number")]
    InvalidNumber = 13,
    /// A number exceeds the configured maximum length.
    #[error("the input contains a number that is too long")]
    TooLongNumber = 14,
    /// An object contains two members with byte-identical names.
    #[error("the input contains an object with duplicate members")]
    DuplicateObjectMember = 15,
}

impl ErrorKind {
    /// The stable numeric code of this error kind.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up an error kind by its numeric code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            1 => Self::OutOfMemory,
            2 => Self::AbortedByHandler,
            3 => Self::BomNotAllowed,
            4 => Self::InvalidEncodingSequence,
            5 => Self::UnknownToken,
            6 => Self::UnexpectedToken,
            7 => Self::IncompleteToken,
            8 => Self::ExpectedMoreTokens,
            9 => Self::UnescapedControlCharacter,
            10 => Self::InvalidEscapeSequence,
            11 => Self::UnpairedSurrogateEscapeSequence,
            12 => Self::TooLongString,
            13 => Self::InvalidNumber,
            14 => Self::TooLongNumber,
            15 => Self::DuplicateObjectMember,
            _ => return None,
        })
    }
}

/// A parse error, positioned in the input stream.
///
/// Errors are latched: the first error a parser encounters is reported by
/// every subsequent call until the parser is reset.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} at {location}")]
pub struct Error {
    pub(crate) kind: ErrorKind,
    pub(crate) location: Location,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// The kind of error that occurred.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Where in the input stream the error occurred.
    ///
    /// Encoding errors point at the first byte of the offending sequence;
    /// lexical errors point at the token start (except
    /// [`UnescapedControlCharacter`](ErrorKind::UnescapedControlCharacter),
    /// which points at the character itself); structural errors point at the
    /// offending token.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::ErrorKind;

    #[test]
    fn codes_round_trip() {
        for code in 0..=15 {
            let kind = ErrorKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(ErrorKind::from_code(16), None);
    }

    #[test]
    fn canonical_strings() {
        assert_eq!(ErrorKind::None.to_string(), "no error");
        assert_eq!(
            ErrorKind::TooLongNumber.to_string(),
            "the input contains a number that is too long"
        );
        assert_eq!(
            ErrorKind::UnpairedSurrogateEscapeSequence.to_string(),
            "the input contains a string containing an unmatched UTF-16 surrogate codepoint"
        );
    }
}
