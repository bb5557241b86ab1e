//! Configuration for the parser and writer.

use crate::encoding::Encoding;

/// Configuration options for a [`Parser`](crate::Parser).
///
/// Options are fixed when the parser is created;
/// [`reset`](crate::Parser::reset) preserves them. This is the crate's
/// rendering of "settings cannot change once parsing has started".
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// The input encoding, or `None` to detect it from the first bytes of
    /// the stream.
    ///
    /// # Default
    ///
    /// `None` (auto-detect; [`Parser::input_encoding`](crate::Parser::input_encoding)
    /// reports the detected value once known).
    pub input_encoding: Option<Encoding>,

    /// The encoding of string and member-name bytes passed to handlers.
    ///
    /// # Default
    ///
    /// [`Encoding::Utf8`]
    pub output_encoding: Encoding,

    /// Maximum length, in bytes of the *output* encoding (not characters),
    /// of any single string value or member name. Exceeding it fails the
    /// parse with [`ErrorKind::TooLongString`](crate::ErrorKind::TooLongString).
    ///
    /// # Default
    ///
    /// `usize::MAX`
    pub max_string_length: usize,

    /// Maximum length in characters of a number token; exceeding it fails
    /// with [`ErrorKind::TooLongNumber`](crate::ErrorKind::TooLongNumber).
    ///
    /// # Default
    ///
    /// `usize::MAX`
    pub max_number_length: usize,

    /// Whether the input may begin with a byte-order mark.
    ///
    /// RFC 4627 does not allow a BOM, but input read from files often has
    /// one.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_bom: bool,

    /// Whether Javascript-style `//` and `/* */` comments may appear
    /// between tokens.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether a comma may trail the last array item or object member.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_commas: bool,

    /// Whether the literals `NaN`, `Infinity`, and `-Infinity` are
    /// accepted as values.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_special_numbers: bool,

    /// Whether `0x`/`0X` hexadecimal numbers (ECMA-262
    /// `HexIntegerLiteral`, never signed) are accepted as values.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_hex_numbers: bool,

    /// Replace invalid input encoding sequences with U+FFFD (per the
    /// Unicode 5.2 §3.9 maximal-subpart rule) instead of failing with
    /// [`ErrorKind::InvalidEncodingSequence`](crate::ErrorKind::InvalidEncodingSequence).
    ///
    /// # Default
    ///
    /// `false`
    pub replace_invalid_sequences: bool,

    /// Track member names of every open object and fail with
    /// [`ErrorKind::DuplicateObjectMember`](crate::ErrorKind::DuplicateObjectMember)
    /// on a byte-identical repeat. Costs one set per open object; clients
    /// building their own index can return
    /// [`MemberVerdict::TreatAsDuplicate`](crate::MemberVerdict::TreatAsDuplicate)
    /// from the member handler instead and leave this off.
    ///
    /// # Default
    ///
    /// `false`
    pub track_object_members: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            input_encoding: None,
            output_encoding: Encoding::Utf8,
            max_string_length: usize::MAX,
            max_number_length: usize::MAX,
            allow_bom: false,
            allow_comments: false,
            allow_trailing_commas: false,
            allow_special_numbers: false,
            allow_hex_numbers: false,
            replace_invalid_sequences: false,
            track_object_members: false,
        }
    }
}

/// Configuration options for a [`Writer`](crate::Writer).
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    /// The encoding of all emitted bytes.
    ///
    /// # Default
    ///
    /// [`Encoding::Utf8`]
    pub output_encoding: Encoding,

    /// Emit CR LF instead of LF from
    /// [`write_new_line`](crate::Writer::write_new_line).
    ///
    /// # Default
    ///
    /// `false`
    pub use_crlf: bool,

    /// Replace invalid encoding sequences in
    /// [`write_string`](crate::Writer::write_string) input with U+FFFD
    /// instead of failing.
    ///
    /// # Default
    ///
    /// `false`
    pub replace_invalid_sequences: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            output_encoding: Encoding::Utf8,
            use_crlf: false,
            replace_invalid_sequences: false,
        }
    }
}
