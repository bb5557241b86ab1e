use core::fmt;

/// A position in a parser's input stream.
///
/// All fields are zero-based. `byte` is the only value that unambiguously
/// identifies the position: `line` and `column` count decoded characters,
/// which may occupy several bytes each in the input encoding.
///
/// The parser treats each of LINE FEED, CARRIAGE RETURN, and the two-byte
/// sequence CARRIAGE RETURN + LINE FEED as a single line break when
/// computing `line` and `column`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Byte offset in the raw input stream.
    pub byte: u64,
    /// Line number of the character at this position.
    pub line: u64,
    /// Column number of the character, reset by every line break.
    pub column: u64,
    /// Number of open containers enclosing this position.
    pub depth: u64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
