//! Byte-by-byte matcher for keyword literals.

use crate::event::SpecialNumber;

/// The keyword literals the lexer recognizes. `NaN`, `Infinity`, and
/// `-Infinity` only take part when special numbers are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    True,
    False,
    Special(SpecialNumber),
}

/// What happened after feeding one more character into the matcher.
pub(crate) enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched *and* consumed the last byte of the literal.
    Done(Literal),
    /// Character did not match the expected byte.
    Reject,
}

/// `None` ➜ not in the middle of a literal.
/// `Some` ➜ `(remaining_bytes, literal)` while matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatcher(Option<(&'static [u8], Literal)>);

impl LiteralMatcher {
    /// No literal is in flight.
    pub fn none() -> Self {
        LiteralMatcher(None)
    }

    /// Starts matching after the literal's first character, or returns
    /// `None` if `first` begins no literal under the current options.
    pub fn start(first: char, allow_special: bool) -> Option<Self> {
        let state = match first {
            'n' => (b"ull".as_slice(), Literal::Null),
            't' => (b"rue".as_slice(), Literal::True),
            'f' => (b"alse".as_slice(), Literal::False),
            'N' if allow_special => (b"aN".as_slice(), Literal::Special(SpecialNumber::NaN)),
            'I' if allow_special => (
                b"nfinity".as_slice(),
                Literal::Special(SpecialNumber::Infinity),
            ),
            _ => return None,
        };
        Some(LiteralMatcher(Some(state)))
    }

    /// Starts matching `-Infinity` after its leading `-I`.
    pub fn negative_infinity() -> Self {
        LiteralMatcher(Some((
            b"nfinity".as_slice(),
            Literal::Special(SpecialNumber::NegativeInfinity),
        )))
    }

    /// Gives the matcher the next input character and learns what to do.
    pub fn step(&mut self, c: char) -> Step {
        let Some((bytes, literal)) = self.0.take() else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((&expected, rest)) if expected as char == c => {
                if rest.is_empty() {
                    Step::Done(literal)
                } else {
                    self.0 = Some((rest, literal));
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
