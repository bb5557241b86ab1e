//! The parse-event callback trait.

use crate::encoding::Encoding;
use crate::event::{MemberVerdict, NumberData, SpecialNumber, StringData, Verdict};
use crate::location::Location;

/// Receives structural events as the parser consumes input.
///
/// Every method has a default implementation returning
/// [`Verdict::Continue`], so an implementation only names the events it
/// cares about; `()` implements the trait with all defaults and turns the
/// parser into a pure validator.
///
/// `at` is the location of the token that triggered the event: the byte,
/// line, and column where the token begins, and the container depth it
/// sits at. Within one [`parse`](crate::Parser::parse) call events fire in
/// strict input order, and a single call may fire zero or many events.
///
/// Returning [`Verdict::Abort`] makes the parser fail with
/// [`ErrorKind::AbortedByHandler`](crate::ErrorKind::AbortedByHandler) at
/// the triggering token.
pub trait Handler {
    /// The input encoding was auto-detected. Fires once, before any other
    /// event, and only when no input encoding was configured.
    fn encoding_detected(&mut self, encoding: Encoding) -> Verdict {
        let _ = encoding;
        Verdict::Continue
    }

    /// A `null` literal.
    fn null(&mut self, at: Location) -> Verdict {
        let _ = at;
        Verdict::Continue
    }

    /// A `true` or `false` literal.
    fn boolean(&mut self, value: bool, at: Location) -> Verdict {
        let _ = (value, at);
        Verdict::Continue
    }

    /// A string value (not an object member name).
    fn string(&mut self, value: &StringData<'_>, at: Location) -> Verdict {
        let _ = (value, at);
        Verdict::Continue
    }

    /// A number value, as raw ASCII text. Call
    /// [`NumberData::value`] for the IEEE 754 interpretation.
    fn number(&mut self, value: &NumberData<'_>, at: Location) -> Verdict {
        let _ = (value, at);
        Verdict::Continue
    }

    /// A `NaN`, `Infinity`, or `-Infinity` literal (only with
    /// [`allow_special_numbers`](crate::ParserOptions::allow_special_numbers)).
    fn special_number(&mut self, value: SpecialNumber, at: Location) -> Verdict {
        let _ = (value, at);
        Verdict::Continue
    }

    /// The `{` opening an object. `at.depth` is the depth outside the new
    /// object.
    fn start_object(&mut self, at: Location) -> Verdict {
        let _ = at;
        Verdict::Continue
    }

    /// The `}` closing an object, reported at the depth outside it.
    fn end_object(&mut self, at: Location) -> Verdict {
        let _ = at;
        Verdict::Continue
    }

    /// An object member name. Fires before the member's value events.
    ///
    /// [`MemberVerdict::TreatAsDuplicate`] fails the parse exactly as if
    /// the parser's own member tracking had found the name already
    /// present.
    fn object_member(&mut self, name: &StringData<'_>, at: Location) -> MemberVerdict {
        let _ = (name, at);
        MemberVerdict::Continue
    }

    /// The `[` opening an array.
    fn start_array(&mut self, at: Location) -> Verdict {
        let _ = at;
        Verdict::Continue
    }

    /// The `]` closing an array.
    fn end_array(&mut self, at: Location) -> Verdict {
        let _ = at;
        Verdict::Continue
    }

    /// An array item is about to begin. Fires at the item's first token,
    /// before that token's own event.
    fn array_item(&mut self, is_first: bool, at: Location) -> Verdict {
        let _ = (is_first, at);
        Verdict::Continue
    }
}

/// The do-nothing handler: parsing with it validates the input.
impl Handler for () {}
