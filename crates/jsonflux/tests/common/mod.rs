//! Shared test support: a handler that renders the event stream as a
//! compact one-line summary, so expectations read as
//! `"u(8) {:0,0,0,0 m(70 69):1,0,1,1 ... }:26,0,26,0"`.
#![allow(dead_code)]

use std::fmt::Write as _;

use jsonflux::{
    Encoding, Error, ErrorKind, Handler, Location, MemberVerdict, NumberAttributes, NumberData,
    Parser, ParserOptions, SpecialNumber, StringAttributes, StringData, Verdict,
};

/// Records every event in the summary notation. Event heads:
/// `u(enc)` encoding detected, `n`/`t`/`f` literals, `s(attrs bytes)`
/// strings, `m(attrs bytes)` member names, `#(flags text)` numbers,
/// `{`/`}`/`[`/`]` containers, `i` array items; each followed by
/// `:byte,line,column,depth` when locations are enabled.
pub struct Recorder {
    pub log: String,
    pub with_locations: bool,
    /// Member names to answer with `TreatAsDuplicate`.
    pub duplicate_name: Option<Vec<u8>>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder {
            log: String::new(),
            with_locations: true,
            duplicate_name: None,
        }
    }

    pub fn without_locations() -> Self {
        Recorder {
            with_locations: false,
            ..Self::new()
        }
    }

    fn event(&mut self, head: &str, at: Location) {
        if !self.log.is_empty() {
            self.log.push(' ');
        }
        self.log.push_str(head);
        if self.with_locations {
            let _ = write!(
                self.log,
                ":{},{},{},{}",
                at.byte, at.line, at.column, at.depth
            );
        }
    }

    pub fn note_error(&mut self, error: Error) {
        if !self.log.is_empty() {
            self.log.push(' ');
        }
        let _ = write!(self.log, "!({})", error_name(error.kind()));
        if self.with_locations {
            let at = error.location();
            let _ = write!(
                self.log,
                ":{},{},{},{}",
                at.byte, at.line, at.column, at.depth
            );
        }
    }
}

fn string_body(data: &StringData<'_>) -> String {
    let attrs = data.attributes();
    let mut body = String::new();
    for (flag, letter) in [
        (StringAttributes::CONTAINS_NUL, 'z'),
        (StringAttributes::CONTAINS_CONTROL, 'c'),
        (StringAttributes::CONTAINS_NON_ASCII, 'a'),
        (StringAttributes::CONTAINS_NON_BMP, 'b'),
        (StringAttributes::CONTAINS_REPLACED, 'r'),
    ] {
        if attrs.contains(flag) {
            body.push(letter);
        }
    }
    if !body.is_empty() && !data.bytes().is_empty() {
        body.push(' ');
    }
    for (i, b) in data.bytes().iter().enumerate() {
        if i > 0 {
            body.push(' ');
        }
        let _ = write!(body, "{b:02X}");
    }
    body
}

fn number_body(data: &NumberData<'_>) -> String {
    let attrs = data.attributes();
    let mut body = String::new();
    for (flag, letter) in [
        (NumberAttributes::IS_NEGATIVE, '-'),
        (NumberAttributes::IS_HEX, 'x'),
        (NumberAttributes::CONTAINS_DECIMAL_POINT, '.'),
        (NumberAttributes::CONTAINS_EXPONENT, 'e'),
        (NumberAttributes::CONTAINS_NEGATIVE_EXPONENT, '-'),
    ] {
        if attrs.contains(flag) {
            body.push(letter);
        }
    }
    if !body.is_empty() {
        body.push(' ');
    }
    body.push_str(data.text());
    body
}

impl Handler for Recorder {
    fn encoding_detected(&mut self, encoding: Encoding) -> Verdict {
        let name = match encoding {
            Encoding::Utf8 => "8",
            Encoding::Utf16Le => "16LE",
            Encoding::Utf16Be => "16BE",
            Encoding::Utf32Le => "32LE",
            Encoding::Utf32Be => "32BE",
        };
        if !self.log.is_empty() {
            self.log.push(' ');
        }
        let _ = write!(self.log, "u({name})");
        Verdict::Continue
    }

    fn null(&mut self, at: Location) -> Verdict {
        self.event("n", at);
        Verdict::Continue
    }

    fn boolean(&mut self, value: bool, at: Location) -> Verdict {
        self.event(if value { "t" } else { "f" }, at);
        Verdict::Continue
    }

    fn string(&mut self, value: &StringData<'_>, at: Location) -> Verdict {
        let head = format!("s({})", string_body(value));
        self.event(&head, at);
        Verdict::Continue
    }

    fn number(&mut self, value: &NumberData<'_>, at: Location) -> Verdict {
        let head = format!("#({})", number_body(value));
        self.event(&head, at);
        Verdict::Continue
    }

    fn special_number(&mut self, value: SpecialNumber, at: Location) -> Verdict {
        let head = format!("#({})", value.as_str());
        self.event(&head, at);
        Verdict::Continue
    }

    fn start_object(&mut self, at: Location) -> Verdict {
        self.event("{", at);
        Verdict::Continue
    }

    fn end_object(&mut self, at: Location) -> Verdict {
        self.event("}", at);
        Verdict::Continue
    }

    fn object_member(&mut self, name: &StringData<'_>, at: Location) -> MemberVerdict {
        if self.duplicate_name.as_deref() == Some(name.bytes()) {
            return MemberVerdict::TreatAsDuplicate;
        }
        let head = format!("m({})", string_body(name));
        self.event(&head, at);
        MemberVerdict::Continue
    }

    fn start_array(&mut self, at: Location) -> Verdict {
        self.event("[", at);
        Verdict::Continue
    }

    fn end_array(&mut self, at: Location) -> Verdict {
        self.event("]", at);
        Verdict::Continue
    }

    fn array_item(&mut self, _is_first: bool, at: Location) -> Verdict {
        self.event("i", at);
        Verdict::Continue
    }
}

pub fn error_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::None => "None",
        ErrorKind::OutOfMemory => "OutOfMemory",
        ErrorKind::AbortedByHandler => "AbortedByHandler",
        ErrorKind::BomNotAllowed => "BOMNotAllowed",
        ErrorKind::InvalidEncodingSequence => "InvalidEncodingSequence",
        ErrorKind::UnknownToken => "UnknownToken",
        ErrorKind::UnexpectedToken => "UnexpectedToken",
        ErrorKind::IncompleteToken => "IncompleteToken",
        ErrorKind::ExpectedMoreTokens => "ExpectedMoreTokens",
        ErrorKind::UnescapedControlCharacter => "UnescapedControlCharacter",
        ErrorKind::InvalidEscapeSequence => "InvalidEscapeSequence",
        ErrorKind::UnpairedSurrogateEscapeSequence => "UnpairedSurrogateEscapeSequence",
        ErrorKind::TooLongString => "TooLongString",
        ErrorKind::InvalidNumber => "InvalidNumber",
        ErrorKind::TooLongNumber => "TooLongNumber",
        ErrorKind::DuplicateObjectMember => "DuplicateObjectMember",
    }
}

/// Feeds `chunks` in order (the last carries `is_final`) and returns the
/// recorded summary, with any error appended as `!(Kind):loc`.
pub fn run_chunks(options: ParserOptions, chunks: &[&[u8]], is_final: bool) -> String {
    let mut recorder = Recorder::new();
    run_chunks_into(&mut recorder, options, chunks, is_final);
    recorder.log
}

pub fn run_chunks_into(
    recorder: &mut Recorder,
    options: ParserOptions,
    chunks: &[&[u8]],
    is_final: bool,
) {
    let mut parser = Parser::new(options);
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.iter().enumerate() {
        let fin = is_final && i == last;
        if let Err(error) = parser.parse(recorder, chunk, fin) {
            recorder.note_error(error);
            return;
        }
    }
    if chunks.is_empty() && is_final {
        if let Err(error) = parser.parse(recorder, b"", true) {
            recorder.note_error(error);
        }
    }
}

/// Single-chunk convenience over [`run_chunks`].
pub fn run(options: ParserOptions, input: &[u8], is_final: bool) -> String {
    run_chunks(options, &[input], is_final)
}

/// `run` with default options and a final chunk.
pub fn run_default(input: &[u8]) -> String {
    run(ParserOptions::default(), input, true)
}
