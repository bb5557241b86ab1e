//! The streaming push parser.
//!
//! Bytes flow through three stages inside [`Parser::parse`]: the encoding
//! pipeline decodes them to Unicode scalars (detecting the input encoding
//! first if necessary), the lexer folds scalars into tokens, and the
//! grammar admits each token and fires the matching [`Handler`] event.
//! All three stages are incremental per byte, which is what makes the
//! event stream invariant under re-chunking of the input.

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use crate::context::{ContextStack, Frame, ItemSlot, MemberSlot};
use crate::decoder::{Decoder, Scalar, Step};
use crate::encoder::encode_scalar;
use crate::encoding::{self, Encoding};
use crate::error::{Error, ErrorKind};
use crate::escape::{HexEscape, HexStep};
use crate::event::{MemberVerdict, NumberData, StringAttributes, StringData, Verdict};
use crate::handler::Handler;
use crate::literal::{self, Literal, LiteralMatcher};
use crate::location::Location;
use crate::number::NumberAttributes;
use crate::options::ParserOptions;

// ------------------------------------------------------------------------
// Lexer states
// ------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Between,
    /// Matching the tail of a keyword literal.
    Literal,
    /// A literal matched completely; the next character must be a token
    /// delimiter, otherwise the whole run is an unknown token.
    LiteralEnd(Literal),
    Sign,
    Zero,
    Integer,
    FractionStart,
    Fraction,
    ExponentStart,
    ExponentSign,
    Exponent,
    HexStart,
    Hex,
    Str,
    StrEscape,
    StrHexEscape,
    /// A leading surrogate escape was read; expecting `\`.
    StrPairBackslash,
    /// A leading surrogate escape was read; expecting `u`.
    StrPairU,
    CommentStart,
    LineComment,
    BlockComment,
    BlockStar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopState {
    /// Before the top-level value.
    Start,
    /// The top-level value is complete.
    Finished,
}

/// Encoding-pipeline phase: buffering bytes for auto-detection, or
/// decoding with a resolved encoding.
#[derive(Debug)]
enum InputState {
    Detecting { buf: [u8; 4], len: u8 },
    Ready(Decoder),
}

// ------------------------------------------------------------------------
// Parser
// ------------------------------------------------------------------------

/// The streaming JSON parser.
///
/// A parser is fed input in chunks of any size via [`parse`] and reports
/// document structure by calling [`Handler`] methods as tokens complete.
/// It builds no document tree, keeps its container state on an explicit
/// heap stack (nesting depth is bounded only by memory), and latches the
/// first error it encounters.
///
/// # Examples
///
/// ```
/// use jsonflux::{Handler, Location, NumberData, Parser, ParserOptions, Verdict};
///
/// #[derive(Default)]
/// struct Sum(f64);
///
/// impl Handler for Sum {
///     fn number(&mut self, value: &NumberData<'_>, _at: Location) -> Verdict {
///         self.0 += value.value();
///         Verdict::Continue
///     }
/// }
///
/// let mut parser = Parser::new(ParserOptions::default());
/// let mut sum = Sum::default();
/// parser.parse(&mut sum, b"[1, 2, ", false).unwrap();
/// parser.parse(&mut sum, b"3.5]", true).unwrap();
/// assert_eq!(sum.0, 6.5);
/// ```
///
/// [`parse`]: Parser::parse
#[derive(Debug)]
pub struct Parser {
    options: ParserOptions,

    input: InputState,
    bom_checked: bool,

    /// Bytes consumed so far (fed to the decoder).
    byte: u64,
    line: u64,
    column: u64,
    prev_cr: bool,

    lex: LexState,
    token_start: Location,
    /// Output-encoded bytes of the string token in flight.
    scratch: Vec<u8>,
    string_attrs: StringAttributes,
    /// ASCII text of the number token in flight.
    num_text: String,
    num_attrs: NumberAttributes,
    literal: LiteralMatcher,
    hex: HexEscape,
    high_surrogate: Option<u16>,
    /// Start of the escape sequence being decoded, for escape errors.
    escape_start: Location,

    top: TopState,
    stack: ContextStack,

    started: bool,
    finished: bool,
    error: Option<Error>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Parser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            input: match options.input_encoding {
                Some(encoding) => {
                    InputState::Ready(Decoder::new(encoding, options.replace_invalid_sequences))
                }
                None => InputState::Detecting {
                    buf: [0; 4],
                    len: 0,
                },
            },
            options,
            bom_checked: false,
            byte: 0,
            line: 0,
            column: 0,
            prev_cr: false,
            lex: LexState::Between,
            token_start: Location::default(),
            scratch: Vec::new(),
            string_attrs: StringAttributes::empty(),
            num_text: String::new(),
            num_attrs: NumberAttributes::empty(),
            literal: LiteralMatcher::none(),
            hex: HexEscape::new(),
            high_surrogate: None,
            escape_start: Location::default(),
            top: TopState::Start,
            stack: ContextStack::new(),
            started: false,
            finished: false,
            error: None,
        }
    }

    /// The options this parser was created with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The input encoding, once known: the configured one, or the detected
    /// one after detection has resolved.
    #[must_use]
    pub fn input_encoding(&self) -> Option<Encoding> {
        match &self.input {
            InputState::Ready(decoder) => Some(decoder.encoding()),
            InputState::Detecting { .. } => None,
        }
    }

    /// Whether [`parse`](Parser::parse) has been called since creation or
    /// the last reset.
    #[must_use]
    pub fn started_parsing(&self) -> bool {
        self.started
    }

    /// Whether parsing concluded, successfully (a final chunk was accepted)
    /// or not (an error was latched).
    #[must_use]
    pub fn finished_parsing(&self) -> bool {
        self.finished
    }

    /// The latched error, if any.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Returns the parser to its freshly-created state, preserving the
    /// options, so it can parse a new input stream.
    pub fn reset(&mut self) {
        *self = Self::new(self.options);
    }

    /// Pushes the next chunk of input.
    ///
    /// `is_final` asserts that no further bytes follow; the last chunk may
    /// be empty. Events fire on `handler` in input order; one call may
    /// fire zero or many events. On failure the error is latched and every
    /// later call returns it.
    ///
    /// # Errors
    ///
    /// Any [`ErrorKind`] from the taxonomy, positioned per its kind.
    ///
    /// # Panics
    ///
    /// If called again after a successful final chunk; call
    /// [`reset`](Parser::reset) to parse a new document.
    pub fn parse<H: Handler>(
        &mut self,
        handler: &mut H,
        bytes: &[u8],
        is_final: bool,
    ) -> Result<(), Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        assert!(
            !self.finished,
            "parse called after parsing finished; call reset() to parse a new document"
        );
        self.started = true;
        match self.parse_inner(handler, bytes, is_final) {
            Ok(()) => {
                if is_final {
                    self.finished = true;
                }
                Ok(())
            }
            Err(error) => {
                self.error = Some(error);
                self.finished = true;
                Err(error)
            }
        }
    }

    fn parse_inner<H: Handler>(
        &mut self,
        handler: &mut H,
        bytes: &[u8],
        is_final: bool,
    ) -> Result<(), Error> {
        let mut rest = bytes;

        if let InputState::Detecting { buf, len } = &mut self.input {
            while *len < 4 && !rest.is_empty() {
                buf[*len as usize] = rest[0];
                *len += 1;
                rest = &rest[1..];
            }
            let (buf, len) = (*buf, *len as usize);
            let resolved = if len == 4 {
                encoding::detect(buf)
            } else if is_final {
                if len == 0 {
                    return Err(Error::new(ErrorKind::ExpectedMoreTokens, self.here()));
                }
                encoding::detect_prefix(&buf[..len])
            } else {
                return Ok(());
            };
            let Some(detected) = resolved else {
                return Err(Error::new(
                    ErrorKind::InvalidEncodingSequence,
                    self.here(),
                ));
            };
            self.input = InputState::Ready(Decoder::new(
                detected,
                self.options.replace_invalid_sequences,
            ));
            self.check(handler.encoding_detected(detected), self.here())?;
            self.feed_bytes(handler, &buf[..len])?;
        }

        self.feed_bytes(handler, rest)?;
        if is_final {
            self.flush_decoder(handler)?;
            self.end_of_input(handler)?;
        }
        Ok(())
    }

    fn feed_bytes<H: Handler>(&mut self, handler: &mut H, bytes: &[u8]) -> Result<(), Error> {
        for &b in bytes {
            let step = match &mut self.input {
                InputState::Ready(decoder) => decoder.feed(b),
                InputState::Detecting { .. } => return Ok(()),
            };
            self.byte += 1;
            self.consume_step(handler, step)?;
        }
        Ok(())
    }

    fn flush_decoder<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error> {
        let step = match &mut self.input {
            InputState::Ready(decoder) => decoder.finish(),
            InputState::Detecting { .. } => return Ok(()),
        };
        self.consume_step(handler, step)
    }

    fn consume_step<H: Handler>(&mut self, handler: &mut H, step: Step) -> Result<(), Error> {
        match step {
            Step::NeedMore => Ok(()),
            Step::Out(first, second) => {
                let pending = match &self.input {
                    InputState::Ready(decoder) => u64::from(decoder.pending_bytes()),
                    InputState::Detecting { .. } => 0,
                };
                let lens = u64::from(first.len) + second.map_or(0, |s| u64::from(s.len));
                let mut start = self.byte - pending - lens;
                self.process_scalar(handler, first, start)?;
                if let Some(second) = second {
                    start += u64::from(first.len);
                    self.process_scalar(handler, second, start)?;
                }
                Ok(())
            }
            Step::Invalid { seq_len } => Err(Error::new(
                ErrorKind::InvalidEncodingSequence,
                Location {
                    byte: self.byte - u64::from(seq_len),
                    line: self.line,
                    column: self.column,
                    depth: self.stack.depth(),
                },
            )),
        }
    }

    // --------------------------------------------------------------------
    // Location tracking
    // --------------------------------------------------------------------

    fn here(&self) -> Location {
        Location {
            byte: self.byte,
            line: self.line,
            column: self.column,
            depth: self.stack.depth(),
        }
    }

    fn advance_position(&mut self, cp: u32) {
        match cp {
            0x0D => {
                self.line += 1;
                self.column = 0;
                self.prev_cr = true;
            }
            0x0A => {
                // A LF directly after CR is the second half of one break.
                if !self.prev_cr {
                    self.line += 1;
                    self.column = 0;
                }
                self.prev_cr = false;
            }
            _ => {
                self.column += 1;
                self.prev_cr = false;
            }
        }
    }

    fn process_scalar<H: Handler>(
        &mut self,
        handler: &mut H,
        scalar: Scalar,
        start_byte: u64,
    ) -> Result<(), Error> {
        let loc = Location {
            byte: start_byte,
            line: self.line,
            column: self.column,
            depth: self.stack.depth(),
        };
        if !self.bom_checked {
            self.bom_checked = true;
            if scalar.cp == 0xFEFF {
                if !self.options.allow_bom {
                    return Err(Error::new(ErrorKind::BomNotAllowed, loc));
                }
                self.advance_position(scalar.cp);
                return Ok(());
            }
        }
        let c = char::from_u32(scalar.cp).unwrap_or('\u{FFFD}');
        let result = self.lex_scalar(handler, c, scalar.replaced, loc);
        self.advance_position(scalar.cp);
        result
    }

    // --------------------------------------------------------------------
    // Lexer
    // --------------------------------------------------------------------

    fn lex_scalar<H: Handler>(
        &mut self,
        handler: &mut H,
        c: char,
        replaced: bool,
        loc: Location,
    ) -> Result<(), Error> {
        match self.lex {
            LexState::Between => self.lex_between(handler, c, replaced, loc),
            LexState::Literal => self.lex_literal(c),
            LexState::LiteralEnd(lit) => self.lex_literal_end(handler, lit, c, replaced, loc),
            LexState::Sign => self.lex_sign(c),
            LexState::Zero
            | LexState::Integer
            | LexState::FractionStart
            | LexState::Fraction
            | LexState::ExponentStart
            | LexState::ExponentSign
            | LexState::Exponent
            | LexState::HexStart
            | LexState::Hex => self.lex_number(handler, c, replaced, loc),
            LexState::Str => self.lex_str(handler, c, replaced, loc),
            LexState::StrEscape => self.lex_str_escape(c),
            LexState::StrHexEscape => self.lex_str_hex(c),
            LexState::StrPairBackslash => self.lex_str_pair(c, '\\', LexState::StrPairU),
            LexState::StrPairU => self.lex_str_pair(c, 'u', LexState::StrHexEscape),
            LexState::CommentStart => self.lex_comment_start(c),
            LexState::LineComment => {
                if matches!(c, '\n' | '\r') {
                    self.lex = LexState::Between;
                }
                Ok(())
            }
            LexState::BlockComment => {
                if c == '*' {
                    self.lex = LexState::BlockStar;
                }
                Ok(())
            }
            LexState::BlockStar => {
                self.lex = match c {
                    '/' => LexState::Between,
                    '*' => LexState::BlockStar,
                    _ => LexState::BlockComment,
                };
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn lex_between<H: Handler>(
        &mut self,
        handler: &mut H,
        c: char,
        _replaced: bool,
        loc: Location,
    ) -> Result<(), Error> {
        match c {
            ' ' | '\t' | '\n' | '\r' => Ok(()),
            '{' => self.on_open_object(handler, loc),
            '}' => self.on_close_object(handler, loc),
            '[' => self.on_open_array(handler, loc),
            ']' => self.on_close_array(handler, loc),
            ':' => self.on_colon(loc),
            ',' => self.on_comma(loc),
            '"' => {
                self.token_start = loc;
                self.scratch.clear();
                self.string_attrs = StringAttributes::empty();
                self.lex = LexState::Str;
                Ok(())
            }
            '-' => {
                self.token_start = loc;
                self.num_text.clear();
                self.num_attrs = NumberAttributes::IS_NEGATIVE;
                self.push_number_char('-')?;
                self.lex = LexState::Sign;
                Ok(())
            }
            '0' => {
                self.token_start = loc;
                self.num_text.clear();
                self.num_attrs = NumberAttributes::empty();
                self.push_number_char('0')?;
                self.lex = LexState::Zero;
                Ok(())
            }
            '1'..='9' => {
                self.token_start = loc;
                self.num_text.clear();
                self.num_attrs = NumberAttributes::empty();
                self.push_number_char(c)?;
                self.lex = LexState::Integer;
                Ok(())
            }
            'n' | 't' | 'f' | 'N' | 'I' => {
                match LiteralMatcher::start(c, self.options.allow_special_numbers) {
                    Some(matcher) => {
                        self.token_start = loc;
                        self.literal = matcher;
                        self.lex = LexState::Literal;
                        Ok(())
                    }
                    None => Err(Error::new(ErrorKind::UnknownToken, loc)),
                }
            }
            '/' if self.options.allow_comments => {
                self.token_start = loc;
                self.lex = LexState::CommentStart;
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::UnknownToken, loc)),
        }
    }

    fn lex_literal(&mut self, c: char) -> Result<(), Error> {
        match self.literal.step(c) {
            literal::Step::NeedMore => Ok(()),
            literal::Step::Done(lit) => {
                self.lex = LexState::LiteralEnd(lit);
                Ok(())
            }
            literal::Step::Reject => {
                Err(Error::new(ErrorKind::UnknownToken, self.token_start))
            }
        }
    }

    fn lex_literal_end<H: Handler>(
        &mut self,
        handler: &mut H,
        lit: Literal,
        c: char,
        replaced: bool,
        loc: Location,
    ) -> Result<(), Error> {
        if is_delimiter(c) {
            self.finish_literal(handler, lit)?;
            self.lex_scalar(handler, c, replaced, loc)
        } else {
            // `nullx` and friends are one unknown token, not null + noise.
            Err(Error::new(ErrorKind::UnknownToken, self.token_start))
        }
    }

    fn lex_sign(&mut self, c: char) -> Result<(), Error> {
        match c {
            '0' => {
                self.push_number_char('0')?;
                self.lex = LexState::Zero;
                Ok(())
            }
            '1'..='9' => {
                self.push_number_char(c)?;
                self.lex = LexState::Integer;
                Ok(())
            }
            'I' if self.options.allow_special_numbers => {
                self.num_text.clear();
                self.literal = LiteralMatcher::negative_infinity();
                self.lex = LexState::Literal;
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::UnknownToken, self.token_start)),
        }
    }

    fn lex_number<H: Handler>(
        &mut self,
        handler: &mut H,
        c: char,
        replaced: bool,
        loc: Location,
    ) -> Result<(), Error> {
        match (self.lex, c) {
            (LexState::Zero, 'x' | 'X')
                if self.options.allow_hex_numbers
                    && !self.num_attrs.contains(NumberAttributes::IS_NEGATIVE) =>
            {
                self.num_attrs |= NumberAttributes::IS_HEX;
                self.push_number_char(c)?;
                self.lex = LexState::HexStart;
                Ok(())
            }
            (LexState::Zero, '0'..='9') => {
                Err(Error::new(ErrorKind::InvalidNumber, self.token_start))
            }
            (LexState::Integer, '0'..='9') => self.push_number_char(c),
            (LexState::Zero | LexState::Integer, '.') => {
                self.num_attrs |= NumberAttributes::CONTAINS_DECIMAL_POINT;
                self.push_number_char('.')?;
                self.lex = LexState::FractionStart;
                Ok(())
            }
            (LexState::Zero | LexState::Integer | LexState::Fraction, 'e' | 'E') => {
                self.num_attrs |= NumberAttributes::CONTAINS_EXPONENT;
                self.push_number_char(c)?;
                self.lex = LexState::ExponentStart;
                Ok(())
            }
            (LexState::FractionStart | LexState::Fraction, '0'..='9') => {
                self.push_number_char(c)?;
                self.lex = LexState::Fraction;
                Ok(())
            }
            (LexState::ExponentStart, '+') => {
                self.push_number_char('+')?;
                self.lex = LexState::ExponentSign;
                Ok(())
            }
            (LexState::ExponentStart, '-') => {
                self.num_attrs |= NumberAttributes::CONTAINS_NEGATIVE_EXPONENT;
                self.push_number_char('-')?;
                self.lex = LexState::ExponentSign;
                Ok(())
            }
            (
                LexState::ExponentStart | LexState::ExponentSign | LexState::Exponent,
                '0'..='9',
            ) => {
                self.push_number_char(c)?;
                self.lex = LexState::Exponent;
                Ok(())
            }
            (LexState::HexStart | LexState::Hex, _) if c.is_ascii_hexdigit() => {
                self.push_number_char(c)?;
                self.lex = LexState::Hex;
                Ok(())
            }
            (
                LexState::FractionStart
                | LexState::ExponentStart
                | LexState::ExponentSign
                | LexState::HexStart,
                _,
            ) => Err(Error::new(ErrorKind::InvalidNumber, self.token_start)),
            // Anything else ends the number; the character is re-examined
            // as the start of the next token.
            _ => {
                self.finish_number(handler)?;
                self.lex_scalar(handler, c, replaced, loc)
            }
        }
    }

    fn push_number_char(&mut self, c: char) -> Result<(), Error> {
        if self.num_text.len() >= self.options.max_number_length {
            return Err(Error::new(ErrorKind::TooLongNumber, self.token_start));
        }
        self.num_text.push(c);
        Ok(())
    }

    fn lex_str<H: Handler>(
        &mut self,
        handler: &mut H,
        c: char,
        replaced: bool,
        loc: Location,
    ) -> Result<(), Error> {
        match c {
            '"' => self.finish_string(handler),
            '\\' => {
                self.escape_start = loc;
                self.lex = LexState::StrEscape;
                Ok(())
            }
            '\u{0}'..='\u{1F}' => {
                Err(Error::new(ErrorKind::UnescapedControlCharacter, loc))
            }
            _ => self.push_string_scalar(c as u32, replaced),
        }
    }

    fn lex_str_escape(&mut self, c: char) -> Result<(), Error> {
        let cp = match c {
            '"' | '\\' | '/' => c as u32,
            'b' => 0x08,
            'f' => 0x0C,
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'u' => {
                self.hex.reset();
                self.lex = LexState::StrHexEscape;
                return Ok(());
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidEscapeSequence,
                    self.escape_start,
                ));
            }
        };
        self.push_string_scalar(cp, false)?;
        self.lex = LexState::Str;
        Ok(())
    }

    fn lex_str_hex(&mut self, c: char) -> Result<(), Error> {
        match self.hex.push(c) {
            HexStep::NeedMore => Ok(()),
            HexStep::Reject => Err(Error::new(
                ErrorKind::InvalidEscapeSequence,
                self.escape_start,
            )),
            HexStep::Done(unit) => match (self.high_surrogate.take(), unit) {
                (Some(high), 0xDC00..=0xDFFF) => {
                    let cp = 0x10000
                        + ((u32::from(high) - 0xD800) << 10)
                        + (u32::from(unit) - 0xDC00);
                    self.push_string_scalar(cp, false)?;
                    self.lex = LexState::Str;
                    Ok(())
                }
                (Some(_), _) | (None, 0xDC00..=0xDFFF) => Err(Error::new(
                    ErrorKind::UnpairedSurrogateEscapeSequence,
                    self.escape_start,
                )),
                (None, 0xD800..=0xDBFF) => {
                    self.high_surrogate = Some(unit);
                    self.lex = LexState::StrPairBackslash;
                    Ok(())
                }
                (None, _) => {
                    self.push_string_scalar(u32::from(unit), false)?;
                    self.lex = LexState::Str;
                    Ok(())
                }
            },
        }
    }

    /// After a leading surrogate escape, only the exact characters of a
    /// trailing `\uXXXX` escape may follow.
    fn lex_str_pair(&mut self, c: char, expected: char, next: LexState) -> Result<(), Error> {
        if c == expected {
            if next == LexState::StrHexEscape {
                self.hex.reset();
            }
            self.lex = next;
            Ok(())
        } else {
            self.high_surrogate = None;
            Err(Error::new(
                ErrorKind::UnpairedSurrogateEscapeSequence,
                self.escape_start,
            ))
        }
    }

    fn push_string_scalar(&mut self, cp: u32, replaced: bool) -> Result<(), Error> {
        if cp == 0 {
            self.string_attrs |= StringAttributes::CONTAINS_NUL;
        }
        if cp <= 0x1F {
            self.string_attrs |= StringAttributes::CONTAINS_CONTROL;
        }
        if cp >= 0x80 {
            self.string_attrs |= StringAttributes::CONTAINS_NON_ASCII;
        }
        if cp >= 0x10000 {
            self.string_attrs |= StringAttributes::CONTAINS_NON_BMP;
        }
        if replaced {
            self.string_attrs |= StringAttributes::CONTAINS_REPLACED;
        }
        encode_scalar(cp, self.options.output_encoding, &mut self.scratch);
        if self.scratch.len() > self.options.max_string_length {
            return Err(Error::new(ErrorKind::TooLongString, self.token_start));
        }
        Ok(())
    }

    fn lex_comment_start(&mut self, c: char) -> Result<(), Error> {
        match c {
            '/' => {
                self.lex = LexState::LineComment;
                Ok(())
            }
            '*' => {
                self.lex = LexState::BlockComment;
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::UnknownToken, self.token_start)),
        }
    }

    // --------------------------------------------------------------------
    // Token completion and grammar dispatch
    // --------------------------------------------------------------------

    fn check(&self, verdict: Verdict, at: Location) -> Result<(), Error> {
        match verdict {
            Verdict::Continue => Ok(()),
            Verdict::Abort => Err(Error::new(ErrorKind::AbortedByHandler, at)),
        }
    }

    /// Admits a value token at `loc`, firing the array-item event when the
    /// value is an array item.
    fn before_value<H: Handler>(&mut self, handler: &mut H, loc: Location) -> Result<(), Error> {
        match self.stack.last() {
            None => match self.top {
                TopState::Start => Ok(()),
                TopState::Finished => Err(Error::new(ErrorKind::UnexpectedToken, loc)),
            },
            Some(Frame::Array { slot }) => match slot {
                ItemSlot::FirstItemOrEnd | ItemSlot::Item => {
                    let is_first = *slot == ItemSlot::FirstItemOrEnd;
                    self.check(handler.array_item(is_first, loc), loc)
                }
                ItemSlot::CommaOrEnd => Err(Error::new(ErrorKind::UnexpectedToken, loc)),
            },
            Some(Frame::Object { slot, .. }) => match slot {
                MemberSlot::Value => Ok(()),
                _ => Err(Error::new(ErrorKind::UnexpectedToken, loc)),
            },
        }
    }

    fn after_value(&mut self) {
        match self.stack.last_mut() {
            None => self.top = TopState::Finished,
            Some(Frame::Array { slot }) => *slot = ItemSlot::CommaOrEnd,
            Some(Frame::Object { slot, .. }) => *slot = MemberSlot::CommaOrEnd,
        }
    }

    fn finish_literal<H: Handler>(&mut self, handler: &mut H, lit: Literal) -> Result<(), Error> {
        let loc = self.token_start;
        self.lex = LexState::Between;
        self.before_value(handler, loc)?;
        let verdict = match lit {
            Literal::Null => handler.null(loc),
            Literal::True => handler.boolean(true, loc),
            Literal::False => handler.boolean(false, loc),
            Literal::Special(value) => handler.special_number(value, loc),
        };
        self.check(verdict, loc)?;
        self.after_value();
        Ok(())
    }

    fn finish_number<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error> {
        let loc = self.token_start;
        self.lex = LexState::Between;
        self.before_value(handler, loc)?;
        let text = mem::take(&mut self.num_text);
        let attrs = mem::replace(&mut self.num_attrs, NumberAttributes::empty());
        let verdict = handler.number(&NumberData::new(&text, attrs), loc);
        self.num_text = text;
        self.num_text.clear();
        self.check(verdict, loc)?;
        self.after_value();
        Ok(())
    }

    fn finish_string<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error> {
        let loc = self.token_start;
        self.lex = LexState::Between;
        let in_key_position = matches!(
            self.stack.last(),
            Some(Frame::Object {
                slot: MemberSlot::FirstKeyOrEnd | MemberSlot::Key,
                ..
            })
        );
        if in_key_position {
            self.on_member_name(handler, loc)
        } else {
            self.before_value(handler, loc)?;
            let bytes = mem::take(&mut self.scratch);
            let attrs = mem::replace(&mut self.string_attrs, StringAttributes::empty());
            let verdict = handler.string(&StringData::new(&bytes, attrs), loc);
            self.scratch = bytes;
            self.scratch.clear();
            self.check(verdict, loc)?;
            self.after_value();
            Ok(())
        }
    }

    fn on_member_name<H: Handler>(&mut self, handler: &mut H, loc: Location) -> Result<(), Error> {
        let bytes = mem::take(&mut self.scratch);
        let attrs = mem::replace(&mut self.string_attrs, StringAttributes::empty());
        // The tracking set is consulted before the handler runs; a
        // duplicate name fires no member event.
        if let Some(Frame::Object {
            members: Some(set), ..
        }) = self.stack.last()
        {
            if set.contains(bytes.as_slice()) {
                return Err(Error::new(ErrorKind::DuplicateObjectMember, loc));
            }
        }
        match handler.object_member(&StringData::new(&bytes, attrs), loc) {
            MemberVerdict::Continue => {}
            MemberVerdict::Abort => {
                return Err(Error::new(ErrorKind::AbortedByHandler, loc));
            }
            MemberVerdict::TreatAsDuplicate => {
                return Err(Error::new(ErrorKind::DuplicateObjectMember, loc));
            }
        }
        if let Some(Frame::Object { slot, members }) = self.stack.last_mut() {
            if let Some(set) = members {
                set.insert(bytes.as_slice().into());
            }
            *slot = MemberSlot::Colon;
        }
        self.scratch = bytes;
        self.scratch.clear();
        Ok(())
    }

    fn on_open_object<H: Handler>(&mut self, handler: &mut H, loc: Location) -> Result<(), Error> {
        self.before_value(handler, loc)?;
        self.check(handler.start_object(loc), loc)?;
        self.stack
            .push(Frame::object(self.options.track_object_members));
        Ok(())
    }

    fn on_close_object<H: Handler>(&mut self, handler: &mut H, loc: Location) -> Result<(), Error> {
        let legal = matches!(
            self.stack.last(),
            Some(Frame::Object { slot, .. })
                if matches!(slot, MemberSlot::FirstKeyOrEnd | MemberSlot::CommaOrEnd)
                    || (*slot == MemberSlot::Key && self.options.allow_trailing_commas)
        );
        if !legal {
            return Err(Error::new(ErrorKind::UnexpectedToken, loc));
        }
        self.stack.pop();
        let at = Location {
            depth: self.stack.depth(),
            ..loc
        };
        self.check(handler.end_object(at), at)?;
        self.after_value();
        Ok(())
    }

    fn on_open_array<H: Handler>(&mut self, handler: &mut H, loc: Location) -> Result<(), Error> {
        self.before_value(handler, loc)?;
        self.check(handler.start_array(loc), loc)?;
        self.stack.push(Frame::array());
        Ok(())
    }

    fn on_close_array<H: Handler>(&mut self, handler: &mut H, loc: Location) -> Result<(), Error> {
        let legal = matches!(
            self.stack.last(),
            Some(Frame::Array { slot })
                if matches!(slot, ItemSlot::FirstItemOrEnd | ItemSlot::CommaOrEnd)
                    || (*slot == ItemSlot::Item && self.options.allow_trailing_commas)
        );
        if !legal {
            return Err(Error::new(ErrorKind::UnexpectedToken, loc));
        }
        self.stack.pop();
        let at = Location {
            depth: self.stack.depth(),
            ..loc
        };
        self.check(handler.end_array(at), at)?;
        self.after_value();
        Ok(())
    }

    fn on_colon(&mut self, loc: Location) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Frame::Object { slot, .. }) if *slot == MemberSlot::Colon => {
                *slot = MemberSlot::Value;
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::UnexpectedToken, loc)),
        }
    }

    fn on_comma(&mut self, loc: Location) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Frame::Array { slot }) if *slot == ItemSlot::CommaOrEnd => {
                *slot = ItemSlot::Item;
                Ok(())
            }
            Some(Frame::Object { slot, .. }) if *slot == MemberSlot::CommaOrEnd => {
                *slot = MemberSlot::Key;
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::UnexpectedToken, loc)),
        }
    }

    // --------------------------------------------------------------------
    // End of input
    // --------------------------------------------------------------------

    fn end_of_input<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error> {
        match self.lex {
            LexState::Between | LexState::LineComment => {}
            LexState::LiteralEnd(lit) => self.finish_literal(handler, lit)?,
            LexState::Literal | LexState::CommentStart => {
                return Err(Error::new(ErrorKind::UnknownToken, self.token_start));
            }
            LexState::Zero
            | LexState::Integer
            | LexState::Fraction
            | LexState::Exponent
            | LexState::Hex => self.finish_number(handler)?,
            LexState::Sign
            | LexState::FractionStart
            | LexState::ExponentStart
            | LexState::ExponentSign
            | LexState::HexStart
            | LexState::Str
            | LexState::StrEscape
            | LexState::StrHexEscape
            | LexState::StrPairBackslash
            | LexState::StrPairU
            | LexState::BlockComment
            | LexState::BlockStar => {
                return Err(Error::new(ErrorKind::IncompleteToken, self.token_start));
            }
        }
        if self.stack.is_empty() && self.top == TopState::Finished {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::ExpectedMoreTokens, self.here()))
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\n' | '\r' | '{' | '}' | '[' | ']' | ':' | ',' | '"' | '/'
    )
}
