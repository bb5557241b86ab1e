//! Input-side incremental decoding.
//!
//! The decoder consumes one byte at a time so that token and error
//! positions stay exact across arbitrary chunk boundaries. In replacement
//! mode it substitutes U+FFFD following the "maximal subpart" rule of
//! Unicode 5.2 §3.9: the longest prefix of a would-be sequence is replaced
//! by a single replacement character, and the byte (or, for UTF-16, the
//! code unit) that broke the sequence is re-examined as the start of a new
//! one.

use crate::encoding::Encoding;

pub(crate) const REPLACEMENT: u32 = 0xFFFD;

/// One decoded scalar and the number of input bytes it accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scalar {
    pub cp: u32,
    pub len: u8,
    pub replaced: bool,
}

impl Scalar {
    fn new(cp: u32, len: u8) -> Self {
        Self {
            cp,
            len,
            replaced: false,
        }
    }

    fn replacement(len: u8) -> Self {
        Self {
            cp: REPLACEMENT,
            len,
            replaced: true,
        }
    }
}

/// Outcome of feeding one byte (or flushing at end of input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The byte extended an incomplete sequence.
    NeedMore,
    /// One or two scalars were completed.
    Out(Scalar, Option<Scalar>),
    /// Strict mode: the sequence beginning `seq_len` bytes before the
    /// current input position is invalid.
    Invalid { seq_len: u8 },
}

impl Step {
    fn one(s: Scalar) -> Self {
        Step::Out(s, None)
    }
}

/// Incremental decoder for one of the five supported encodings.
#[derive(Debug)]
pub(crate) struct Decoder {
    encoding: Encoding,
    replace: bool,
    pending: [u8; 4],
    pending_len: u8,
    /// UTF-16: a leading surrogate waiting for its trailing mate.
    lead_surrogate: Option<u16>,
}

impl Decoder {
    pub fn new(encoding: Encoding, replace: bool) -> Self {
        Self {
            encoding,
            replace,
            pending: [0; 4],
            pending_len: 0,
            lead_surrogate: None,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Bytes buffered towards the next scalar (including a held leading
    /// surrogate's unit). The parser uses this to compute scalar start
    /// offsets: bytes fed minus bytes pending minus emitted lengths.
    pub fn pending_bytes(&self) -> u8 {
        self.pending_len + if self.lead_surrogate.is_some() { 2 } else { 0 }
    }

    pub fn feed(&mut self, byte: u8) -> Step {
        match self.encoding {
            Encoding::Utf8 => self.feed_utf8(byte),
            Encoding::Utf16Le | Encoding::Utf16Be => self.feed_utf16(byte),
            Encoding::Utf32Le | Encoding::Utf32Be => self.feed_utf32(byte),
        }
    }

    /// Flushes state at end of input. Incomplete sequences become a
    /// replacement (or an error in strict mode); a held leading surrogate
    /// is reported from its own start position.
    pub fn finish(&mut self) -> Step {
        let held = self.pending_bytes();
        if held == 0 {
            return Step::NeedMore;
        }
        if !self.replace {
            return Step::Invalid { seq_len: held };
        }
        let first = if self.lead_surrogate.take().is_some() {
            Some(Scalar::replacement(2))
        } else {
            None
        };
        let second = if self.pending_len > 0 {
            let len = self.pending_len;
            self.pending_len = 0;
            Some(Scalar::replacement(len))
        } else {
            None
        };
        match (first, second) {
            (Some(a), b) => Step::Out(a, b),
            (None, Some(b)) => Step::one(b),
            (None, None) => Step::NeedMore,
        }
    }

    // ---------------------------------------------------------------- UTF-8

    fn feed_utf8(&mut self, byte: u8) -> Step {
        if self.pending_len == 0 {
            return match byte {
                0x00..=0x7F => Step::one(Scalar::new(u32::from(byte), 1)),
                0xC2..=0xF4 => {
                    self.pending[0] = byte;
                    self.pending_len = 1;
                    Step::NeedMore
                }
                // 0x80..=0xC1 (continuations, overlong leads) and
                // 0xF5..=0xFF can never begin a sequence.
                _ => self.invalid_single(),
            };
        }

        let lead = self.pending[0];
        let ok = if self.pending_len == 1 {
            // The first continuation byte carries the overlong / surrogate /
            // out-of-range constraints.
            match lead {
                0xE0 => (0xA0..=0xBF).contains(&byte),
                0xED => (0x80..=0x9F).contains(&byte),
                0xF0 => (0x90..=0xBF).contains(&byte),
                0xF4 => (0x80..=0x8F).contains(&byte),
                _ => (0x80..=0xBF).contains(&byte),
            }
        } else {
            (0x80..=0xBF).contains(&byte)
        };
        if !ok {
            return self.fail_pending_and_retry(byte);
        }

        self.pending[self.pending_len as usize] = byte;
        self.pending_len += 1;
        let need = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => 4,
        };
        if self.pending_len < need {
            return Step::NeedMore;
        }

        let p = &self.pending;
        let cp = match need {
            2 => (u32::from(p[0] & 0x1F) << 6) | u32::from(p[1] & 0x3F),
            3 => {
                (u32::from(p[0] & 0x0F) << 12)
                    | (u32::from(p[1] & 0x3F) << 6)
                    | u32::from(p[2] & 0x3F)
            }
            _ => {
                (u32::from(p[0] & 0x07) << 18)
                    | (u32::from(p[1] & 0x3F) << 12)
                    | (u32::from(p[2] & 0x3F) << 6)
                    | u32::from(p[3] & 0x3F)
            }
        };
        self.pending_len = 0;
        Step::one(Scalar::new(cp, need))
    }

    /// The buffered bytes do not extend to a well-formed sequence: in
    /// replacement mode they become one U+FFFD and `byte` is re-examined
    /// as a fresh sequence start.
    fn fail_pending_and_retry(&mut self, byte: u8) -> Step {
        let held = self.pending_len;
        if !self.replace {
            return Step::Invalid {
                seq_len: held + 1,
            };
        }
        self.pending_len = 0;
        let first = Scalar::replacement(held);
        match self.feed_utf8(byte) {
            Step::NeedMore => Step::one(first),
            Step::Out(second, None) => Step::Out(first, Some(second)),
            // Re-examining a single byte yields at most one scalar.
            Step::Out(_, Some(_)) | Step::Invalid { .. } => unreachable!(),
        }
    }

    fn invalid_single(&mut self) -> Step {
        if self.replace {
            Step::one(Scalar::replacement(1))
        } else {
            Step::Invalid { seq_len: 1 }
        }
    }

    // --------------------------------------------------------------- UTF-16

    fn feed_utf16(&mut self, byte: u8) -> Step {
        self.pending[self.pending_len as usize] = byte;
        self.pending_len += 1;
        if self.pending_len < 2 {
            return Step::NeedMore;
        }
        let unit = if self.encoding == Encoding::Utf16Be {
            u16::from_be_bytes([self.pending[0], self.pending[1]])
        } else {
            u16::from_le_bytes([self.pending[0], self.pending[1]])
        };
        self.pending_len = 0;

        match self.lead_surrogate {
            None => match unit {
                0xD800..=0xDBFF => {
                    self.lead_surrogate = Some(unit);
                    Step::NeedMore
                }
                0xDC00..=0xDFFF => {
                    if self.replace {
                        Step::one(Scalar::replacement(2))
                    } else {
                        Step::Invalid { seq_len: 2 }
                    }
                }
                _ => Step::one(Scalar::new(u32::from(unit), 2)),
            },
            Some(lead) => {
                if (0xDC00..=0xDFFF).contains(&unit) {
                    self.lead_surrogate = None;
                    let cp = 0x10000
                        + ((u32::from(lead) - 0xD800) << 10)
                        + (u32::from(unit) - 0xDC00);
                    return Step::one(Scalar::new(cp, 4));
                }
                // Unpaired leading surrogate; the new unit is re-examined.
                if !self.replace {
                    return Step::Invalid { seq_len: 4 };
                }
                self.lead_surrogate = None;
                let first = Scalar::replacement(2);
                match unit {
                    0xD800..=0xDBFF => {
                        self.lead_surrogate = Some(unit);
                        Step::one(first)
                    }
                    _ => Step::Out(first, Some(Scalar::new(u32::from(unit), 2))),
                }
            }
        }
    }

    // --------------------------------------------------------------- UTF-32

    fn feed_utf32(&mut self, byte: u8) -> Step {
        self.pending[self.pending_len as usize] = byte;
        self.pending_len += 1;
        if self.pending_len < 4 {
            return Step::NeedMore;
        }
        let unit = if self.encoding == Encoding::Utf32Be {
            u32::from_be_bytes(self.pending)
        } else {
            u32::from_le_bytes(self.pending)
        };
        self.pending_len = 0;
        if unit > 0x10_FFFF || (0xD800..=0xDFFF).contains(&unit) {
            if self.replace {
                Step::one(Scalar::replacement(4))
            } else {
                Step::Invalid { seq_len: 4 }
            }
        } else {
            Step::one(Scalar::new(unit, 4))
        }
    }
}
