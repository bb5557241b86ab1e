/// A Unicode encoding understood by the parser and writer.
///
/// The parser accepts input in any of these; when none is specified it
/// detects the encoding from the first bytes of the stream. String bytes
/// passed to handlers, and all writer output, use the configured output
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// UTF-8.
    Utf8,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// UTF-16, big-endian code units.
    Utf16Be,
    /// UTF-32, little-endian code units.
    Utf32Le,
    /// UTF-32, big-endian code units.
    Utf32Be,
}

/// Infers the input encoding from the first four bytes of the stream.
///
/// `x` below stands for any non-zero byte. BOM byte patterns take part in
/// detection whether or not a BOM is ultimately allowed; the decoded U+FEFF
/// is dealt with afterwards.
///
/// | first bytes   | encoding |
/// |---------------|----------|
/// | `00 00 FE FF` | UTF-32BE |
/// | `FF FE 00 00` | UTF-32LE |
/// | `FE FF ..`    | UTF-16BE |
/// | `FF FE ..`    | UTF-16LE |
/// | `EF BB BF ..` | UTF-8    |
/// | `00 00 ..`    | UTF-32BE |
/// | `00 x ..`     | UTF-16BE |
/// | `x 00 00 00`  | UTF-32LE |
/// | `x 00 00 x`   | (fails)  |
/// | `x 00 ..`     | UTF-16LE |
/// | `00 00 00 00` | (fails)  |
/// | anything else | UTF-8    |
pub(crate) fn detect(bytes: [u8; 4]) -> Option<Encoding> {
    match bytes {
        [0x00, 0x00, 0xFE, 0xFF] => Some(Encoding::Utf32Be),
        [0xFF, 0xFE, 0x00, 0x00] => Some(Encoding::Utf32Le),
        [0xFE, 0xFF, _, _] => Some(Encoding::Utf16Be),
        [0xFF, 0xFE, _, _] => Some(Encoding::Utf16Le),
        [0xEF, 0xBB, 0xBF, _] => Some(Encoding::Utf8),
        [0x00, 0x00, 0x00, 0x00] => None,
        [0x00, 0x00, _, _] => Some(Encoding::Utf32Be),
        [0x00, _, _, _] => Some(Encoding::Utf16Be),
        [_, 0x00, 0x00, 0x00] => Some(Encoding::Utf32Le),
        [_, 0x00, 0x00, _] => None,
        [_, 0x00, _, _] => Some(Encoding::Utf16Le),
        _ => Some(Encoding::Utf8),
    }
}

/// Detection over a short prefix, used when the input ends before four
/// bytes are available. A single non-ASCII byte still defaults to UTF-8;
/// the decoder reports any resulting invalid sequence.
pub(crate) fn detect_prefix(bytes: &[u8]) -> Option<Encoding> {
    match *bytes {
        [] => None,
        [0xEF, 0xBB, 0xBF] => Some(Encoding::Utf8),
        [0xFE, 0xFF, ..] => Some(Encoding::Utf16Be),
        [0xFF, 0xFE, ..] => Some(Encoding::Utf16Le),
        [0x00, ..] => Some(Encoding::Utf16Be),
        [_, 0x00, ..] => Some(Encoding::Utf16Le),
        _ => Some(Encoding::Utf8),
    }
}
