#![no_main]
//! Feeds arbitrary bytes to the parser under arbitrary options, whole and
//! re-chunked, and checks that the event stream (and any error) is
//! identical. The first two bytes of the fuzz input select the options and
//! the chunk split; the rest is the JSON payload.

use std::fmt::Write as _;

use jsonflux::{
    Handler, Location, MemberVerdict, NumberData, Parser, ParserOptions, SpecialNumber,
    StringData, Verdict,
};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Log(String);

impl Log {
    fn push(&mut self, tag: &str, at: Location) {
        let _ = write!(
            self.0,
            "{tag}@{},{},{},{};",
            at.byte, at.line, at.column, at.depth
        );
    }
}

impl Handler for Log {
    fn null(&mut self, at: Location) -> Verdict {
        self.push("n", at);
        Verdict::Continue
    }
    fn boolean(&mut self, value: bool, at: Location) -> Verdict {
        self.push(if value { "t" } else { "f" }, at);
        Verdict::Continue
    }
    fn string(&mut self, value: &StringData<'_>, at: Location) -> Verdict {
        let _ = write!(self.0, "s{:?}{:?}", value.bytes(), value.attributes());
        self.push("", at);
        Verdict::Continue
    }
    fn number(&mut self, value: &NumberData<'_>, at: Location) -> Verdict {
        let _ = write!(self.0, "#{}", value.text());
        self.push("", at);
        Verdict::Continue
    }
    fn special_number(&mut self, value: SpecialNumber, at: Location) -> Verdict {
        self.push(value.as_str(), at);
        Verdict::Continue
    }
    fn start_object(&mut self, at: Location) -> Verdict {
        self.push("{", at);
        Verdict::Continue
    }
    fn end_object(&mut self, at: Location) -> Verdict {
        self.push("}", at);
        Verdict::Continue
    }
    fn object_member(&mut self, name: &StringData<'_>, at: Location) -> MemberVerdict {
        let _ = write!(self.0, "m{:?}", name.bytes());
        self.push("", at);
        MemberVerdict::Continue
    }
    fn start_array(&mut self, at: Location) -> Verdict {
        self.push("[", at);
        Verdict::Continue
    }
    fn end_array(&mut self, at: Location) -> Verdict {
        self.push("]", at);
        Verdict::Continue
    }
    fn array_item(&mut self, is_first: bool, at: Location) -> Verdict {
        self.push(if is_first { "I" } else { "i" }, at);
        Verdict::Continue
    }
}

fn run(options: ParserOptions, chunks: &[&[u8]]) -> String {
    let mut parser = Parser::new(options);
    let mut log = Log::default();
    let last = chunks.len() - 1;
    for (i, chunk) in chunks.iter().enumerate() {
        if let Err(error) = parser.parse(&mut log, chunk, i == last) {
            let _ = write!(log.0, "!{:?}@{:?}", error.kind(), error.location());
            break;
        }
    }
    log.0
}

fuzz_target!(|data: &[u8]| {
    let [flags, split_seed, payload @ ..] = data else {
        return;
    };
    let options = ParserOptions {
        allow_bom: flags & 0x01 != 0,
        allow_comments: flags & 0x02 != 0,
        allow_trailing_commas: flags & 0x04 != 0,
        allow_special_numbers: flags & 0x08 != 0,
        allow_hex_numbers: flags & 0x10 != 0,
        replace_invalid_sequences: flags & 0x20 != 0,
        track_object_members: flags & 0x40 != 0,
        ..ParserOptions::default()
    };

    let whole = run(options, &[payload]);
    let split = usize::from(*split_seed) % (payload.len() + 1);
    let halves = run(options, &[&payload[..split], &payload[split..]]);
    assert_eq!(whole, halves, "chunking changed the event stream");
});
