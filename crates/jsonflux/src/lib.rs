//! Streaming, push-based JSON parsing and writing.
//!
//! This crate provides two symmetric components that process JSON without
//! ever building a document tree:
//!
//! - [`Parser`] consumes input bytes in chunks of any size and reports
//!   document structure through the [`Handler`] trait, one event per
//!   accepted token, with exact byte/line/column/depth locations.
//! - [`Writer`] accepts structural calls (`write_start_object`,
//!   `write_string`, ...) , validates their order, and emits encoded bytes
//!   through an [`Output`] sink.
//!
//! Both sides speak UTF-8, UTF-16 (LE/BE), and UTF-32 (LE/BE); the parser
//! can auto-detect the input encoding, and invalid sequences either fail
//! with a positioned [`Error`] or are replaced with U+FFFD under the
//! Unicode maximal-subpart rule. Optional extensions (comments, trailing
//! commas, `NaN`/`Infinity`, hex numbers, duplicate-member detection) are
//! off by default and enabled through [`ParserOptions`].
//!
//! The event stream is invariant under re-chunking: feeding a document
//! byte-by-byte produces exactly the same events, at the same locations,
//! as feeding it whole.
//!
//! ```
//! use jsonflux::{Handler, Location, Parser, ParserOptions, StringData, Verdict};
//!
//! #[derive(Default)]
//! struct Strings(Vec<String>);
//!
//! impl Handler for Strings {
//!     fn string(&mut self, value: &StringData<'_>, _at: Location) -> Verdict {
//!         self.0.push(String::from_utf8(value.bytes().to_vec()).unwrap());
//!         Verdict::Continue
//!     }
//! }
//!
//! let mut parser = Parser::new(ParserOptions::default());
//! let mut strings = Strings::default();
//! parser.parse(&mut strings, br#"["streaming","json"]"#, true).unwrap();
//! assert_eq!(strings.0, ["streaming", "json"]);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod context;
mod decoder;
mod encoder;
mod encoding;
mod error;
mod escape;
mod event;
mod handler;
mod literal;
mod location;
mod number;
mod options;
mod parser;
mod writer;

pub use encoding::Encoding;
pub use error::{Error, ErrorKind};
pub use event::{MemberVerdict, NumberData, SpecialNumber, StringAttributes, StringData, Verdict};
pub use handler::Handler;
pub use location::Location;
pub use number::NumberAttributes;
pub use options::{ParserOptions, WriterOptions};
pub use parser::Parser;
pub use writer::{Output, Writer};
