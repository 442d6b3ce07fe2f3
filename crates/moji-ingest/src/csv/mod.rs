//! Delimited record reading and writing.
//!
//! Records are plain rows of strings. Header rows are not interpreted here;
//! callers decide what the first record means.

mod reader;
mod writer;

pub use reader::{decode_text, read_records, resolve_encoding};
pub use writer::{EncodedText, encode_text, write_records};

use moji_model::LineBreak;

/// One delimited record.
pub type Record = Vec<String>;

fn terminator(line_break: LineBreak) -> csv::Terminator {
    match line_break {
        LineBreak::Crlf => csv::Terminator::CRLF,
        LineBreak::Lf => csv::Terminator::Any(b'\n'),
        LineBreak::Cr => csv::Terminator::Any(b'\r'),
    }
}
