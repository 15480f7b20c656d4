//! ICS text codec.
//!
//! Decoding turns calendar text into `DecodedEvent`s, encoding turns stored
//! `EventRecord`s back into a publishable calendar. For the fields feedcal
//! keeps, `decode(encode(records))` gives the records back.

mod datetime;
mod escape;
mod fold;
mod generate;
mod parse;

pub use datetime::{DEFAULT_FLOATING_OFFSET_SECS, format_utc, parse_datetime};
pub use escape::{escape_text, unescape_text};
pub use fold::{MAX_LINE_CHARS, fold_line, unfold};
pub use generate::{PRODID, encode};
pub use parse::{DecodeError, Decoded, Decoder, SkippedBlock, decode};
