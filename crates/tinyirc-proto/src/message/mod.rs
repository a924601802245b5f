//! Protocol messages.
//!
//! A [`Message`] is an optional origin [`Prefix`], a command verb (or a
//! three-digit numeric) and its parameters. Parsing is forgiving; encoding
//! enforces the 512-byte line limit.

mod parse;
mod serialize;
mod types;

pub use types::{Message, MAX_LINE_LEN};
