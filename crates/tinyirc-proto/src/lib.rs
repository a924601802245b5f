//! # tinyirc-proto
//!
//! Wire-level building blocks for the tinyircd daemon:
//!
//! - [`Message`] parsing (nom) and encoding with the 512-byte line cap
//! - [`Response`] numerics
//! - rfc1459 case mapping
//! - address mask normalization and glob matching
//! - channel mode-string parsing
//! - a tokio codec ([`IrcCodec`]) behind the default `tokio` feature
//!
//! ```rust
//! use tinyirc_proto::{Message, Prefix};
//!
//! let msg: Message = ":bob!~b@10.0.0.1 PRIVMSG #rust :hello there".parse().unwrap();
//! assert_eq!(msg.source_nickname(), Some("bob"));
//! assert_eq!(msg.params, vec!["#rust", "hello there"]);
//!
//! let reply = Message::privmsg("#rust", "hi").with_prefix(Prefix::new("amy", "~a", "h"));
//! assert_eq!(reply.to_line().unwrap(), ":amy!~a@h PRIVMSG #rust hi\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod error;
pub mod mask;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod response;

#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::mask::{matches_mask, normalize_mask};
pub use self::message::{Message, MAX_LINE_LEN};
pub use self::mode::{format_mode_changes, parse_channel_modes, ChannelMode, ModeChange};
pub use self::prefix::Prefix;
pub use self::response::Response;

#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
