//! PRIVMSG and NOTICE.
//!
//! Both resolve each comma-separated target through the entity router and
//! relay to a user or a channel. They differ only in error reporting:
//! NOTICE never generates a reply.

mod privmsg;

pub use privmsg::{NoticeHandler, PrivmsgHandler};
