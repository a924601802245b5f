//! Connection and registration handlers.
//!
//! Handles NICK, USER, PASS, PING, PONG, QUIT commands.

mod nick;
mod ping;
mod user;
mod welcome;

pub use nick::{NickChangeHandler, NickHandler};
pub use ping::{PingHandler, PongHandler, QuitHandler};
pub use user::{PassHandler, ReregisterHandler, UserHandler};
pub(crate) use welcome::try_register;
