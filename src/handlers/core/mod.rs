//! Core handler infrastructure.
//!
//! This module contains the command tables, the context passed to every
//! handler and the three handler traits.
//!
//! ## Handler Traits
//!
//! - [`PreRegHandler`]: commands that build up a registration (NICK, USER, PASS)
//!   - Receives the connection's [`Handshake`]
//! - [`PostRegHandler`]: commands issued by a registered user (PRIVMSG, JOIN, ...)
//!   - Receives the connection's `Arc<User>`
//! - [`UniversalHandler`]: commands valid in any state (PING, PONG, QUIT)
//!
//! Which table is consulted depends only on the [`Session`] state, never on
//! what the handler looks like.

pub mod context;
pub mod registry;
pub mod traits;

pub use context::{Context, Handshake, Session, UserRequest};
pub use registry::{CommandSpec, Registry};
pub use traits::{PostRegHandler, PreRegHandler, UniversalHandler};
