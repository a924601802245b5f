//! IRC command handlers.
//!
//! Handlers are grouped by the kind of command they serve and registered in
//! [`Registry`], which picks the table for the connection's session state.
//! Every handler runs to completion without awaiting while it holds shared
//! state, so a command's effects are applied as one step.

pub mod channel;
pub mod connection;
pub mod core;
pub mod helpers;
pub mod messaging;
pub mod mode;
pub mod server_query;
pub mod user_query;

pub use self::core::{
    CommandSpec, Context, Handshake, PostRegHandler, PreRegHandler, Registry, Session,
    UniversalHandler, UserRequest,
};
