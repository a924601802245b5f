//! Handler traits, one per session state a command is valid in.

use super::context::{Context, Handshake};
use crate::error::HandlerResult;
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;

/// Handler for commands valid before registration completes.
///
/// These handlers fill in the [`Handshake`]; once it holds both a nick and a
/// user request the registration is attempted.
#[async_trait]
pub trait PreRegHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut Context<'_>,
        handshake: &mut Handshake,
        msg: &Message,
    ) -> HandlerResult;
}

/// Handler for commands that require a registered user.
#[async_trait]
pub trait PostRegHandler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message)
    -> HandlerResult;
}

/// Handler for commands valid in any state (PING, PONG, QUIT).
#[async_trait]
pub trait UniversalHandler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
