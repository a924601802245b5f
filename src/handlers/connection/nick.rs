//! NICK handlers, before and after registration.

use super::try_register;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handshake, PostRegHandler, PreRegHandler};
use crate::state::{User, validate_nick};
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;
use tracing::info;

/// Handler for NICK during registration.
///
/// Only checks availability here; the nick is claimed atomically when the
/// registration completes.
pub struct NickHandler;

#[async_trait]
impl PreRegHandler for NickHandler {
    async fn handle(
        &self,
        ctx: &mut Context<'_>,
        handshake: &mut Handshake,
        msg: &Message,
    ) -> HandlerResult {
        let requested = msg.param(0).ok_or(HandlerError::NoNicknameGiven)?;
        let nick = validate_nick(requested, ctx.server.config().limits.nick_len)?;

        if ctx.server.users.contains(&nick) {
            return Err(HandlerError::NicknameInUse(nick));
        }

        handshake.nick = Some(nick);
        try_register(ctx, handshake)
    }
}

/// Handler for NICK once registered.
///
/// `:<old address> NICK <new>` goes to the user and to everyone sharing a
/// channel with it, once each.
pub struct NickChangeHandler;

#[async_trait]
impl PostRegHandler for NickChangeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let requested = msg.param(0).ok_or(HandlerError::NoNicknameGiven)?;
        let nick = validate_nick(requested, ctx.server.config().limits.nick_len)?;

        if nick == user.nick() {
            return Ok(());
        }

        let old_prefix = user.prefix();
        let old_nick = ctx.server.users.rename(user, &nick)?;
        let peers = ctx.server.channels.rename_member(user, &old_nick);

        let change = Message::new("NICK", vec![nick.clone()]).with_prefix(old_prefix);
        user.send(change.clone());
        for peer in peers.iter().filter(|peer| !Arc::ptr_eq(peer, user)) {
            peer.send(change.clone());
        }

        info!(old = %old_nick, new = %nick, "nick changed");
        Ok(())
    }
}
