//! MODE command handler.
//!
//! `MODE <channel> [<modes> [<args>...]]` or `MODE <nick> [<modes>]`. The
//! target's sigil decides which engine runs.

mod channel;
mod user;

use crate::error::HandlerResult;
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;

/// Handler for MODE command.
pub struct ModeHandler;

#[async_trait]
impl PostRegHandler for ModeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let target = msg.param(0).unwrap_or_default();
        let changes = msg.params.get(1..).unwrap_or_default();

        if target.starts_with('#') {
            channel::handle_channel_mode(ctx, user, target, changes)
        } else {
            user::handle_user_mode(ctx, user, target, changes)
        }
    }
}
