//! PART command handler.

use crate::error::HandlerResult;
use crate::handlers::helpers::{reply_channel_error, split_list};
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;

/// Handler for PART command.
///
/// `PART <channel>{,<channel>} [<message>]`
pub struct PartHandler;

#[async_trait]
impl PostRegHandler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let server = ctx.server;
        let reason = msg.param(1);
        for name in split_list(msg.param(0).unwrap_or_default()) {
            if let Err(e) = server.channels.part(user, name, reason) {
                reply_channel_error(server, user, name, e);
            }
        }
        Ok(())
    }
}
