//! JOIN command handler.

use crate::error::HandlerResult;
use crate::handlers::helpers::{reply_channel_error, split_list};
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;
use tracing::debug;

/// Handler for JOIN command.
///
/// `JOIN <channel>{,<channel>} [<key>{,<key>}]` or `JOIN 0` to leave every
/// channel.
pub struct JoinHandler;

#[async_trait]
impl PostRegHandler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let server = ctx.server;
        let targets = msg.param(0).unwrap_or_default();

        if targets == "0" {
            for name in user.channels() {
                if let Err(e) = server.channels.part(user, &name, None) {
                    debug!(channel = %name, error = %e, "part on JOIN 0 failed");
                }
            }
            return Ok(());
        }

        let mut keys = msg.param(1).map(|k| k.split(',')).into_iter().flatten();
        for name in split_list(targets) {
            let key = keys.next().filter(|k| !k.is_empty());
            if let Err(e) = server.channels.join(user, name, key, server.config()) {
                debug!(channel = %name, error = %e, "join refused");
                reply_channel_error(server, user, name, e);
            }
        }
        Ok(())
    }
}
