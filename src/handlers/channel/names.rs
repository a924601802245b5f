//! NAMES command handler.

use crate::error::HandlerResult;
use crate::handlers::helpers::{channels_by_name, split_list};
use crate::handlers::{Context, PostRegHandler};
use crate::state::{ChannelRef, User};
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler for NAMES command.
///
/// `NAMES [<channel>{,<channel>}]`
///
/// Every listed (or, with no argument, every visible) channel gets its 353
/// lines with the per-channel end suppressed; one 366 closes the query.
pub struct NamesHandler;

#[async_trait]
impl PostRegHandler for NamesHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let server = ctx.server;
        let config = server.config();
        let nick = user.nick();

        let channels: Vec<ChannelRef> = match msg.param(0) {
            Some(list) => split_list(list)
                .filter_map(|name| server.channels.get(name))
                .collect(),
            None => channels_by_name(server),
        };

        for channel in channels {
            let channel = channel.lock();
            if channel.is_visible_to(&nick) {
                channel.send_names(user, config, false)?;
            }
        }

        let queried = msg.param(0).unwrap_or("*").to_string();
        ctx.send_reply(
            Response::RPL_ENDOFNAMES,
            vec![nick, queried, "End of NAMES list".to_string()],
        );
        Ok(())
    }
}
