//! LIST command handler.

use crate::error::HandlerResult;
use crate::handlers::helpers::{channels_by_name, split_list};
use crate::handlers::{Context, PostRegHandler};
use crate::state::{ChannelRef, User};
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler for LIST command.
///
/// `LIST [<channel>{,<channel>}]`
///
/// Secret channels are only listed for their members.
pub struct ListHandler;

#[async_trait]
impl PostRegHandler for ListHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let server = ctx.server;
        let nick = user.nick();

        let channels: Vec<ChannelRef> = match msg.param(0) {
            Some(list) => split_list(list)
                .filter_map(|name| server.channels.get(name))
                .collect(),
            None => channels_by_name(server),
        };

        ctx.send_reply(
            Response::RPL_LISTSTART,
            vec![nick.clone(), "Channel".to_string(), "Users  Name".to_string()],
        );

        for channel in channels {
            let channel = channel.lock();
            if !channel.is_visible_to(&nick) {
                continue;
            }
            ctx.send_reply(
                Response::RPL_LIST,
                vec![
                    nick.clone(),
                    channel.name().to_string(),
                    channel.member_count().to_string(),
                    channel
                        .topic()
                        .map(|t| t.text.clone())
                        .unwrap_or_default(),
                ],
            );
        }

        ctx.send_reply(
            Response::RPL_LISTEND,
            vec![nick, "End of LIST".to_string()],
        );
        Ok(())
    }
}
