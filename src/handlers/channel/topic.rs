//! TOPIC command handler.

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;

/// Handler for TOPIC command.
///
/// `TOPIC <channel> [<topic>]`: query without a topic, set (or clear with
/// an empty one) otherwise.
pub struct TopicHandler;

#[async_trait]
impl PostRegHandler for TopicHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let name = msg.param(0).unwrap_or_default();
        let channel = ctx
            .server
            .channels
            .get(name)
            .ok_or_else(|| HandlerError::channel(name, ChannelError::NoSuchChannel))?;
        let mut channel = channel.lock();

        match msg.param(1) {
            None => {
                if !channel.is_visible_to(&user.nick()) {
                    return Err(HandlerError::channel(name, ChannelError::NotOnChannel));
                }
                channel.send_topic(user, ctx.server.name());
                Ok(())
            }
            Some(text) => channel
                .set_topic(user, text)
                .map_err(|e| HandlerError::channel(channel.name(), e)),
        }
    }
}
