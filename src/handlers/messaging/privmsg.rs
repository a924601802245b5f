//! PRIVMSG and NOTICE handlers.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::{reply_channel_error, split_list};
use crate::handlers::{Context, PostRegHandler};
use crate::state::{Entity, User};
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;
use tracing::debug;

/// Handler for PRIVMSG command.
///
/// `PRIVMSG <target>{,<target>} :<text>`
pub struct PrivmsgHandler;

#[async_trait]
impl PostRegHandler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        relay(ctx, user, msg, "PRIVMSG", false);
        Ok(())
    }
}

/// Handler for NOTICE command.
pub struct NoticeHandler;

#[async_trait]
impl PostRegHandler for NoticeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        relay(ctx, user, msg, "NOTICE", true);
        Ok(())
    }
}

fn relay(ctx: &Context<'_>, user: &User, msg: &Message, command: &str, silent: bool) {
    let (Some(targets), Some(text)) = (msg.param(0), msg.param(1)) else {
        return;
    };
    let server = ctx.server;
    let router = server.router();

    for target in split_list(targets) {
        match router.resolve(target) {
            Some(Entity::User(recipient)) => {
                let relayed = Message::new(command, vec![recipient.nick(), text.to_string()])
                    .with_prefix(user.prefix());
                recipient.send(relayed);
            }
            Some(Entity::Channel(channel)) => {
                let channel = channel.lock();
                if let Err(e) = channel.send_message(user, command, text) {
                    debug!(channel = %channel.name(), error = %e, command, "message refused");
                    if !silent {
                        reply_channel_error(server, user, channel.name(), e);
                    }
                }
            }
            None if silent => {}
            None => {
                let err = HandlerError::NoSuchNick(target.to_string());
                if let Some(reply) = err.to_irc_reply(server.name(), &user.nick()) {
                    user.send(reply);
                }
            }
        }
    }
}
