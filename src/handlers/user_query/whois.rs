//! WHOIS handler.

use crate::error::HandlerResult;
use crate::handlers::helpers::split_list;
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler for WHOIS command.
///
/// `WHOIS [<server>] <nick>{,<nick>}`
///
/// The server argument is accepted and ignored; the nick list is always the
/// last parameter.
pub struct WhoisHandler;

#[async_trait]
impl PostRegHandler for WhoisHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let me = user.nick();
        let Some(list) = msg.params.last() else {
            return Ok(());
        };

        for nick in split_list(list) {
            let shown = match ctx.server.users.get(nick) {
                Some(target) => {
                    send_whois(ctx, &me, &target);
                    target.nick()
                }
                None => {
                    ctx.send_reply(
                        Response::ERR_NOSUCHNICK,
                        vec![me.clone(), nick.to_string(), "No such nick/channel".to_string()],
                    );
                    nick.to_string()
                }
            };
            ctx.send_reply(
                Response::RPL_ENDOFWHOIS,
                vec![me.clone(), shown, "End of WHOIS list".to_string()],
            );
        }
        Ok(())
    }
}

fn send_whois(ctx: &Context<'_>, me: &str, target: &User) {
    let nick = target.nick();
    ctx.send_reply(
        Response::RPL_WHOISUSER,
        vec![
            me.to_string(),
            nick.clone(),
            target.username.clone(),
            target.hostname.clone(),
            "*".to_string(),
            target.realname.clone(),
        ],
    );

    let channels = visible_channels(ctx, me, target);
    if !channels.is_empty() {
        ctx.send_reply(
            Response::RPL_WHOISCHANNELS,
            vec![me.to_string(), nick.clone(), channels.join(" ")],
        );
    }

    ctx.send_reply(
        Response::RPL_WHOISSERVER,
        vec![
            me.to_string(),
            nick,
            target.servername.clone(),
            ctx.server.config().server.description.clone(),
        ],
    );
}

/// The target's channels the asker may see, each with the target's prefix.
fn visible_channels(ctx: &Context<'_>, me: &str, target: &User) -> Vec<String> {
    let nick = target.nick();
    target
        .channels()
        .into_iter()
        .filter_map(|name| {
            let channel = ctx.server.channels.get(&name)?;
            let channel = channel.lock();
            if !channel.is_visible_to(me) {
                return None;
            }
            let member = channel.member(&nick)?;
            Some(format!("{}{}", member.prefix(), channel.name()))
        })
        .collect()
}
