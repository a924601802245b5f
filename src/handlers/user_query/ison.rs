//! ISON handler.

use crate::error::HandlerResult;
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler for ISON command.
///
/// `ISON <nick>{ <nick>}`. Nicks may arrive as separate parameters or as
/// one trailing parameter; both are split on whitespace.
pub struct IsonHandler;

#[async_trait]
impl PostRegHandler for IsonHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, msg: &Message) -> HandlerResult {
        let online: Vec<String> = msg
            .params
            .iter()
            .flat_map(|param| param.split_whitespace())
            .filter_map(|nick| ctx.server.users.get(nick))
            .map(|u| u.nick())
            .collect();

        ctx.send_reply(Response::RPL_ISON, vec![user.nick(), online.join(" ")]);
        Ok(())
    }
}
