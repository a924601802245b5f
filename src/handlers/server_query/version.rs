//! VERSION handler.

use crate::error::HandlerResult;
use crate::handlers::{Context, PostRegHandler};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler for VERSION command.
///
/// `351 <nick> <version>. <server> :<description>`
pub struct VersionHandler;

#[async_trait]
impl PostRegHandler for VersionHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, _msg: &Message) -> HandlerResult {
        let config = ctx.server.config();
        ctx.send_reply(
            Response::RPL_VERSION,
            vec![
                user.nick(),
                format!("{}.", config.server.version),
                config.server.name.clone(),
                config.server.description.clone(),
            ],
        );
        Ok(())
    }
}
