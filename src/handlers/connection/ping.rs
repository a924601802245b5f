//! PING, PONG and QUIT handlers.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, UniversalHandler};
use async_trait::async_trait;
use tinyirc_proto::{Message, Prefix, irc_eq};

/// Handler for PING command.
///
/// `PING <payload> [<server>]`
pub struct PingHandler;

#[async_trait]
impl UniversalHandler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let payload = msg.param(0).unwrap_or_default();
        let server_name = ctx.server_name().to_string();

        if let Some(destination) = msg.param(1) {
            if !irc_eq(destination, &server_name) {
                return Err(HandlerError::NoSuchServer(destination.to_string()));
            }
        }

        let pong = Message::new("PONG", vec![server_name.clone(), payload.to_string()])
            .with_prefix(Prefix::ServerName(server_name));
        ctx.sender.send(pong);
        Ok(())
    }
}

/// Handler for PONG command.
pub struct PongHandler;

#[async_trait]
impl UniversalHandler for PongHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        // The keepalive deadline lives in the connection loop.
        ctx.pong_received = true;
        Ok(())
    }
}

/// Handler for QUIT command.
pub struct QuitHandler;

#[async_trait]
impl UniversalHandler for QuitHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let quit_msg = msg.param(0).map(str::to_string);
        // Signal quit by returning Quit error that connection loop will handle
        Err(HandlerError::Quit(quit_msg))
    }
}
