//! LUSERS handler.
//!
//! Returns statistics about the size of the network, which is always this
//! one server.

use crate::error::HandlerResult;
use crate::handlers::{Context, PostRegHandler};
use crate::state::{Server, User};
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler for LUSERS command.
pub struct LusersHandler;

#[async_trait]
impl PostRegHandler for LusersHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, _msg: &Message) -> HandlerResult {
        send_lusers(ctx.server, user);
        Ok(())
    }
}

/// 251, 254 and 255.
pub(crate) fn send_lusers(server: &Server, user: &User) {
    let name = server.name();
    let nick = user.nick();
    let users = server.users.len();

    user.send(Message::response(
        name,
        Response::RPL_LUSERCLIENT,
        vec![
            nick.clone(),
            format!("There are {users} users and 0 services on 1 servers"),
        ],
    ));
    user.send(Message::response(
        name,
        Response::RPL_LUSERCHANNELS,
        vec![
            nick.clone(),
            server.channels.len().to_string(),
            "channels formed".to_string(),
        ],
    ));
    user.send(Message::response(
        name,
        Response::RPL_LUSERME,
        vec![nick, format!("I have {users} clients and 0 servers")],
    ));
}
