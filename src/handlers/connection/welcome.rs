//! Registration completion and the welcome burst.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::server_query::{send_lusers, send_motd};
use crate::handlers::{Context, Handshake};
use crate::state::{Server, User, UserInfo};
use std::sync::Arc;
use tinyirc_proto::{Message, Response};
use tracing::info;

/// Complete the registration if both NICK and USER have arrived.
///
/// Checks the connection password, claims the nick, clears the handshake
/// buffers and sends the welcome burst. On success the new user is left in
/// `handshake.completed` for the registry to switch the session over.
pub(crate) fn try_register(ctx: &mut Context<'_>, handshake: &mut Handshake) -> HandlerResult {
    if !handshake.can_register() {
        return Ok(());
    }

    let config = ctx.server.config();
    if let Some(expected) = &config.server.password {
        if handshake.password.as_deref() != Some(expected.as_str()) {
            return Err(HandlerError::PasswordMismatch);
        }
    }

    let (Some(nick), Some(request)) = (handshake.nick.clone(), handshake.user.clone()) else {
        return Ok(());
    };

    let info = UserInfo {
        username: format!("~{}", request.username),
        hostname: ctx.remote_addr.ip().to_string(),
        servername: config.server.name.clone(),
        realname: request.realname,
    };
    let user = Arc::new(User::new(nick, info, ctx.sender.clone()));

    // Lost the race for the nick since NICK was accepted.
    if let Err(e) = ctx.server.add_user(Arc::clone(&user)) {
        handshake.nick = None;
        return Err(e);
    }

    user.register();
    handshake.nick = None;
    handshake.user = None;
    handshake.password = None;

    info!(nick = %user.nick(), address = %user.address(), "client registered");
    send_welcome(ctx.server, &user);
    handshake.completed = Some(user);
    Ok(())
}

/// 001-004, then LUSERS, then the MOTD.
pub(crate) fn send_welcome(server: &Server, user: &User) {
    let config = server.config();
    let name = server.name();
    let nick = user.nick();

    let reply = |response: Response, params: Vec<String>| {
        user.send(Message::response(name, response, params));
    };

    reply(
        Response::RPL_WELCOME,
        vec![
            nick.clone(),
            format!("Welcome to the Internet Relay Network {}", user.address()),
        ],
    );
    reply(
        Response::RPL_YOURHOST,
        vec![
            nick.clone(),
            format!(
                "Your host is {}, running version {}",
                name, config.server.version
            ),
        ],
    );
    reply(
        Response::RPL_CREATED,
        vec![
            nick.clone(),
            format!("This server was created {}", config.server.created),
        ],
    );
    reply(
        Response::RPL_MYINFO,
        vec![
            nick,
            name.to_string(),
            config.server.version.clone(),
            config.server.user_modes.clone(),
            config.server.channel_modes.clone(),
        ],
    );

    send_lusers(server, user);
    send_motd(server, user);
}
