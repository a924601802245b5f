//! User mode handling.
//!
//! Handles MODE commands for users: `MODE <nick> [+/-modes]`
//! Users can only query/change their own modes.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::Context;
use crate::state::User;
use tinyirc_proto::{Message, Response, irc_eq};
use tracing::debug;

/// Handle user mode query/change.
///
/// Only letters listed in `server.user_modes` are accepted. Effective
/// changes are echoed even when an unknown letter is also reported.
pub(super) fn handle_user_mode(
    ctx: &Context<'_>,
    user: &User,
    target: &str,
    changes: &[String],
) -> HandlerResult {
    let nick = user.nick();
    if !irc_eq(target, &nick) {
        return Err(HandlerError::UsersDontMatch);
    }

    let Some(mode_string) = changes.first() else {
        ctx.send_reply(Response::RPL_UMODEIS, vec![nick, user.mode_string()]);
        return Ok(());
    };

    let supported = &ctx.server.config().server.user_modes;
    let mut applied = String::new();
    let mut polarity: Option<bool> = None;
    let mut unknown = None;
    let mut adding = true;

    for c in mode_string.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            c if supported.contains(c) => {
                if user.set_mode(c, adding) {
                    if polarity != Some(adding) {
                        applied.push(if adding { '+' } else { '-' });
                        polarity = Some(adding);
                    }
                    applied.push(c);
                }
            }
            c => unknown = unknown.or(Some(c)),
        }
    }

    if !applied.is_empty() {
        debug!(nick = %nick, modes = %applied, "user modes changed");
        let echo = Message::new("MODE", vec![nick.clone(), applied]).with_prefix(user.prefix());
        user.send(echo);
    }

    match unknown {
        Some(c) => Err(HandlerError::UnknownUserMode(c)),
        None => Ok(()),
    }
}
