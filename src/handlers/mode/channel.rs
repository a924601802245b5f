//! Channel mode query and changes.

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::handlers::Context;
use crate::state::User;
use tracing::debug;

/// Reply 324 without a mode string, otherwise run the mode engine.
pub(super) fn handle_channel_mode(
    ctx: &Context<'_>,
    user: &User,
    target: &str,
    changes: &[String],
) -> HandlerResult {
    let channel = ctx
        .server
        .channels
        .get(target)
        .ok_or_else(|| HandlerError::channel(target, ChannelError::NoSuchChannel))?;
    let mut channel = channel.lock();

    if changes.is_empty() {
        channel.send_modes(user, ctx.server_name());
        return Ok(());
    }

    debug!(channel = %channel.name(), modes = ?changes, "channel mode request");
    channel
        .apply_modes(user, changes, ctx.server.config())
        .map_err(|e| HandlerError::channel(channel.name(), e))
}
