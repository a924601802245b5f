//! Small utilities shared by handlers.

use crate::error::ChannelError;
use crate::state::{ChannelRef, Server, User};

/// Split a comma-separated target list, skipping empty items.
pub fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|item| !item.is_empty())
}

/// Report a refusal for one channel of a multi-channel command and carry on.
pub fn reply_channel_error(server: &Server, user: &User, channel: &str, err: ChannelError) {
    user.send(err.to_irc_reply(server.name(), &user.nick(), channel));
}

/// Every channel, ordered by name.
pub fn channels_by_name(server: &Server) -> Vec<ChannelRef> {
    let mut channels: Vec<(String, ChannelRef)> = server
        .channels
        .snapshot()
        .into_iter()
        .map(|channel| {
            let name = channel.lock().name().to_string();
            (name, channel)
        })
        .collect();
    channels.sort_by(|a, b| a.0.cmp(&b.0));
    channels.into_iter().map(|(_, channel)| channel).collect()
}
