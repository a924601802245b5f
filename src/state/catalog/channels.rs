//! Channel name to channel map.
//!
//! Channels exist only while they have members. The catalog creates one on
//! the first join and unlinks it when the last member leaves. Unlinking
//! happens inside `remove_if` with the channel locked, and marks the channel
//! closed, so a joiner that fetched the handle just before can notice and
//! retry against a fresh channel.
//!
//! Lock order is map shard, then channel. Nothing here touches the map while
//! holding a channel lock.

use crate::config::Config;
use crate::error::ChannelError;
use crate::state::User;
use crate::state::channel::{Channel, validate_name};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tinyirc_proto::irc_to_lower;
use tracing::debug;

/// Shared handle to a live channel.
pub type ChannelRef = Arc<Mutex<Channel>>;

#[derive(Debug, Default)]
pub struct ChannelCatalog {
    channels: DashMap<String, ChannelRef>,
}

impl ChannelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ChannelRef> {
        self.channels
            .get(&irc_to_lower(name))
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(&irc_to_lower(name))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn snapshot(&self) -> Vec<ChannelRef> {
        self.channels
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Join `user` to `name`, creating the channel if needed.
    ///
    /// Returns `Ok(false)` if the user was already a member.
    pub fn join(
        &self,
        user: &Arc<User>,
        name: &str,
        key: Option<&str>,
        config: &Config,
    ) -> Result<bool, ChannelError> {
        let max_len = config.limits.channel_len;
        validate_name(name, max_len)?;
        let folded = irc_to_lower(name);

        loop {
            let channel = {
                let entry = self
                    .channels
                    .entry(folded.clone())
                    .or_try_insert_with(|| {
                        debug!(channel = %name, "creating channel");
                        Channel::new(name, max_len).map(|c| Arc::new(Mutex::new(c)))
                    })?;
                Arc::clone(entry.value())
            };

            let mut guard = channel.lock();
            if guard.is_closed() {
                continue;
            }
            let result = guard.join(user, key, config);
            let empty = guard.is_empty();
            drop(guard);

            // A refused first joiner leaves nothing behind.
            if empty {
                self.remove_if_empty(&folded);
            }
            return result;
        }
    }

    /// Part `user` from `name`, dropping the channel if it empties.
    pub fn part(
        &self,
        user: &Arc<User>,
        name: &str,
        message: Option<&str>,
    ) -> Result<(), ChannelError> {
        let channel = self.get(name).ok_or(ChannelError::NoSuchChannel)?;
        let empty = {
            let mut guard = channel.lock();
            guard.part(user, message)?;
            guard.is_empty()
        };
        if empty {
            self.remove_if_empty(name);
        }
        Ok(())
    }

    /// Remove a disconnecting user from every channel it is in.
    ///
    /// Each peer receives the QUIT once no matter how many channels it
    /// shares with the user.
    pub fn quit_all(&self, user: &User, message: &str) {
        let mut notified = HashSet::new();
        for name in user.channels() {
            let Some(channel) = self.get(&name) else {
                continue;
            };
            let empty = {
                let mut guard = channel.lock();
                guard.quit(user, message, &mut notified);
                guard.is_empty()
            };
            if empty {
                self.remove_if_empty(&name);
            }
        }
    }

    /// Re-key the user in each of its channels after a nick change.
    ///
    /// Returns every user sharing a channel with it, itself included, once.
    pub fn rename_member(&self, user: &User, old_nick: &str) -> Vec<Arc<User>> {
        let new_nick = user.nick();
        let mut seen = HashSet::new();
        let mut peers = Vec::new();

        for name in user.channels() {
            let Some(channel) = self.get(&name) else {
                continue;
            };
            let mut guard = channel.lock();
            guard.rename_member(old_nick, &new_nick);
            for member in guard.users() {
                if seen.insert(member.key()) {
                    peers.push(member);
                }
            }
        }
        peers
    }

    /// Unlink `name` if it has no members, marking it closed.
    fn remove_if_empty(&self, name: &str) {
        let removed = self.channels.remove_if(&irc_to_lower(name), |_, channel| {
            let mut guard = channel.lock();
            if guard.is_empty() {
                guard.close();
                true
            } else {
                false
            }
        });
        if removed.is_some() {
            debug!(channel = %name, "channel emptied and removed");
        }
    }
}
