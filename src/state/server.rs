//! The Server - central shared state for the daemon.
//!
//! Holds the configuration, both catalogs and a few counters. One instance
//! is shared as `Arc<Server>` by the gateway and every connection task.

use super::catalog::{ChannelCatalog, UserCatalog};
use super::router::EntityRouter;
use super::User;
use crate::config::Config;
use crate::error::HandlerError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tinyirc_proto::Message;
use tracing::info;

/// Build the `ERROR` line written before a link is closed.
pub fn closing_link(host: &str, reason: &str) -> Message {
    Message::error(format!("Closing Link: {host} ({reason})"))
}

/// Central shared state container.
#[derive(Debug)]
pub struct Server {
    config: Arc<Config>,

    /// Registered users, indexed by folded nick.
    pub users: UserCatalog,

    /// Live channels, indexed by folded name.
    pub channels: ChannelCatalog,

    /// Connections accepted since startup.
    connections_total: AtomicU64,

    /// Connections currently open, registered or not.
    clients: AtomicUsize,

    /// Highest registered user count seen.
    peak_users: AtomicUsize,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            users: UserCatalog::new(),
            channels: ChannelCatalog::new(),
            connections_total: AtomicU64::new(0),
            clients: AtomicUsize::new(0),
            peak_users: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Server name, the origin of numeric replies.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    pub fn router(&self) -> EntityRouter<'_> {
        EntityRouter::new(&self.users, &self.channels)
    }

    /// Count a new connection. Returns its sequence number.
    pub fn connection_opened(&self) -> u64 {
        self.clients.fetch_add(1, Ordering::Relaxed);
        self.connections_total.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn connection_closed(&self) {
        self.clients.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn connections_total(&self) -> u64 {
        self.connections_total.load(Ordering::Relaxed)
    }

    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn peak_users(&self) -> usize {
        self.peak_users.load(Ordering::Relaxed)
    }

    /// Claim the user's nick and record it as registered.
    pub fn add_user(&self, user: Arc<User>) -> Result<(), HandlerError> {
        self.users.insert(user)?;
        let now = self.users.len();
        let previous = self.peak_users.fetch_max(now, Ordering::Relaxed);
        if now > previous {
            info!(peak = now, "new peak user count");
        }
        Ok(())
    }

    /// Run the quit cascade for a registered user.
    ///
    /// Parts every channel with QUIT framing, queues the closing ERROR line,
    /// asks the connection to close and releases the nick. Only the first
    /// call for a given user does anything.
    pub fn quit_user(&self, user: &Arc<User>, reason: &str) {
        if !user.begin_quit() {
            return;
        }

        self.channels.quit_all(user, reason);
        user.send(closing_link(&user.hostname, reason));
        user.sender().close(reason);
        self.users.remove_user(user);
        info!(nick = %user.nick(), %reason, "user quit");
    }
}
