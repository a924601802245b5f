//! Message target resolution.

use super::User;
use super::catalog::{ChannelCatalog, ChannelRef, UserCatalog};
use std::sync::Arc;

/// What a PRIVMSG/NOTICE target names.
#[derive(Debug, Clone)]
pub enum Entity {
    User(Arc<User>),
    Channel(ChannelRef),
}

/// Picks the user or channel catalog by the target's leading sigil.
#[derive(Debug, Clone, Copy)]
pub struct EntityRouter<'a> {
    users: &'a UserCatalog,
    channels: &'a ChannelCatalog,
}

impl<'a> EntityRouter<'a> {
    pub fn new(users: &'a UserCatalog, channels: &'a ChannelCatalog) -> Self {
        Self { users, channels }
    }

    pub fn resolve(&self, name: &str) -> Option<Entity> {
        if name.starts_with('#') {
            self.channels.get(name).map(Entity::Channel)
        } else {
            self.users.get(name).map(Entity::User)
        }
    }
}
