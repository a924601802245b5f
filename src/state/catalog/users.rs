//! Nick to user map.

use crate::error::HandlerError;
use crate::state::User;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tinyirc_proto::irc_to_lower;

/// Registered users, keyed by folded nick.
///
/// Claiming a nick is a single `entry` call on the map, so availability and
/// insertion cannot interleave with another session.
#[derive(Debug, Default)]
pub struct UserCatalog {
    users: DashMap<String, Arc<User>>,
}

impl UserCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the user's current nick.
    pub fn insert(&self, user: Arc<User>) -> Result<(), HandlerError> {
        match self.users.entry(user.key()) {
            Entry::Occupied(_) => Err(HandlerError::NicknameInUse(user.nick())),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }

    pub fn get(&self, nick: &str) -> Option<Arc<User>> {
        self.users
            .get(&irc_to_lower(nick))
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.users.contains_key(&irc_to_lower(nick))
    }

    /// Move `user` to `new_nick`, returning the nick it had before.
    ///
    /// A change of case only keeps the slot. Otherwise the new slot is
    /// claimed first and the old one released after, so the user is never
    /// missing from the catalog.
    pub fn rename(&self, user: &Arc<User>, new_nick: &str) -> Result<String, HandlerError> {
        let old_nick = user.nick();
        let old_key = irc_to_lower(&old_nick);
        let new_key = irc_to_lower(new_nick);

        if old_key != new_key {
            match self.users.entry(new_key) {
                Entry::Occupied(_) => {
                    return Err(HandlerError::NicknameInUse(new_nick.to_string()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(user));
                }
            }
            self.users
                .remove_if(&old_key, |_, existing| Arc::ptr_eq(existing, user));
        }

        user.set_nick(new_nick);
        Ok(old_nick)
    }

    /// Release the user's slot, if it still belongs to this user.
    pub fn remove_user(&self, user: &Arc<User>) -> bool {
        self.users
            .remove_if(&user.key(), |_, existing| Arc::ptr_eq(existing, user))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Arc<User>> {
        self.users
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::user::test_support::user;

    #[test]
    fn nicks_are_unique_ignoring_case() {
        let catalog = UserCatalog::new();
        let (bob, _rx) = user("bob");
        let (bob2, _rx2) = user("BOB");

        catalog.insert(Arc::clone(&bob)).unwrap();
        let err = catalog.insert(bob2).unwrap_err();
        assert!(matches!(err, HandlerError::NicknameInUse(n) if n == "BOB"));
        assert_eq!(catalog.len(), 1);
        assert!(Arc::ptr_eq(&catalog.get("Bob").unwrap(), &bob));
    }

    #[test]
    fn rename_moves_the_slot() {
        let catalog = UserCatalog::new();
        let (bob, _rx) = user("bob");
        catalog.insert(Arc::clone(&bob)).unwrap();

        assert_eq!(catalog.rename(&bob, "robert").unwrap(), "bob");
        assert_eq!(bob.nick(), "robert");
        assert!(!catalog.contains("bob"));
        assert!(catalog.contains("ROBERT"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn rename_to_taken_nick_fails_and_keeps_old() {
        let catalog = UserCatalog::new();
        let (bob, _rx) = user("bob");
        let (amy, _rx2) = user("amy");
        catalog.insert(Arc::clone(&bob)).unwrap();
        catalog.insert(Arc::clone(&amy)).unwrap();

        assert!(catalog.rename(&bob, "Amy").is_err());
        assert_eq!(bob.nick(), "bob");
        assert!(catalog.contains("bob"));
    }

    #[test]
    fn case_only_rename_keeps_the_entry() {
        let catalog = UserCatalog::new();
        let (bob, _rx) = user("bob");
        catalog.insert(Arc::clone(&bob)).unwrap();

        catalog.rename(&bob, "Bob").unwrap();
        assert_eq!(bob.nick(), "Bob");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("bob").unwrap().nick(), "Bob");
    }

    #[test]
    fn remove_only_drops_the_same_user() {
        let catalog = UserCatalog::new();
        let (bob, _rx) = user("bob");
        let (impostor, _rx2) = user("bob");
        catalog.insert(Arc::clone(&bob)).unwrap();

        assert!(!catalog.remove_user(&impostor));
        assert!(catalog.remove_user(&bob));
        assert!(catalog.is_empty());
    }

    #[test]
    fn concurrent_claims_admit_exactly_one() {
        let catalog = Arc::new(UserCatalog::new());
        let handles: Vec<_> = ["dup", "DUP", "Dup", "dUp"]
            .into_iter()
            .map(|nick| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    let (u, _rx) = user(nick);
                    catalog.insert(u).is_ok()
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(catalog.len(), 1);
    }
}
