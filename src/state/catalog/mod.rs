//! Case-insensitive name catalogs.
//!
//! - [`CaseMap`]: a small map whose keys are case-folded on every access
//! - [`UserCatalog`]: nick to user, with atomic claim and rename
//! - [`ChannelCatalog`]: channel name to channel, created on first join and
//!   dropped when the last member leaves

mod channels;
mod users;

pub use channels::{ChannelCatalog, ChannelRef};
pub use users::UserCatalog;

use std::collections::BTreeMap;
use tinyirc_proto::irc_to_lower;

/// Map keyed by IRC-lowercased names.
///
/// Every insert, lookup and removal folds the key, so `Bob`, `bob` and `BOB`
/// address the same entry. Iteration follows the folded key order.
#[derive(Debug, Clone)]
pub struct CaseMap<V> {
    inner: BTreeMap<String, V>,
}

impl<V> Default for CaseMap<V> {
    fn default() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }
}

impl<V> CaseMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.inner.insert(irc_to_lower(key), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner.get(&irc_to_lower(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.inner.get_mut(&irc_to_lower(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.inner.remove(&irc_to_lower(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(&irc_to_lower(key))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Entries as (folded key, value).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fold_on_every_operation() {
        let mut map = CaseMap::new();
        assert!(map.insert("Bob", 1).is_none());
        assert_eq!(map.insert("BOB", 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("bob"), Some(&2));
        assert!(map.contains("bOb"));
        *map.get_mut("bob").unwrap() += 1;
        assert_eq!(map.remove("Bob"), Some(3));
        assert!(map.is_empty());
    }

    #[test]
    fn rfc1459_specials_fold() {
        let mut map = CaseMap::new();
        map.insert("nick[a]", ());
        assert!(map.contains("NICK{A}"));
    }

    #[test]
    fn iterates_in_folded_order() {
        let mut map = CaseMap::new();
        map.insert("carol", 3);
        map.insert("Alice", 1);
        map.insert("bob", 2);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alice", "bob", "carol"]);
    }
}
