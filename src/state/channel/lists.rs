//! Ban, exception and invite mask lists.

use chrono::Utc;
use tinyirc_proto::{matches_mask, normalize_mask};

/// An entry in a list (bans, excepts, invex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub mask: String,
    pub set_by: String,
    pub set_at: i64,
}

/// An ordered list of normalized masks.
#[derive(Debug, Clone, Default)]
pub struct MaskList {
    entries: Vec<ListEntry>,
}

impl MaskList {
    /// Add or remove `mask`, normalized first. Returns the normalized mask
    /// when the list actually changed.
    pub fn apply(&mut self, mask: &str, adding: bool, set_by: &str) -> Option<String> {
        let mask = normalize_mask(mask);

        if adding {
            if self.entries.iter().any(|entry| entry.mask == mask) {
                return None;
            }

            self.entries.push(ListEntry {
                mask: mask.clone(),
                set_by: set_by.to_string(),
                set_at: Utc::now().timestamp(),
            });
            Some(mask)
        } else {
            let original_len = self.entries.len();
            self.entries.retain(|entry| entry.mask != mask);
            (original_len != self.entries.len()).then_some(mask)
        }
    }

    /// Whether any mask matches `address`.
    pub fn matches(&self, address: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| matches_mask(&entry.mask, address))
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_twice_changes_once() {
        let mut list = MaskList::default();
        assert_eq!(
            list.apply("*!*@Evil.Example", true, "op!~o@h").as_deref(),
            Some("*!*@evil.example")
        );
        assert_eq!(list.apply("*!*@evil.example", true, "op!~o@h"), None);
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].set_by, "op!~o@h");
    }

    #[test]
    fn add_then_remove_restores_empty() {
        let mut list = MaskList::default();
        list.apply("*!*@evil.example", true, "op");
        assert!(list.apply("*!*@evil.example", false, "op").is_some());
        assert!(list.is_empty());
        assert_eq!(list.apply("*!*@evil.example", false, "op"), None);
    }

    #[test]
    fn equivalent_spellings_share_an_entry() {
        let mut list = MaskList::default();
        list.apply("Bob", true, "op");
        assert_eq!(list.apply("bob!*@*", true, "op"), None);
        assert!(list.apply("BOB!*", false, "op").is_some());
    }

    #[test]
    fn matches_full_addresses() {
        let mut list = MaskList::default();
        list.apply("*@evil.example", true, "op");
        assert!(list.matches("mallory!~m@evil.example"));
        assert!(!list.matches("alice!~a@good.example"));
    }
}
