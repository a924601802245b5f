//! User-related types and state.

use super::sender::ClientSender;
use crate::error::HandlerError;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tinyirc_proto::{Message, Prefix, irc_to_lower};

/// Characters allowed in a nick besides letters and digits.
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

/// Validate a requested nickname.
///
/// The nick is the longest leading run of nick characters (a letter or
/// special first, then letters, digits, specials or `-`), truncated to
/// `max_len` characters. An empty run is an erroneous nickname.
pub fn validate_nick(requested: &str, max_len: usize) -> Result<String, HandlerError> {
    let mut chars = requested.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || is_special(c));
    if !valid_first {
        return Err(HandlerError::ErroneousNickname(requested.to_string()));
    }

    let nick: String = requested
        .chars()
        .take_while(|&c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
        .take(max_len)
        .collect();
    Ok(nick)
}

/// Identity fields supplied by USER and the connection.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub username: String,
    pub hostname: String,
    pub servername: String,
    pub realname: String,
}

/// A registered user.
///
/// Shared as `Arc<User>`: the user catalog owns it, channels keep weak
/// references and the connection task keeps its own handle.
#[derive(Debug)]
pub struct User {
    nick: RwLock<String>,
    pub username: String,
    pub hostname: String,
    pub servername: String,
    pub realname: String,
    pub hopcount: u32,
    /// Unix timestamp of registration.
    pub signon: i64,
    registered: AtomicBool,
    quitting: AtomicBool,
    modes: Mutex<BTreeSet<char>>,
    /// Channels this user is in, lowercase name to display name.
    channels: Mutex<BTreeMap<String, String>>,
    sender: ClientSender,
}

impl User {
    pub fn new(nick: impl Into<String>, info: UserInfo, sender: ClientSender) -> Self {
        Self {
            nick: RwLock::new(nick.into()),
            username: info.username,
            hostname: info.hostname,
            servername: info.servername,
            realname: info.realname,
            hopcount: 0,
            signon: chrono::Utc::now().timestamp(),
            registered: AtomicBool::new(false),
            quitting: AtomicBool::new(false),
            modes: Mutex::new(BTreeSet::new()),
            channels: Mutex::new(BTreeMap::new()),
            sender,
        }
    }

    pub fn nick(&self) -> String {
        self.nick.read().clone()
    }

    /// Lowercase nick, the catalog key.
    pub fn key(&self) -> String {
        irc_to_lower(&self.nick.read())
    }

    /// Replace the nick. Catalog consistency is the caller's job.
    pub(crate) fn set_nick(&self, nick: &str) {
        *self.nick.write() = nick.to_string();
    }

    /// `nick!username@hostname`
    pub fn address(&self) -> String {
        format!("{}!{}@{}", self.nick.read(), self.username, self.hostname)
    }

    pub fn prefix(&self) -> Prefix {
        Prefix::new(self.nick(), self.username.clone(), self.hostname.clone())
    }

    /// Queue a message for this user's connection.
    pub fn send(&self, msg: Message) {
        self.sender.send(msg);
    }

    pub fn sender(&self) -> &ClientSender {
        &self.sender
    }

    /// One-time registration transition. Returns `false` if already registered.
    pub fn register(&self) -> bool {
        !self.registered.swap(true, Ordering::AcqRel)
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Mark the user as leaving. Returns `false` if that already happened.
    pub(crate) fn begin_quit(&self) -> bool {
        !self.quitting.swap(true, Ordering::AcqRel)
    }

    /// Current user modes as `+abc` (just `+` when none are set).
    pub fn mode_string(&self) -> String {
        let modes = self.modes.lock();
        std::iter::once('+').chain(modes.iter().copied()).collect()
    }

    /// Set or clear a user mode. Returns whether anything changed.
    pub fn set_mode(&self, mode: char, on: bool) -> bool {
        let mut modes = self.modes.lock();
        if on { modes.insert(mode) } else { modes.remove(&mode) }
    }

    /// Display names of the channels the user is in.
    pub fn channels(&self) -> Vec<String> {
        self.channels.lock().values().cloned().collect()
    }

    pub(crate) fn add_channel(&self, name: &str) {
        self.channels
            .lock()
            .insert(irc_to_lower(name), name.to_string());
    }

    pub(crate) fn remove_channel(&self, name: &str) {
        self.channels.lock().remove(&irc_to_lower(name));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// A user whose outbound queue is readable by the test.
    pub(crate) fn user(nick: &str) -> (Arc<User>, mpsc::Receiver<Message>) {
        user_at(nick, "10.0.0.1")
    }

    pub(crate) fn user_at(nick: &str, host: &str) -> (Arc<User>, mpsc::Receiver<Message>) {
        let (sender, rx) = ClientSender::channel(1024);
        let info = UserInfo {
            username: format!("~{}", nick.to_lowercase()),
            hostname: host.to_string(),
            servername: "irc.test".to_string(),
            realname: format!("{} Example", nick),
        };
        (Arc::new(User::new(nick, info, sender)), rx)
    }

    /// Drain everything queued so far.
    pub(crate) fn drain(rx: &mut mpsc::Receiver<Message>) -> Vec<Message> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::user;
    use super::*;

    #[test]
    fn nick_validation_takes_leading_run_and_truncates() {
        assert_eq!(validate_nick("alice", 9).unwrap(), "alice");
        assert_eq!(validate_nick("bob!!", 9).unwrap(), "bob");
        assert_eq!(validate_nick("averyverylongnick", 9).unwrap(), "averyvery");
        assert_eq!(validate_nick("[away]-x", 9).unwrap(), "[away]-x");
    }

    #[test]
    fn nick_validation_rejects_bad_first_char() {
        for bad in ["", "1abc", "-dash", "#chan", " space"] {
            let err = validate_nick(bad, 9).unwrap_err();
            assert!(matches!(err, HandlerError::ErroneousNickname(_)), "{bad}");
        }
    }

    #[test]
    fn address_and_prefix() {
        let (bob, _rx) = user("Bob");
        assert_eq!(bob.address(), "Bob!~bob@10.0.0.1");
        assert_eq!(bob.prefix().to_string(), "Bob!~bob@10.0.0.1");
        assert_eq!(bob.key(), "bob");
    }

    #[test]
    fn register_is_one_time() {
        let (bob, _rx) = user("bob");
        assert!(!bob.is_registered());
        assert!(bob.register());
        assert!(!bob.register());
        assert!(bob.is_registered());
    }

    #[test]
    fn modes_only_report_changes() {
        let (bob, _rx) = user("bob");
        assert_eq!(bob.mode_string(), "+");
        assert!(bob.set_mode('i', true));
        assert!(!bob.set_mode('i', true));
        assert_eq!(bob.mode_string(), "+i");
        assert!(bob.set_mode('i', false));
        assert!(!bob.set_mode('i', false));
    }

    #[test]
    fn channel_set_is_case_insensitive() {
        let (bob, _rx) = user("bob");
        bob.add_channel("#Rust");
        bob.add_channel("#rust");
        assert_eq!(bob.channels(), vec!["#rust"]);
        bob.remove_channel("#RUST");
        assert!(bob.channels().is_empty());
    }
}
