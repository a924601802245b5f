//! Message origin prefix.
//!
//! The origin of a line is either the server name or a user address of the
//! form `nick!user@host`.

use std::fmt;

use crate::error::MessageParseError;

/// Message prefix identifying the origin of a line.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Create a new user prefix from nick, user, and host components.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Parse a prefix string.
    ///
    /// Anything containing `!` or `@` is a user prefix; otherwise a name
    /// with a dot is a server and a bare word is a nickname.
    pub fn parse(s: &str) -> Result<Self, MessageParseError> {
        if s.is_empty() || s.contains(' ') {
            return Err(MessageParseError::InvalidPrefix(s.to_owned()));
        }

        let (name, rest) = match s.find(['!', '@']) {
            Some(idx) => (&s[..idx], &s[idx..]),
            None if s.contains('.') => return Ok(Prefix::ServerName(s.to_owned())),
            None => return Ok(Prefix::new(s, "", "")),
        };

        let (user, host) = match rest.strip_prefix('!') {
            Some(after) => match after.split_once('@') {
                Some((user, host)) => (user, host),
                None => (after, ""),
            },
            None => ("", &rest[1..]),
        };

        Ok(Prefix::new(name, user, host))
    }

    /// Get the nickname if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => write!(f, "{}", name),
            Prefix::Nickname(name, user, host) => match (&name[..], &user[..], &host[..]) {
                (name, "", "") => write!(f, "{}", name),
                (name, user, "") => write!(f, "{}!{}", name, user),
                (name, "", host) => write!(f, "{}@{}", name, host),
                (name, user, host) => write!(f, "{}!{}@{}", name, user, host),
            },
        }
    }
}
