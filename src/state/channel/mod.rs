//! Channel state and the operations that run under its lock.
//!
//! A [`Channel`] lives behind `Arc<parking_lot::Mutex<_>>` in the channel
//! catalog. Every operation here is synchronous: membership checks, list
//! updates and the resulting broadcasts all happen while the lock is held,
//! so two users racing for the last slot are decided in lock order.
//! Broadcasts only queue onto each member's outbound channel and never wait.

mod lists;
mod modes;
mod names;

pub use lists::{ListEntry, MaskList};

use super::catalog::CaseMap;
use super::user::User;
use crate::config::Config;
use crate::error::ChannelError;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tinyirc_proto::{Message, Response};
use tracing::{debug, warn};

/// A channel member and its privileges.
#[derive(Debug, Clone)]
pub struct Member {
    user: Weak<User>,
    pub op: bool,
    pub voice: bool,
}

impl Member {
    fn new(user: &Arc<User>, op: bool) -> Self {
        Self {
            user: Arc::downgrade(user),
            op,
            voice: false,
        }
    }

    /// The member's user, unless it has already been dropped.
    pub fn user(&self) -> Option<Arc<User>> {
        self.user.upgrade()
    }

    /// NAMES / WHOIS prefix: `@` for ops, `+` for voiced, nothing otherwise.
    pub fn prefix(&self) -> &'static str {
        if self.op {
            "@"
        } else if self.voice {
            "+"
        } else {
            ""
        }
    }
}

/// Channel topic with metadata.
#[derive(Debug, Clone)]
pub struct Topic {
    pub text: String,
    pub set_by: String,
    pub set_at: i64,
}

/// Boolean channel modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelFlags {
    pub moderated: bool,
    pub invite_only: bool,
    pub secret: bool,
}

/// A live channel.
#[derive(Debug)]
pub struct Channel {
    name: String,
    topic: Option<Topic>,
    key: Option<String>,
    limit: Option<usize>,
    flags: ChannelFlags,
    bans: MaskList,
    excepts: MaskList,
    invites: MaskList,
    members: CaseMap<Member>,
    /// Set when the catalog unlinks the channel; joiners holding a stale
    /// handle must look it up again.
    closed: bool,
}

/// Check a channel name: `#` first, at most `max_len` bytes, and none of
/// space, comma, BEL or NUL.
pub fn validate_name(name: &str, max_len: usize) -> Result<(), ChannelError> {
    let valid = name.len() > 1
        && name.len() <= max_len
        && name.starts_with('#')
        && !name.contains([' ', ',', '\x07', '\0']);
    if valid {
        Ok(())
    } else {
        Err(ChannelError::NoSuchChannel)
    }
}

impl Channel {
    /// Create an empty channel after validating its name.
    pub fn new(name: &str, max_len: usize) -> Result<Self, ChannelError> {
        validate_name(name, max_len)?;
        Ok(Self {
            name: name.to_string(),
            topic: None,
            key: None,
            limit: None,
            flags: ChannelFlags::default(),
            bans: MaskList::default(),
            excepts: MaskList::default(),
            invites: MaskList::default(),
            members: CaseMap::new(),
            closed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn flags(&self) -> ChannelFlags {
        self.flags
    }

    pub fn bans(&self) -> &MaskList {
        &self.bans
    }

    pub fn excepts(&self) -> &MaskList {
        &self.excepts
    }

    pub fn invites(&self) -> &MaskList {
        &self.invites
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_member(&self, nick: &str) -> bool {
        self.members.contains(nick)
    }

    pub fn member(&self, nick: &str) -> Option<&Member> {
        self.members.get(nick)
    }

    pub fn is_op(&self, nick: &str) -> bool {
        self.members.get(nick).is_some_and(|m| m.op)
    }

    /// Secret channels are hidden from LIST and WHOIS for non-members.
    pub fn is_visible_to(&self, nick: &str) -> bool {
        !self.flags.secret || self.is_member(nick)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Live members, in folded-nick order.
    pub fn users(&self) -> Vec<Arc<User>> {
        self.members.values().filter_map(Member::user).collect()
    }

    /// Effective membership cap: `+l` if set, never above the server ceiling.
    fn capacity(&self, hard_limit: usize) -> usize {
        self.limit.map_or(hard_limit, |limit| limit.min(hard_limit))
    }

    /// Banned means a ban mask matches and no exception mask does.
    fn is_banned(&self, address: &str) -> bool {
        self.bans.matches(address) && !self.excepts.matches(address)
    }

    /// Queue `msg` to every member except `skip` (a nick, any case).
    pub fn broadcast(&self, msg: &Message, skip: Option<&str>) {
        let skip = skip.map(tinyirc_proto::irc_to_lower);
        for (key, member) in self.members.iter() {
            if skip.as_deref() == Some(key) {
                continue;
            }
            if let Some(user) = member.user() {
                user.send(msg.clone());
            }
        }
    }

    /// Admit `user`.
    ///
    /// Checks run in order: key, capacity, bans, invite-only. On success the
    /// JOIN is broadcast to every member including the joiner, who then gets
    /// the topic and NAMES. The first member becomes channel operator.
    /// Returns `Ok(false)` when the user is already a member.
    pub fn join(
        &mut self,
        user: &Arc<User>,
        key: Option<&str>,
        config: &Config,
    ) -> Result<bool, ChannelError> {
        let nick = user.nick();
        if self.members.contains(&nick) {
            return Ok(false);
        }

        if let Some(expected) = &self.key {
            if key != Some(expected.as_str()) {
                return Err(ChannelError::BadChannelKey);
            }
        }

        if self.members.len() >= self.capacity(config.limits.max_channel_members) {
            return Err(ChannelError::ChannelIsFull);
        }

        let address = user.address();
        if self.is_banned(&address) {
            return Err(ChannelError::BannedFromChan);
        }

        if self.flags.invite_only && !self.invites.matches(&address) {
            return Err(ChannelError::InviteOnlyChan);
        }

        let op = self.members.is_empty();
        self.members.insert(&nick, Member::new(user, op));
        user.add_channel(&self.name);
        debug!(channel = %self.name, %nick, op, "joined");

        let join = Message::new("JOIN", vec![self.name.clone()]).with_prefix(user.prefix());
        self.broadcast(&join, None);

        let server = &config.server.name;
        self.send_topic(user, server);
        if let Err(e) = self.send_names(user, config, true) {
            warn!(channel = %self.name, error = %e, "NAMES reply could not be encoded");
        }
        Ok(true)
    }

    /// Remove `user` voluntarily. The PART goes to every member, the parter
    /// included, before the removal.
    pub fn part(&mut self, user: &Arc<User>, message: Option<&str>) -> Result<(), ChannelError> {
        let nick = user.nick();
        if !self.members.contains(&nick) {
            return Err(ChannelError::NotOnChannel);
        }

        let mut params = vec![self.name.clone()];
        if let Some(text) = message {
            params.push(text.to_string());
        }
        let part = Message::new("PART", params).with_prefix(user.prefix());
        self.broadcast(&part, None);

        self.members.remove(&nick);
        user.remove_channel(&self.name);
        Ok(())
    }

    /// Remove `user` on disconnect and tell the remaining members.
    ///
    /// Members whose folded nick is already in `notified` are skipped, so a
    /// quitting user's peers hear about it once across all shared channels.
    /// Does nothing if `user` is not a member.
    pub fn quit(&mut self, user: &User, message: &str, notified: &mut HashSet<String>) {
        if self.members.remove(&user.nick()).is_none() {
            return;
        }
        user.remove_channel(&self.name);

        let quit = Message::new("QUIT", vec![message.to_string()]).with_prefix(user.prefix());
        for (key, member) in self.members.iter() {
            if !notified.insert(key.to_string()) {
                continue;
            }
            if let Some(peer) = member.user() {
                peer.send(quit.clone());
            }
        }
    }

    /// Re-key a member after a nick change.
    pub fn rename_member(&mut self, old_nick: &str, new_nick: &str) {
        if let Some(member) = self.members.remove(old_nick) {
            self.members.insert(new_nick, member);
        }
    }

    /// Reply with 332 and 333 for a set topic, 331 otherwise.
    pub fn send_topic(&self, user: &User, server: &str) {
        let nick = user.nick();
        let Some(topic) = &self.topic else {
            user.send(Message::response(
                server,
                Response::RPL_NOTOPIC,
                vec![nick, self.name.clone(), "No topic is set".to_string()],
            ));
            return;
        };
        user.send(Message::response(
            server,
            Response::RPL_TOPIC,
            vec![nick.clone(), self.name.clone(), topic.text.clone()],
        ));
        user.send(Message::response(
            server,
            Response::RPL_TOPICWHOTIME,
            vec![
                nick,
                self.name.clone(),
                topic.set_by.clone(),
                topic.set_at.to_string(),
            ],
        ));
    }

    /// Set or clear (empty `text`) the topic. Operators only.
    pub fn set_topic(&mut self, user: &User, text: &str) -> Result<(), ChannelError> {
        let nick = user.nick();
        let member = self.members.get(&nick).ok_or(ChannelError::NotOnChannel)?;
        if !member.op {
            return Err(ChannelError::ChanOpPrivsNeeded);
        }

        self.topic = if text.is_empty() {
            None
        } else {
            Some(Topic {
                text: text.to_string(),
                set_by: user.address(),
                set_at: chrono::Utc::now().timestamp(),
            })
        };

        let msg = Message::new("TOPIC", vec![self.name.clone(), text.to_string()])
            .with_prefix(user.prefix());
        self.broadcast(&msg, None);
        Ok(())
    }

    /// Relay a PRIVMSG or NOTICE from `user` to every other member.
    ///
    /// The sender must be a member; on a moderated channel it needs op or
    /// voice, and a banned sender is refused unless an exception matches.
    pub fn send_message(&self, user: &User, command: &str, text: &str) -> Result<(), ChannelError> {
        let nick = user.nick();
        let member = self
            .members
            .get(&nick)
            .ok_or(ChannelError::CannotSendToChan)?;

        if self.flags.moderated && !member.op && !member.voice {
            return Err(ChannelError::CannotSendToChan);
        }
        if self.is_banned(&user.address()) {
            return Err(ChannelError::CannotSendToChan);
        }

        let msg = Message::new(command, vec![self.name.clone(), text.to_string()])
            .with_prefix(user.prefix());
        self.broadcast(&msg, Some(&nick));
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::user::test_support::{drain, user, user_at};

    pub(crate) fn config() -> Config {
        let mut config = Config::default();
        config.server.name = "irc.test".to_string();
        config
    }

    pub(crate) fn channel(name: &str) -> Channel {
        Channel::new(name, 50).unwrap()
    }

    fn commands(msgs: &[Message]) -> Vec<String> {
        msgs.iter().map(|m| m.command.clone()).collect()
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("#rust", 50).is_ok());
        assert!(validate_name("#", 50).is_err());
        assert!(validate_name("rust", 50).is_err());
        assert!(validate_name("#a b", 50).is_err());
        assert!(validate_name("#a,b", 50).is_err());
        assert!(validate_name("#a\x07", 50).is_err());
        assert!(validate_name("#abcdef", 5).is_err());
    }

    #[test]
    fn first_joiner_is_op_and_sees_join_topic_names() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut rx) = user("amy");

        assert!(chan.join(&amy, None, &config).unwrap());
        assert!(chan.is_op("AMY"));
        assert_eq!(amy.channels(), vec!["#rust"]);

        let got = drain(&mut rx);
        assert_eq!(commands(&got), vec!["JOIN", "331", "353", "366"]);
        assert_eq!(got[0].to_string(), ":amy!~amy@10.0.0.1 JOIN #rust");
        assert_eq!(got[2].params, vec!["amy", "=", "#rust", "@amy"]);
    }

    #[test]
    fn rejoin_is_a_no_op() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut rx) = user("amy");
        chan.join(&amy, None, &config).unwrap();
        drain(&mut rx);

        assert!(!chan.join(&amy, None, &config).unwrap());
        assert!(drain(&mut rx).is_empty());
        assert_eq!(chan.member_count(), 1);
    }

    #[test]
    fn join_checks_run_in_order() {
        let config = config();
        let mut chan = channel("#rust");
        let (op, _rx) = user("op");
        chan.join(&op, None, &config).unwrap();

        chan.key = Some("sekrit".into());
        chan.limit = Some(1);
        chan.bans.apply("*!*@10.0.0.1", true, "op");
        chan.flags.invite_only = true;

        let (bob, _rx) = user("bob");
        assert_eq!(chan.join(&bob, None, &config), Err(ChannelError::BadChannelKey));
        assert_eq!(
            chan.join(&bob, Some("sekrit"), &config),
            Err(ChannelError::ChannelIsFull)
        );
        chan.limit = None;
        assert_eq!(
            chan.join(&bob, Some("sekrit"), &config),
            Err(ChannelError::BannedFromChan)
        );
        chan.excepts.apply("bob", true, "op");
        assert_eq!(
            chan.join(&bob, Some("sekrit"), &config),
            Err(ChannelError::InviteOnlyChan)
        );
        chan.invites.apply("*!~bob@*", true, "op");
        assert_eq!(chan.join(&bob, Some("sekrit"), &config), Ok(true));
        assert!(!chan.is_op("bob"));
    }

    #[test]
    fn server_ceiling_caps_the_channel_limit() {
        let mut config = config();
        config.limits.max_channel_members = 2;
        let mut chan = channel("#small");
        chan.limit = Some(50);

        let (a, _ra) = user("a");
        let (b, _rb) = user("b");
        let (c, _rc) = user("c");
        chan.join(&a, None, &config).unwrap();
        chan.join(&b, None, &config).unwrap();
        assert_eq!(chan.join(&c, None, &config), Err(ChannelError::ChannelIsFull));
    }

    #[test]
    fn join_is_seen_by_existing_members() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut amy_rx) = user("amy");
        let (bob, _bob_rx) = user("bob");
        chan.join(&amy, None, &config).unwrap();
        drain(&mut amy_rx);

        chan.join(&bob, None, &config).unwrap();
        let got = drain(&mut amy_rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].source_nickname(), Some("bob"));
    }

    #[test]
    fn part_broadcasts_then_removes() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut amy_rx) = user("amy");
        let (bob, mut bob_rx) = user("bob");
        chan.join(&amy, None, &config).unwrap();
        chan.join(&bob, None, &config).unwrap();
        drain(&mut amy_rx);
        drain(&mut bob_rx);

        chan.part(&bob, Some("bye")).unwrap();
        assert_eq!(drain(&mut amy_rx)[0].to_string(), ":bob!~bob@10.0.0.1 PART #rust bye");
        assert_eq!(commands(&drain(&mut bob_rx)), vec!["PART"]);
        assert!(!chan.is_member("bob"));
        assert!(bob.channels().is_empty());

        assert_eq!(chan.part(&bob, None), Err(ChannelError::NotOnChannel));
    }

    #[test]
    fn quit_notifies_each_peer_once() {
        let config = config();
        let mut one = channel("#one");
        let mut two = channel("#two");
        let (amy, mut amy_rx) = user("amy");
        let (bob, _bob_rx) = user("bob");
        for chan in [&mut one, &mut two] {
            chan.join(&amy, None, &config).unwrap();
            chan.join(&bob, None, &config).unwrap();
        }
        drain(&mut amy_rx);

        let mut notified = HashSet::new();
        one.quit(&bob, "Quit: gone", &mut notified);
        two.quit(&bob, "Quit: gone", &mut notified);
        // Not a member any more: nothing happens.
        two.quit(&bob, "Quit: gone", &mut notified);

        let got = drain(&mut amy_rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].to_string(), ":bob!~bob@10.0.0.1 QUIT :Quit: gone");
        assert!(!one.is_member("bob") && !two.is_member("bob"));
    }

    #[test]
    fn topic_requires_op_and_empty_clears() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut amy_rx) = user("amy");
        let (bob, _bob_rx) = user("bob");
        let (eve, _eve_rx) = user("eve");
        chan.join(&amy, None, &config).unwrap();
        chan.join(&bob, None, &config).unwrap();
        drain(&mut amy_rx);

        assert_eq!(chan.set_topic(&eve, "x"), Err(ChannelError::NotOnChannel));
        assert_eq!(chan.set_topic(&bob, "x"), Err(ChannelError::ChanOpPrivsNeeded));

        chan.set_topic(&amy, "welcome all").unwrap();
        assert_eq!(chan.topic().unwrap().text, "welcome all");
        assert_eq!(
            drain(&mut amy_rx)[0].to_string(),
            ":amy!~amy@10.0.0.1 TOPIC #rust :welcome all"
        );

        chan.set_topic(&amy, "").unwrap();
        assert!(chan.topic().is_none());
    }

    #[test]
    fn topic_query_names_the_setter() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut amy_rx) = user("amy");
        chan.join(&amy, None, &config).unwrap();
        chan.set_topic(&amy, "release day").unwrap();
        drain(&mut amy_rx);

        chan.send_topic(&amy, "irc.test");
        let got = drain(&mut amy_rx);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].to_string(), ":irc.test 332 amy #rust :release day");
        assert_eq!(got[1].numeric(), Some(Response::RPL_TOPICWHOTIME));
        assert_eq!(got[1].params[2], "amy!~amy@10.0.0.1");
        let set_at: i64 = got[1].params[3].parse().unwrap();
        assert_eq!(set_at, chan.topic().unwrap().set_at);
    }

    #[test]
    fn messages_skip_the_sender() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, mut amy_rx) = user("amy");
        let (bob, mut bob_rx) = user("bob");
        chan.join(&amy, None, &config).unwrap();
        chan.join(&bob, None, &config).unwrap();
        drain(&mut amy_rx);
        drain(&mut bob_rx);

        chan.send_message(&amy, "PRIVMSG", "hello there").unwrap();
        assert!(drain(&mut amy_rx).is_empty());
        assert_eq!(
            drain(&mut bob_rx)[0].to_string(),
            ":amy!~amy@10.0.0.1 PRIVMSG #rust :hello there"
        );
    }

    #[test]
    fn moderation_and_bans_gate_speech() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, _amy_rx) = user("amy");
        let (bob, _bob_rx) = user_at("bob", "bad.host");
        let (eve, _eve_rx) = user("eve");
        chan.join(&amy, None, &config).unwrap();
        chan.join(&bob, None, &config).unwrap();

        assert_eq!(
            chan.send_message(&eve, "PRIVMSG", "hi"),
            Err(ChannelError::CannotSendToChan)
        );

        chan.flags.moderated = true;
        assert_eq!(
            chan.send_message(&bob, "PRIVMSG", "hi"),
            Err(ChannelError::CannotSendToChan)
        );
        chan.members.get_mut("bob").unwrap().voice = true;
        assert!(chan.send_message(&bob, "PRIVMSG", "hi").is_ok());

        chan.bans.apply("*!*@bad.host", true, "amy");
        assert_eq!(
            chan.send_message(&bob, "PRIVMSG", "hi"),
            Err(ChannelError::CannotSendToChan)
        );
        chan.excepts.apply("bob!*@*", true, "amy");
        assert!(chan.send_message(&bob, "PRIVMSG", "hi").is_ok());
    }

    #[test]
    fn rename_keeps_privileges() {
        let config = config();
        let mut chan = channel("#rust");
        let (amy, _rx) = user("amy");
        chan.join(&amy, None, &config).unwrap();

        chan.rename_member("amy", "Amelia");
        assert!(!chan.is_member("amy"));
        assert!(chan.is_op("amelia"));
    }

    #[test]
    fn secret_channels_hide_from_outsiders() {
        let config = config();
        let mut chan = channel("#hidden");
        let (amy, _rx) = user("amy");
        chan.join(&amy, None, &config).unwrap();
        chan.flags.secret = true;
        assert!(chan.is_visible_to("amy"));
        assert!(!chan.is_visible_to("bob"));
    }
}
