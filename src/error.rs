//! Unified error handling for tinyircd.
//!
//! Protocol errors carry what their numeric reply needs and are translated
//! into exactly one reply line at the connection boundary.

use thiserror::Error;
use tinyirc_proto::{Message, ProtocolError, Response};

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {0}")]
    NeedMoreParams(String),

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("no such server: {0}")]
    NoSuchServer(String),

    #[error("not registered")]
    NotRegistered,

    #[error("already registered")]
    AlreadyRegistered,

    /// Wrong connection password; the link is closed after the reply.
    #[error("password mismatch")]
    PasswordMismatch,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("cannot change modes for other users")]
    UsersDontMatch,

    #[error("unknown user mode: {0}")]
    UnknownUserMode(char),

    #[error("{channel}: {source}")]
    Channel {
        channel: String,
        #[source]
        source: ChannelError,
    },

    #[error("encode error: {0}")]
    Encode(#[from] ProtocolError),

    #[error("client quit: {0:?}")]
    Quit(Option<String>),
}

impl HandlerError {
    /// Wrap a channel refusal with the channel it concerns.
    pub fn channel(channel: impl Into<String>, source: ChannelError) -> Self {
        Self::Channel {
            channel: channel.into(),
            source,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NoSuchServer(_) => "no_such_server",
            Self::NotRegistered => "not_registered",
            Self::AlreadyRegistered => "already_registered",
            Self::PasswordMismatch => "password_mismatch",
            Self::UnknownCommand(_) => "unknown_command",
            Self::UsersDontMatch => "users_dont_match",
            Self::UnknownUserMode(_) => "unknown_user_mode",
            Self::Channel { source, .. } => source.error_code(),
            Self::Encode(_) => "encode_error",
            Self::Quit(_) => "quit",
        }
    }

    /// Whether the connection must be closed after the reply is sent.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PasswordMismatch | Self::Quit(_))
    }

    /// Convert to a numeric reply addressed to `target` (the nick, or `*`
    /// before registration).
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, target: &str) -> Option<Message> {
        let target = target.to_string();
        let (response, params) = match self {
            Self::NeedMoreParams(cmd) => (
                Response::ERR_NEEDMOREPARAMS,
                vec![target, cmd.clone(), "Not enough parameters".to_string()],
            ),
            Self::NoNicknameGiven => (
                Response::ERR_NONICKNAMEGIVEN,
                vec![target, "No nickname given".to_string()],
            ),
            Self::ErroneousNickname(nick) => (
                Response::ERR_ERRONEUSNICKNAME,
                vec![target, nick.clone(), "Erroneus nickname".to_string()],
            ),
            Self::NicknameInUse(nick) => (
                Response::ERR_NICKNAMEINUSE,
                vec![target, nick.clone(), "Nickname is already in use".to_string()],
            ),
            Self::NoSuchNick(nick) => (
                Response::ERR_NOSUCHNICK,
                vec![target, nick.clone(), "No such nick/channel".to_string()],
            ),
            Self::NoSuchServer(server) => (
                Response::ERR_NOSUCHSERVER,
                vec![target, server.clone(), "No such server".to_string()],
            ),
            Self::NotRegistered => (
                Response::ERR_NOTREGISTERED,
                vec![target, "You have not registered".to_string()],
            ),
            Self::AlreadyRegistered => (
                Response::ERR_ALREADYREGISTRED,
                vec![target, "You may not reregister".to_string()],
            ),
            Self::PasswordMismatch => (
                Response::ERR_PASSWDMISMATCH,
                vec![target, "Password incorrect".to_string()],
            ),
            Self::UnknownCommand(cmd) => (
                Response::ERR_UNKNOWNCOMMAND,
                vec![target, cmd.clone(), "Unknown command".to_string()],
            ),
            Self::UsersDontMatch => (
                Response::ERR_USERSDONTMATCH,
                vec![target, "Cannot change mode for other users".to_string()],
            ),
            Self::UnknownUserMode(_) => (
                Response::ERR_UMODEUNKNOWNFLAG,
                vec![target, "Unknown MODE flag".to_string()],
            ),
            Self::Channel { channel, source } => {
                return Some(source.to_irc_reply(server_name, &target, channel));
            }

            // These errors don't get client-visible replies
            Self::Encode(_) => return None,
            Self::Quit(_) => return None,
        };

        Some(Message::response(server_name, response, params))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Channel Errors
// ============================================================================

/// Channel operation errors.
///
/// These errors represent channel-specific refusals that map to a numeric
/// reply naming the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("no such channel")]
    NoSuchChannel,

    #[error("not on channel")]
    NotOnChannel,

    #[error("you're not channel operator")]
    ChanOpPrivsNeeded,

    #[error("cannot send to channel")]
    CannotSendToChan,

    #[error("cannot join channel (+b)")]
    BannedFromChan,

    #[error("cannot join channel (+i)")]
    InviteOnlyChan,

    #[error("cannot join channel (+l)")]
    ChannelIsFull,

    #[error("cannot join channel (+k)")]
    BadChannelKey,
}

impl ChannelError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSuchChannel => "no_such_channel",
            Self::NotOnChannel => "not_on_channel",
            Self::ChanOpPrivsNeeded => "chanop_privs_needed",
            Self::CannotSendToChan => "cannot_send_to_chan",
            Self::BannedFromChan => "banned_from_chan",
            Self::InviteOnlyChan => "invite_only_chan",
            Self::ChannelIsFull => "channel_is_full",
            Self::BadChannelKey => "bad_channel_key",
        }
    }

    /// Convert to an IRC error reply message.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, channel: &str) -> Message {
        let (response, text) = match self {
            Self::NoSuchChannel => (Response::ERR_NOSUCHCHANNEL, "No such channel"),
            Self::NotOnChannel => (Response::ERR_NOTONCHANNEL, "You're not on that channel"),
            Self::ChanOpPrivsNeeded => {
                (Response::ERR_CHANOPRIVSNEEDED, "You're not channel operator")
            }
            Self::CannotSendToChan => (Response::ERR_CANNOTSENDTOCHAN, "Cannot send to channel"),
            Self::BannedFromChan => (Response::ERR_BANNEDFROMCHAN, "Cannot join channel (+b)"),
            Self::InviteOnlyChan => (Response::ERR_INVITEONLYCHAN, "Cannot join channel (+i)"),
            Self::ChannelIsFull => (Response::ERR_CHANNELISFULL, "Cannot join channel (+l)"),
            Self::BadChannelKey => (Response::ERR_BADCHANNELKEY, "Cannot join channel (+k)"),
        };

        Message::response(
            server_name,
            response,
            vec![nick.to_string(), channel.to_string(), text.to_string()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn need_more_params_reply() {
        let reply = HandlerError::NeedMoreParams("JOIN".into())
            .to_irc_reply("irc.test", "*")
            .unwrap();
        assert_eq!(
            reply.to_string(),
            ":irc.test 461 * JOIN :Not enough parameters"
        );
    }

    #[test]
    fn nick_errors_name_the_nick() {
        let reply = HandlerError::NicknameInUse("bob".into())
            .to_irc_reply("irc.test", "*")
            .unwrap();
        assert_eq!(reply.numeric(), Some(Response::ERR_NICKNAMEINUSE));
        assert_eq!(reply.params, vec!["*", "bob", "Nickname is already in use"]);
    }

    #[test]
    fn channel_errors_name_the_channel() {
        let reply = HandlerError::channel("#rust", ChannelError::ChannelIsFull)
            .to_irc_reply("irc.test", "amy")
            .unwrap();
        assert_eq!(
            reply.to_string(),
            ":irc.test 471 amy #rust :Cannot join channel (+l)"
        );
    }

    #[test]
    fn quit_and_encode_have_no_reply() {
        assert!(HandlerError::Quit(None).to_irc_reply("s", "n").is_none());
        let encode = HandlerError::Encode(ProtocolError::MessageTooLong {
            actual: 600,
            limit: 512,
        });
        assert!(encode.to_irc_reply("s", "n").is_none());
    }

    #[test]
    fn fatal_errors() {
        assert!(HandlerError::PasswordMismatch.is_fatal());
        assert!(HandlerError::Quit(None).is_fatal());
        assert!(!HandlerError::NotRegistered.is_fatal());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            HandlerError::channel("#a", ChannelError::BadChannelKey).error_code(),
            "bad_channel_key"
        );
        assert_eq!(HandlerError::NoNicknameGiven.error_code(), "no_nickname_given");
    }
}
