//! Numeric reply codes.
//!
//! Only the numerics the daemon emits are listed; names follow RFC 2812
//! spelling (including its typos, e.g. `ERR_ALREADYREGISTRED`).

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

macro_rules! responses {
    ($( $(#[$doc:meta])* $name:ident = $code:literal, )*) => {
        /// Server numeric reply.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u16)]
        #[non_exhaustive]
        pub enum Response {
            $( $(#[$doc])* $name = $code, )*
        }

        impl Response {
            /// Creates a Response from a numeric code.
            pub fn from_code(code: u16) -> Option<Response> {
                match code {
                    $( $code => Some(Response::$name), )*
                    _ => None,
                }
            }
        }
    };
}

responses! {
    /// 001 - Welcome to the network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server name, version, user modes, channel modes
    RPL_MYINFO = 4,
    /// 221 - Current user modes
    RPL_UMODEIS = 221,
    /// 251 - User/service/server counts
    RPL_LUSERCLIENT = 251,
    /// 254 - Channels formed
    RPL_LUSERCHANNELS = 254,
    /// 255 - Local client/server counts
    RPL_LUSERME = 255,
    /// 303 - ISON reply
    RPL_ISON = 303,
    /// 311 - WHOIS user line
    RPL_WHOISUSER = 311,
    /// 312 - WHOIS server line
    RPL_WHOISSERVER = 312,
    /// 318 - End of WHOIS
    RPL_ENDOFWHOIS = 318,
    /// 319 - WHOIS channel list
    RPL_WHOISCHANNELS = 319,
    /// 321 - LIST header
    RPL_LISTSTART = 321,
    /// 322 - LIST entry
    RPL_LIST = 322,
    /// 323 - End of LIST
    RPL_LISTEND = 323,
    /// 324 - Channel modes
    RPL_CHANNELMODEIS = 324,
    /// 331 - No topic set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 333 - Who set the topic, and when
    RPL_TOPICWHOTIME = 333,
    /// 346 - Invite list entry
    RPL_INVITELIST = 346,
    /// 347 - End of invite list
    RPL_ENDOFINVITELIST = 347,
    /// 348 - Exception list entry
    RPL_EXCEPTLIST = 348,
    /// 349 - End of exception list
    RPL_ENDOFEXCEPTLIST = 349,
    /// 351 - Server version
    RPL_VERSION = 351,
    /// 353 - NAMES entry
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES
    RPL_ENDOFNAMES = 366,
    /// 367 - Ban list entry
    RPL_BANLIST = 367,
    /// 368 - End of ban list
    RPL_ENDOFBANLIST = 368,
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 402 - No such server
    ERR_NOSUCHSERVER = 402,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 422 - MOTD file is missing
    ERR_NOMOTD = 422,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname in use
    ERR_NICKNAMEINUSE = 433,
    /// 442 - Not on channel
    ERR_NOTONCHANNEL = 442,
    /// 451 - Not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - Already registered
    ERR_ALREADYREGISTRED = 462,
    /// 464 - Password incorrect
    ERR_PASSWDMISMATCH = 464,
    /// 471 - Channel is full (+l)
    ERR_CHANNELISFULL = 471,
    /// 473 - Invite only channel (+i)
    ERR_INVITEONLYCHAN = 473,
    /// 474 - Banned from channel (+b)
    ERR_BANNEDFROMCHAN = 474,
    /// 475 - Bad channel key (+k)
    ERR_BADCHANNELKEY = 475,
    /// 482 - Channel operator privileges needed
    ERR_CHANOPRIVSNEEDED = 482,
    /// 501 - Unknown user mode flag
    ERR_UMODEUNKNOWNFLAG = 501,
    /// 502 - Cannot change modes for other users
    ERR_USERSDONTMATCH = 502,
}

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is an error response (4xx, 5xx)
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error returned when a string is not a known numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResponseError(pub String);

impl fmt::Display for ParseResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown numeric: {}", self.0)
    }
}

impl std::error::Error for ParseResponseError {}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 {
            return Err(ParseResponseError(s.to_owned()));
        }
        s.parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .ok_or_else(|| ParseResponseError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code() {
        assert_eq!(Response::from_code(1), Some(Response::RPL_WELCOME));
        assert_eq!(Response::from_code(433), Some(Response::ERR_NICKNAMEINUSE));
        assert_eq!(Response::from_code(9999), None);
    }

    #[test]
    fn displays_three_digits() {
        assert_eq!(Response::RPL_WELCOME.to_string(), "001");
        assert_eq!(Response::ERR_CHANOPRIVSNEEDED.to_string(), "482");
    }

    #[test]
    fn is_error() {
        assert!(!Response::RPL_NAMREPLY.is_error());
        assert!(Response::ERR_BANNEDFROMCHAN.is_error());
    }

    #[test]
    fn parse() {
        assert_eq!("001".parse::<Response>().unwrap(), Response::RPL_WELCOME);
        assert_eq!("471".parse::<Response>().unwrap(), Response::ERR_CHANNELISFULL);
        assert!("1".parse::<Response>().is_err());
        assert!("abc".parse::<Response>().is_err());
    }
}
