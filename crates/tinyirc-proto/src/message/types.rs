use crate::prefix::Prefix;
use crate::response::Response;

/// Hard cap on an encoded line, CRLF included.
pub const MAX_LINE_LEN: usize = 512;

/// A single protocol line.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Origin of the message, if any.
    pub prefix: Option<Prefix>,
    /// Command verb or three-digit numeric.
    pub command: String,
    /// Parameters; the last one may contain spaces.
    pub params: Vec<String>,
}

impl Message {
    /// Build a message without a prefix.
    pub fn new(command: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params,
        }
    }

    /// Build a numeric reply originating from `server_name`.
    pub fn response(server_name: &str, response: Response, params: Vec<String>) -> Self {
        Self::new(response.to_string(), params)
            .with_prefix(Prefix::ServerName(server_name.to_owned()))
    }

    /// Attach an origin prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new("PRIVMSG", vec![target.into(), text.into()])
    }

    /// `NOTICE <target> :<text>`
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new("NOTICE", vec![target.into(), text.into()])
    }

    /// `ERROR :<text>`
    pub fn error(text: impl Into<String>) -> Self {
        Self::new("ERROR", vec![text.into()])
    }

    /// The numeric this message carries, if its command is a known numeric.
    pub fn numeric(&self) -> Option<Response> {
        self.command.parse().ok()
    }

    /// Parameter at `idx`.
    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }

    /// Nickname of the origin, if it is a user.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}
