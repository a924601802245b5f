//! Command handler context and session state.

use crate::state::{ClientSender, Server, User};
use std::net::SocketAddr;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared server state.
    pub server: &'a Arc<Server>,
    /// Outbound queue of this connection.
    pub sender: &'a ClientSender,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
    /// Set by PONG so the connection can clear its pong deadline.
    pub pong_received: bool,
}

impl<'a> Context<'a> {
    pub fn new(server: &'a Arc<Server>, sender: &'a ClientSender, remote_addr: SocketAddr) -> Self {
        Self {
            server,
            sender,
            remote_addr,
            pong_received: false,
        }
    }

    pub fn server_name(&self) -> &str {
        self.server.name()
    }

    /// Build and queue a numeric reply in one call.
    pub fn send_reply(&self, response: Response, params: Vec<String>) {
        let reply = Message::response(self.server.name(), response, params);
        self.sender.send(reply);
    }
}

/// Identity fields from USER, kept until registration completes.
#[derive(Debug, Clone)]
pub struct UserRequest {
    pub username: String,
    pub realname: String,
}

/// State tracked during the registration handshake.
#[derive(Debug, Default)]
pub struct Handshake {
    /// Nick provided by NICK, already validated.
    pub nick: Option<String>,
    /// Identity provided by USER.
    pub user: Option<UserRequest>,
    /// Password received via PASS.
    pub password: Option<String>,
    /// The freshly registered user, picked up by the registry to switch the
    /// session over.
    pub(crate) completed: Option<Arc<User>>,
}

impl Handshake {
    /// Both halves of the registration are present.
    pub fn can_register(&self) -> bool {
        self.nick.is_some() && self.user.is_some()
    }
}

/// Registration state of one connection.
#[derive(Debug)]
pub enum Session {
    Unregistered(Handshake),
    Registered(Arc<User>),
}

impl Default for Session {
    fn default() -> Self {
        Self::Unregistered(Handshake::default())
    }
}

impl Session {
    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::Registered(user) => Some(user),
            Self::Unregistered(_) => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }

    /// Target of numeric replies: the nick, or `*` before registration.
    pub fn reply_target(&self) -> String {
        match self {
            Self::Registered(user) => user.nick(),
            Self::Unregistered(_) => "*".to_string(),
        }
    }
}
