//! Command handler registry and dispatch.
//!
//! Each session state owns a static table of command descriptors. Dispatch
//! is a lookup keyed by (state, command); parameter counts are checked
//! against the descriptor before the handler runs.

use super::context::{Context, Session};
use super::traits::{PostRegHandler, PreRegHandler, UniversalHandler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    channel::{JoinHandler, ListHandler, NamesHandler, PartHandler, TopicHandler},
    connection::{
        NickChangeHandler, NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler,
        ReregisterHandler, UserHandler,
    },
    messaging::{NoticeHandler, PrivmsgHandler},
    mode::ModeHandler,
    server_query::{LusersHandler, MotdHandler, VersionHandler},
    user_query::{IsonHandler, WhoisHandler},
};
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Instant;
use tinyirc_proto::Message;
use tracing::{Instrument, debug, debug_span};

/// Descriptor for one command in one session state.
pub struct CommandSpec<H: ?Sized> {
    pub handler: Box<H>,
    /// Parameters required before the handler is called.
    pub min_params: usize,
    /// Parameters the handler looks at; extra ones are dropped. `None`
    /// passes everything through.
    pub max_params: Option<usize>,
}

impl<H: ?Sized> CommandSpec<H> {
    fn new(handler: Box<H>, min_params: usize, max_params: Option<usize>) -> Self {
        Self {
            handler,
            min_params,
            max_params,
        }
    }

    /// Enforce the parameter count, trimming surplus parameters.
    fn check<'m>(&self, command: &str, msg: &'m Message) -> Result<Cow<'m, Message>, HandlerError> {
        if msg.params.len() < self.min_params {
            return Err(HandlerError::NeedMoreParams(command.to_string()));
        }
        match self.max_params {
            Some(max) if msg.params.len() > max => {
                let mut trimmed = msg.clone();
                trimmed.params.truncate(max);
                Ok(Cow::Owned(trimmed))
            }
            _ => Ok(Cow::Borrowed(msg)),
        }
    }
}

/// Registry of command handlers.
pub struct Registry {
    pre_reg: HashMap<&'static str, CommandSpec<dyn PreRegHandler>>,
    post_reg: HashMap<&'static str, CommandSpec<dyn PostRegHandler>>,
    universal: HashMap<&'static str, CommandSpec<dyn UniversalHandler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut pre_reg: HashMap<&'static str, CommandSpec<dyn PreRegHandler>> = HashMap::new();
        pre_reg.insert("NICK", CommandSpec::new(Box::new(NickHandler), 0, Some(1)));
        pre_reg.insert("USER", CommandSpec::new(Box::new(UserHandler), 4, Some(4)));
        pre_reg.insert("PASS", CommandSpec::new(Box::new(PassHandler), 1, Some(1)));

        let mut universal: HashMap<&'static str, CommandSpec<dyn UniversalHandler>> =
            HashMap::new();
        universal.insert("PING", CommandSpec::new(Box::new(PingHandler), 1, Some(2)));
        universal.insert("PONG", CommandSpec::new(Box::new(PongHandler), 0, None));
        universal.insert("QUIT", CommandSpec::new(Box::new(QuitHandler), 0, Some(1)));

        let mut post_reg: HashMap<&'static str, CommandSpec<dyn PostRegHandler>> = HashMap::new();
        // Connection
        post_reg.insert("NICK", CommandSpec::new(Box::new(NickChangeHandler), 0, Some(1)));
        post_reg.insert("USER", CommandSpec::new(Box::new(ReregisterHandler), 0, None));
        post_reg.insert("PASS", CommandSpec::new(Box::new(ReregisterHandler), 0, None));

        // Channels
        post_reg.insert("JOIN", CommandSpec::new(Box::new(JoinHandler), 1, Some(2)));
        post_reg.insert("PART", CommandSpec::new(Box::new(PartHandler), 1, Some(2)));
        post_reg.insert("TOPIC", CommandSpec::new(Box::new(TopicHandler), 1, Some(2)));
        post_reg.insert("NAMES", CommandSpec::new(Box::new(NamesHandler), 0, Some(1)));
        post_reg.insert("LIST", CommandSpec::new(Box::new(ListHandler), 0, Some(1)));
        post_reg.insert("MODE", CommandSpec::new(Box::new(ModeHandler), 1, None));

        // Messaging
        post_reg.insert("PRIVMSG", CommandSpec::new(Box::new(PrivmsgHandler), 2, Some(2)));
        post_reg.insert("NOTICE", CommandSpec::new(Box::new(NoticeHandler), 0, Some(2)));

        // Queries
        post_reg.insert("WHOIS", CommandSpec::new(Box::new(WhoisHandler), 1, Some(2)));
        post_reg.insert("ISON", CommandSpec::new(Box::new(IsonHandler), 1, None));
        post_reg.insert("MOTD", CommandSpec::new(Box::new(MotdHandler), 0, Some(1)));
        post_reg.insert("LUSERS", CommandSpec::new(Box::new(LusersHandler), 0, Some(2)));
        post_reg.insert("VERSION", CommandSpec::new(Box::new(VersionHandler), 0, Some(1)));

        let registry = Self {
            pre_reg,
            post_reg,
            universal,
        };
        registry.validate();
        registry
    }

    /// Table sanity, checked once at startup.
    fn validate(&self) {
        fn bounds<H: ?Sized>(spec: &CommandSpec<H>) -> bool {
            spec.max_params.is_none_or(|max| max >= spec.min_params)
        }
        debug_assert!(self.pre_reg.values().all(bounds));
        debug_assert!(self.post_reg.values().all(bounds));
        debug_assert!(self.universal.values().all(bounds));
        debug_assert!(
            self.universal
                .keys()
                .all(|cmd| !self.pre_reg.contains_key(cmd) && !self.post_reg.contains_key(cmd)),
            "universal commands must not be shadowed"
        );
    }

    /// Dispatch a message for the given session.
    ///
    /// A successful registration switches `session` to
    /// [`Session::Registered`] before this returns.
    pub async fn dispatch(
        &self,
        ctx: &mut Context<'_>,
        session: &mut Session,
        msg: &Message,
    ) -> HandlerResult {
        let command = msg.command.to_ascii_uppercase();
        let span = debug_span!(
            "irc.command",
            command = %command,
            nick = %session.reply_target(),
            remote_addr = %ctx.remote_addr,
        );

        let started = Instant::now();
        let result = self
            .route(ctx, session, &command, msg)
            .instrument(span.clone())
            .await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        span.in_scope(|| match &result {
            Ok(()) => debug!(elapsed_ms, "command handled"),
            Err(e) => debug!(elapsed_ms, error = %e, code = e.error_code(), "command failed"),
        });

        let completed = match session {
            Session::Unregistered(handshake) => handshake.completed.take(),
            Session::Registered(_) => None,
        };
        if let Some(user) = completed {
            *session = Session::Registered(user);
        }

        result
    }

    async fn route(
        &self,
        ctx: &mut Context<'_>,
        session: &mut Session,
        command: &str,
        msg: &Message,
    ) -> HandlerResult {
        match session {
            Session::Registered(user) => {
                if let Some(spec) = self.post_reg.get(command) {
                    let msg = spec.check(command, msg)?;
                    return spec.handler.handle(ctx, user, &msg).await;
                }
                if let Some(spec) = self.universal.get(command) {
                    let msg = spec.check(command, msg)?;
                    return spec.handler.handle(ctx, &msg).await;
                }
            }
            Session::Unregistered(handshake) => {
                if let Some(spec) = self.pre_reg.get(command) {
                    let msg = spec.check(command, msg)?;
                    return spec.handler.handle(ctx, handshake, &msg).await;
                }
                if let Some(spec) = self.universal.get(command) {
                    let msg = spec.check(command, msg)?;
                    return spec.handler.handle(ctx, &msg).await;
                }
                if self.post_reg.contains_key(command) {
                    return Err(HandlerError::NotRegistered);
                }
            }
        }

        if ctx.server.config().server.reply_unknown_command {
            Err(HandlerError::UnknownCommand(command.to_string()))
        } else {
            debug!(command, "ignoring unknown command");
            Ok(())
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::test_support::Harness;

    #[tokio::test]
    async fn unregistered_privmsg_is_not_registered() {
        let mut h = Harness::new(Config::default());
        let err = h.send("PRIVMSG bob :hi").await.unwrap_err();
        assert!(matches!(err, HandlerError::NotRegistered));
        assert!(!h.session.is_registered());
    }

    #[tokio::test]
    async fn missing_params_are_rejected_before_the_handler() {
        let mut h = Harness::new(Config::default());
        let err = h.send("USER only two").await.unwrap_err();
        assert!(matches!(err, HandlerError::NeedMoreParams(cmd) if cmd == "USER"));
    }

    #[tokio::test]
    async fn unknown_commands_are_dropped_by_default() {
        let mut h = Harness::new(Config::default());
        assert!(h.send("FROBNICATE").await.is_ok());
        assert!(h.drain().is_empty());
    }

    #[tokio::test]
    async fn unknown_commands_can_be_answered() {
        let mut config = Config::default();
        config.server.reply_unknown_command = true;
        let mut h = Harness::new(config);
        let err = h.send("frobnicate").await.unwrap_err();
        assert!(matches!(err, HandlerError::UnknownCommand(cmd) if cmd == "FROBNICATE"));
    }

    #[tokio::test]
    async fn nick_and_user_complete_registration() {
        let mut h = Harness::new(Config::default());
        h.send("NICK amy").await.unwrap();
        assert!(!h.session.is_registered());
        h.send("USER amy 0 * :Amy Example").await.unwrap();
        assert!(h.session.is_registered());
        assert_eq!(h.session.reply_target(), "amy");

        let err = h.send("USER amy 0 * :again").await.unwrap_err();
        assert!(matches!(err, HandlerError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn ping_works_in_both_states() {
        let mut h = Harness::new(Config::default());
        h.send("PING abc").await.unwrap();
        let pong = h.drain().pop().unwrap();
        assert_eq!(pong.command, "PONG");
        assert_eq!(pong.params, vec!["irc.localhost", "abc"]);

        h.register("amy").await;
        h.send("PING xyz").await.unwrap();
        assert_eq!(h.drain().pop().unwrap().params[1], "xyz");
    }

    #[tokio::test]
    async fn surplus_params_are_trimmed() {
        let mut h = Harness::new(Config::default());
        h.register("amy").await;
        h.send("MOTD irc.localhost extra words").await.unwrap();
        assert!(!h.drain().is_empty());
    }
}
