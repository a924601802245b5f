//! NAMES replies, split across lines when a channel is too big for one.

use super::{Channel, Member};
use crate::config::Config;
use crate::state::user::User;
use tinyirc_proto::{MAX_LINE_LEN, Message, ProtocolError, Response};

impl Channel {
    /// Build the 353 lines for `target`.
    ///
    /// The whole member list goes in one line when it fits. Otherwise it is
    /// reflowed into chunks sized for the worst case, `nick_len + 2` bytes per
    /// entry (prefix and separator). An error means even one entry per line
    /// does not fit.
    pub fn names_replies(
        &self,
        target: &str,
        config: &Config,
    ) -> Result<Vec<Message>, ProtocolError> {
        let server = &config.server.name;
        let symbol = if self.flags.secret { "@" } else { "=" };
        let entries = self.prefixed_nicks();

        let build = |chunk: &[String]| {
            Message::response(
                server,
                Response::RPL_NAMREPLY,
                vec![
                    target.to_string(),
                    symbol.to_string(),
                    self.name.clone(),
                    chunk.join(" "),
                ],
            )
        };

        let whole = build(&entries);
        match whole.to_line() {
            Ok(_) => return Ok(vec![whole]),
            Err(e) if e.too_long().is_none() => return Err(e),
            Err(_) => {}
        }

        let header = build(&[]).encoded_len();
        let budget = MAX_LINE_LEN.saturating_sub(header);
        let per_line = (budget / (config.limits.nick_len + 2)).max(1);

        entries
            .chunks(per_line)
            .map(|chunk| {
                let msg = build(chunk);
                msg.to_line()?;
                Ok(msg)
            })
            .collect()
    }

    /// 366 for `target`.
    pub fn end_of_names(&self, target: &str, server: &str) -> Message {
        Message::response(
            server,
            Response::RPL_ENDOFNAMES,
            vec![
                target.to_string(),
                self.name.clone(),
                "End of NAMES list".to_string(),
            ],
        )
    }

    /// Send NAMES to `user`, with the 366 terminator when `with_end` is set.
    pub fn send_names(
        &self,
        user: &User,
        config: &Config,
        with_end: bool,
    ) -> Result<(), ProtocolError> {
        let nick = user.nick();
        for msg in self.names_replies(&nick, config)? {
            user.send(msg);
        }
        if with_end {
            user.send(self.end_of_names(&nick, &config.server.name));
        }
        Ok(())
    }

    /// Members in NAMES order with their prefix, e.g. `@amy`.
    pub fn prefixed_nicks(&self) -> Vec<String> {
        self.members
            .values()
            .filter_map(|m: &Member| m.user().map(|u| format!("{}{}", m.prefix(), u.nick())))
            .collect()
    }
}
