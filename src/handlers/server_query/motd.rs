//! MOTD handler.

use crate::error::HandlerResult;
use crate::handlers::{Context, PostRegHandler};
use crate::state::{Server, User};
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::{Message, Response};

/// Longest MOTD line sent, in characters.
const MOTD_LINE_WIDTH: usize = 80;

/// Handler for MOTD command.
pub struct MotdHandler;

#[async_trait]
impl PostRegHandler for MotdHandler {
    async fn handle(&self, ctx: &mut Context<'_>, user: &Arc<User>, _msg: &Message) -> HandlerResult {
        send_motd(ctx.server, user);
        Ok(())
    }
}

/// 375, one 372 per line, 376; or 422 when there is no MOTD.
pub(crate) fn send_motd(server: &Server, user: &User) {
    let name = server.name();
    let nick = user.nick();
    let lines = &server.config().motd.lines;

    if lines.is_empty() {
        user.send(Message::response(
            name,
            Response::ERR_NOMOTD,
            vec![nick, "MOTD File is missing".to_string()],
        ));
        return;
    }

    user.send(Message::response(
        name,
        Response::RPL_MOTDSTART,
        vec![nick.clone(), format!("- {name} Message of the day - ")],
    ));
    for line in lines {
        let line: String = line.chars().take(MOTD_LINE_WIDTH).collect();
        user.send(Message::response(
            name,
            Response::RPL_MOTD,
            vec![nick.clone(), format!("- {line}")],
        ));
    }
    user.send(Message::response(
        name,
        Response::RPL_ENDOFMOTD,
        vec![nick, "End of MOTD command".to_string()],
    ));
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::handlers::test_support::Harness;
    use tinyirc_proto::Response;

    #[tokio::test]
    async fn missing_motd_is_422() {
        let mut h = Harness::new(Config::default());
        h.register("amy").await;
        h.send("MOTD").await.unwrap();
        let got = h.drain();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].numeric(), Some(Response::ERR_NOMOTD));
    }

    #[tokio::test]
    async fn long_lines_are_cut_at_80() {
        let mut config = Config::default();
        config.motd.lines = vec!["x".repeat(200), "short".to_string()];
        let mut h = Harness::new(config);
        h.register("amy").await;
        h.send("MOTD").await.unwrap();

        let got = h.drain();
        assert_eq!(got.len(), 4);
        assert_eq!(got[1].params[1], format!("- {}", "x".repeat(80)));
        assert_eq!(got[2].params[1], "- short");
        assert_eq!(got[3].numeric(), Some(Response::RPL_ENDOFMOTD));
    }
}
