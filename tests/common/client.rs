//! Test IRC client.
//!
//! Provides an IRC client for integration testing that can send commands
//! and assert on received responses.

use std::time::Duration;
use tinyirc_proto::{Message, Response};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    /// Send a raw IRC line; CRLF is appended when missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout. EOF is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {}", e))
    }

    /// Receive messages until the predicate matches, returning all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Receive until a numeric reply with the given code.
    pub async fn recv_numeric(&mut self, response: Response) -> anyhow::Result<Vec<Message>> {
        self.recv_until(|msg| msg.numeric() == Some(response)).await
    }

    /// Receive until a message with the given command verb.
    pub async fn recv_command(&mut self, command: &str) -> anyhow::Result<Message> {
        let mut messages = self.recv_until(|msg| msg.command == command).await?;
        messages
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no {command} received"))
    }

    /// Wait for the server to close the connection, returning what came before.
    pub async fn recv_until_closed(&mut self) -> anyhow::Result<Vec<Message>> {
        let mut messages = Vec::new();
        loop {
            let mut line = String::new();
            let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
            if read == 0 {
                return Ok(messages);
            }
            messages.push(
                line.trim_end()
                    .parse::<Message>()
                    .map_err(|e| anyhow::anyhow!("Parse error: {}", e))?,
            );
        }
    }

    /// Assert nothing arrives for a short while.
    pub async fn expect_silence(&mut self) -> anyhow::Result<()> {
        match self.recv_timeout(Duration::from_millis(200)).await {
            Ok(msg) => anyhow::bail!("unexpected message: {msg}"),
            Err(_) => Ok(()),
        }
    }

    /// Register with the server (NICK + USER) and consume the welcome burst,
    /// which ends with the MOTD.
    pub async fn register(&mut self) -> anyhow::Result<Vec<Message>> {
        let nick = self.nick.clone();
        self.send_raw(&format!("NICK {nick}")).await?;
        self.send_raw(&format!("USER {} 0 * :Test User {nick}", nick.to_lowercase()))
            .await?;

        let burst = self
            .recv_until(|msg| {
                matches!(
                    msg.numeric(),
                    Some(
                        Response::RPL_ENDOFMOTD
                            | Response::ERR_NOMOTD
                            | Response::ERR_NICKNAMEINUSE
                    )
                )
            })
            .await?;
        if !burst.iter().any(|m| m.numeric() == Some(Response::RPL_WELCOME)) {
            anyhow::bail!("Registration failed: no RPL_WELCOME received");
        }
        Ok(burst)
    }

    /// Join a channel and wait for the end of its NAMES.
    pub async fn join(&mut self, channel: &str) -> anyhow::Result<Vec<Message>> {
        self.send_raw(&format!("JOIN {channel}")).await?;
        self.recv_numeric(Response::RPL_ENDOFNAMES).await
    }

    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG {target} :{text}")).await
    }

    pub async fn quit(&mut self, reason: Option<&str>) -> anyhow::Result<()> {
        match reason {
            Some(reason) => self.send_raw(&format!("QUIT :{reason}")).await,
            None => self.send_raw("QUIT").await,
        }
    }
}
