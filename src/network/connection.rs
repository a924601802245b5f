//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task. One `tokio::select!` loop
//! multiplexes the socket reader, the outbound queue and the keepalive
//! timers, so every write for this client goes through a single
//! `FramedWrite` in queue order.
//!
//! ```text
//!  FramedRead ──▶ Registry::dispatch ──▶ ClientSender ──┐
//!                                          ▲            │
//!                     other connections ───┘            ▼
//!                                                  FramedWrite
//! ```

use crate::error::HandlerError;
use crate::handlers::{Context, Registry, Session};
use crate::state::{ClientSender, Server, closing_link};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tinyirc_proto::{IrcCodec, Message, ProtocolError};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until, timeout};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument, warn};

/// How long the final flush may take before the socket is dropped anyway.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

const RESET_BY_PEER: &str = "Connection reset by peer.";

type Writer = FramedWrite<OwnedWriteHalf, IrcCodec>;

/// A client connection handler.
pub struct Connection {
    id: u64,
    addr: SocketAddr,
    server: Arc<Server>,
    registry: Arc<Registry>,
    stream: TcpStream,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        id: u64,
        stream: TcpStream,
        addr: SocketAddr,
        server: Arc<Server>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            id,
            addr,
            server,
            registry,
            stream,
        }
    }

    /// Serve the client until it quits, times out or goes away.
    #[instrument(skip(self), fields(id = self.id, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            addr,
            server,
            registry,
            stream,
            ..
        } = self;
        let config = server.config();

        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, IrcCodec::new());
        let mut writer = FramedWrite::new(write_half, IrcCodec::new());

        let (sender, mut outgoing) = ClientSender::channel(config.limits.sendq);
        let mut session = Session::default();

        let registration_deadline = Instant::now() + config.timeouts.registration_timeout();
        let ping_period = config.timeouts.ping_interval();
        let mut ping = interval_at(Instant::now() + ping_period, ping_period);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut pong_deadline: Option<Instant> = None;

        debug!("Client connected");

        let reason = loop {
            let registered = session.is_registered();
            let registration = (!registered).then_some(registration_deadline);

            tokio::select! {
                Some(msg) = outgoing.recv() => {
                    if let Err(reason) = write(&mut writer, msg).await {
                        break reason;
                    }
                }

                frame = reader.next() => {
                    let msg = match frame {
                        Some(Ok(msg)) => msg,
                        Some(Err(e)) => {
                            debug!(error = %e, "Read error");
                            break RESET_BY_PEER.to_string();
                        }
                        None => break RESET_BY_PEER.to_string(),
                    };

                    let mut ctx = Context::new(&server, &sender, addr);
                    let result = registry.dispatch(&mut ctx, &mut session, &msg).await;
                    if ctx.pong_received {
                        pong_deadline = None;
                    }
                    if !registered && session.is_registered() {
                        ping.reset();
                    }

                    match result {
                        Ok(()) => {}
                        Err(HandlerError::Quit(message)) => {
                            break match message {
                                Some(text) => format!("Quit: {text}"),
                                None => "Client Quit".to_string(),
                            };
                        }
                        Err(e) => {
                            if let Some(reply) = e.to_irc_reply(server.name(), &session.reply_target()) {
                                sender.send(reply);
                            }
                            if e.is_fatal() {
                                break "Bad Password".to_string();
                            }
                        }
                    }
                }

                _ = wait_until(registration) => {
                    info!("Registration timed out");
                    break "Registration timeout".to_string();
                }

                _ = ping.tick(), if registered => {
                    sender.send(Message::new("PING", vec![server.name().to_string()]));
                    if pong_deadline.is_none() {
                        pong_deadline = Some(Instant::now() + config.timeouts.ping_timeout());
                    }
                }

                _ = wait_until(pong_deadline) => {
                    break "Ping timeout".to_string();
                }

                _ = sender.closed() => {
                    break sender
                        .close_reason()
                        .unwrap_or_else(|| "Connection closed".to_string());
                }
            }
        };

        match session.user() {
            Some(user) => server.quit_user(user, &reason),
            None => info!(%reason, "Unregistered client closed"),
        }

        let host = addr.ip().to_string();
        let farewell = async {
            flush_queue(&mut writer, &mut outgoing).await;
            if !session.is_registered() {
                let _ = writer.send(closing_link(&host, &reason)).await;
            }
        };
        if timeout(CLOSE_FLUSH_TIMEOUT, farewell).await.is_err() {
            warn!("Timed out flushing final messages");
        }

        Ok(())
    }
}

/// Write one queued message. Oversized lines are dropped; any other failure
/// ends the connection.
async fn write(writer: &mut Writer, msg: Message) -> Result<(), String> {
    match writer.send(msg).await {
        Ok(()) => Ok(()),
        Err(ProtocolError::MessageTooLong { actual, limit }) => {
            warn!(actual, limit, "Dropping oversized outbound message");
            Ok(())
        }
        Err(e) => {
            debug!(error = %e, "Write error");
            Err(RESET_BY_PEER.to_string())
        }
    }
}

/// Write everything still queued, in order.
async fn flush_queue(writer: &mut Writer, outgoing: &mut mpsc::Receiver<Message>) {
    while let Ok(msg) = outgoing.try_recv() {
        if write(writer, msg).await.is_err() {
            return;
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
