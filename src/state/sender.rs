//! Per-connection outbound queue.

use parking_lot::Mutex;
use std::sync::Arc;
use tinyirc_proto::Message;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Handle for queueing messages to one connection.
///
/// The connection task is the only consumer, so messages are written in the
/// order they were queued. Sending never waits: a full queue closes the
/// connection with "SendQ exceeded".
#[derive(Clone, Debug)]
pub struct ClientSender {
    tx: mpsc::Sender<Message>,
    closing: CancellationToken,
    reason: Arc<Mutex<Option<String>>>,
}

impl ClientSender {
    /// Create a sender and the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sender = Self {
            tx,
            closing: CancellationToken::new(),
            reason: Arc::new(Mutex::new(None)),
        };
        (sender, rx)
    }

    /// Queue a message.
    pub fn send(&self, msg: Message) {
        match self.tx.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("outbound queue full, closing connection");
                self.close("SendQ exceeded");
            }
            // The connection is already gone.
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Ask the connection task to close. The first reason given wins.
    pub fn close(&self, reason: impl Into<String>) {
        let mut slot = self.reason.lock();
        if slot.is_none() {
            *slot = Some(reason.into());
        }
        drop(slot);
        self.closing.cancel();
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.closing.cancelled().await;
    }

    /// Whether a close was requested.
    pub fn is_closing(&self) -> bool {
        self.closing.is_cancelled()
    }

    /// The reason given to the first [`close`](Self::close) call.
    pub fn close_reason(&self) -> Option<String> {
        self.reason.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_arrive_in_order() {
        let (sender, mut rx) = ClientSender::channel(8);
        for i in 0..5 {
            sender.send(Message::notice("bob", i.to_string()));
        }
        for i in 0..5 {
            assert_eq!(rx.try_recv().unwrap().param(1), Some(i.to_string().as_str()));
        }
    }

    #[test]
    fn full_queue_closes_the_connection() {
        let (sender, _rx) = ClientSender::channel(1);
        sender.send(Message::notice("bob", "one"));
        assert!(!sender.is_closing());
        sender.send(Message::notice("bob", "two"));
        assert!(sender.is_closing());
        assert_eq!(sender.close_reason().as_deref(), Some("SendQ exceeded"));
    }

    #[test]
    fn first_close_reason_wins() {
        let (sender, _rx) = ClientSender::channel(1);
        sender.close("Ping timeout");
        sender.close("SendQ exceeded");
        assert_eq!(sender.close_reason().as_deref(), Some("Ping timeout"));
    }

    #[tokio::test]
    async fn closed_resolves_after_close() {
        let (sender, _rx) = ClientSender::channel(1);
        let waiter = sender.clone();
        let task = tokio::spawn(async move { waiter.closed().await });
        sender.close("bye");
        task.await.unwrap();
    }
}
