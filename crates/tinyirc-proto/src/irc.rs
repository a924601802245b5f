//! Message codec for tokio.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;
use crate::line::LineCodec;
use crate::message::Message;

/// Tokio codec for decoding and encoding [`Message`]s.
///
/// Empty and unparsable lines are skipped while decoding. Encoding refuses
/// lines over the 512-byte limit with
/// [`ProtocolError::MessageTooLong`](crate::ProtocolError::MessageTooLong).
#[derive(Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a codec with the standard line limit.
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(),
        }
    }

    /// Drop anything after an embedded line break so one message can never
    /// produce two lines.
    pub fn sanitize(mut data: String) -> String {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }
        data
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        while let Some(line) = self.inner.decode(src)? {
            if let Ok(msg) = Message::parse(&line) {
                return Ok(Some(msg));
            }
        }
        Ok(None)
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        let line = msg.to_line()?;
        let mut line = Self::sanitize(line);
        line.push_str("\r\n");
        self.inner.encode(line, dst)
    }
}
