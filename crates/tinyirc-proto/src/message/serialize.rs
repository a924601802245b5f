//! Line encoding.

use std::fmt;

use super::types::{Message, MAX_LINE_LEN};
use crate::error::{ProtocolError, Result};

/// A final parameter needs the `:` marker when it could not otherwise be
/// told apart from a middle parameter.
fn needs_colon(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl fmt::Display for Message {
    /// Formats the line without its CRLF terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;

        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                write!(f, " {}", param)?;
            }
            if needs_colon(last) {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }
        Ok(())
    }
}

impl Message {
    /// Encode as a wire line including CRLF.
    ///
    /// Fails with [`ProtocolError::MessageTooLong`] when the result would
    /// exceed [`MAX_LINE_LEN`]; nothing is truncated.
    pub fn to_line(&self) -> Result<String> {
        let mut line = self.to_string();
        line.push_str("\r\n");
        if line.len() > MAX_LINE_LEN {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: MAX_LINE_LEN,
            });
        }
        Ok(line)
    }

    /// Encoded length including CRLF, whether or not it fits.
    pub fn encoded_len(&self) -> usize {
        self.to_string().len() + 2
    }
}
