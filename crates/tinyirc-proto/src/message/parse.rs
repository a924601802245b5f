//! Nom-based line parser.

use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use super::types::Message;
use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

/// Parse the message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if (is_all_letters || is_three_digits) && (rest.is_empty() || rest.starts_with(' ')) {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Split the parameter tail.
///
/// Runs of spaces separate parameters; a token starting with `:` begins the
/// trailing parameter, which keeps the rest of the line verbatim.
fn parse_params(input: &str) -> SmallVec<[&str; 15]> {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    params
}

type RawMessage<'a> = (Option<&'a str>, &'a str, SmallVec<[&'a str; 15]>);

fn parse_message(input: &str) -> IResult<&str, RawMessage<'_>> {
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let params = parse_params(input);
    Ok(("", (prefix, command, params)))
}

impl Message {
    /// Parse one line, with or without its line terminator.
    pub fn parse(line: &str) -> Result<Message, ProtocolError> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: trimmed.to_owned(),
            cause,
        };

        if trimmed.trim().is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let (prefix, command, params) = match parse_message(trimmed) {
            Ok((_, raw)) => raw,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let position = trimmed.len() - e.input.len();
                return Err(invalid(MessageParseError::InvalidCommand { position }));
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(invalid(MessageParseError::InvalidCommand {
                    position: trimmed.len(),
                }));
            }
        };

        let prefix = prefix.map(Prefix::parse).transpose().map_err(invalid)?;

        Ok(Message {
            prefix,
            command: command.to_owned(),
            params: params.into_iter().map(str::to_owned).collect(),
        })
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}
