//! Channel mode-string parsing.
//!
//! `MODE #chan +b-o mask nick` is parsed into one [`ModeChange`] per mode
//! character. Each character that takes a parameter consumes the next
//! positional argument, if one is left.

use std::fmt;

/// Channel modes understood by the daemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    /// `b` - ban mask
    Ban,
    /// `e` - ban exception mask
    Exception,
    /// `I` - invite mask
    InviteMask,
    /// `i` - invite-only flag
    InviteOnly,
    /// `k` - channel key
    Key,
    /// `l` - member limit
    Limit,
    /// `m` - moderated flag
    Moderated,
    /// `o` - channel operator
    Oper,
    /// `s` - secret flag
    Secret,
    /// `v` - voice
    Voice,
}

impl ChannelMode {
    /// Look up a mode by its letter.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'b' => Self::Ban,
            'e' => Self::Exception,
            'I' => Self::InviteMask,
            'i' => Self::InviteOnly,
            'k' => Self::Key,
            'l' => Self::Limit,
            'm' => Self::Moderated,
            'o' => Self::Oper,
            's' => Self::Secret,
            'v' => Self::Voice,
            _ => return None,
        })
    }

    /// The mode letter.
    pub fn as_char(self) -> char {
        match self {
            Self::Ban => 'b',
            Self::Exception => 'e',
            Self::InviteMask => 'I',
            Self::InviteOnly => 'i',
            Self::Key => 'k',
            Self::Limit => 'l',
            Self::Moderated => 'm',
            Self::Oper => 'o',
            Self::Secret => 's',
            Self::Voice => 'v',
        }
    }

    /// Whether the mode consumes a positional parameter in this direction.
    /// `-l` is the only signed form that goes without one.
    pub fn takes_arg(self, adding: bool) -> bool {
        match self {
            Self::InviteOnly | Self::Moderated | Self::Secret => false,
            Self::Limit => adding,
            _ => true,
        }
    }

    /// Whether the mode is a mask list (`b`, `e`, `I`).
    pub fn is_list_mode(self) -> bool {
        matches!(self, Self::Ban | Self::Exception | Self::InviteMask)
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single `+x`/`-x` operation with its parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeChange {
    /// `true` for `+`, `false` for `-`.
    pub adding: bool,
    /// Which mode.
    pub mode: ChannelMode,
    /// Parameter, when the mode takes one and one was supplied.
    pub arg: Option<String>,
}

impl ModeChange {
    /// Build a change.
    pub fn new(adding: bool, mode: ChannelMode, arg: Option<String>) -> Self {
        Self { adding, mode, arg }
    }
}

/// Parse the mode-strings and arguments following the channel name.
///
/// Pieces are read left to right. Every mode letter that takes a parameter
/// consumes the next piece whatever it looks like, so `+k -pw` sets the key
/// `-pw`. A piece left over once the current mode-string is exhausted starts
/// the next mode-string if it begins with `+` or `-`, and is dropped
/// otherwise. Only the first mode-string may omit the sign, meaning add.
/// Letters that are not channel modes are skipped.
pub fn parse_channel_modes<S: AsRef<str>>(pieces: &[S]) -> Vec<ModeChange> {
    let mut changes = Vec::new();
    let mut pieces = pieces.iter().map(AsRef::<str>::as_ref);

    let mut first = true;
    while let Some(mode_string) = pieces.next() {
        if !first && !mode_string.starts_with(['+', '-']) {
            continue;
        }
        first = false;
        let mut adding = true;
        for c in mode_string.chars() {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                c => {
                    let Some(mode) = ChannelMode::from_char(c) else {
                        continue;
                    };
                    let arg = if mode.takes_arg(adding) {
                        pieces.next().map(str::to_owned)
                    } else {
                        None
                    };
                    changes.push(ModeChange::new(adding, mode, arg));
                }
            }
        }
    }

    changes
}

/// Compose changes into a mode-string and its arguments, e.g.
/// `("+b-o", ["mask", "nick"])`.
///
/// A sign is only written when the polarity differs from the previous
/// change.
pub fn format_mode_changes(changes: &[ModeChange]) -> (String, Vec<String>) {
    let mut modes = String::new();
    let mut args = Vec::new();
    let mut current: Option<bool> = None;

    for change in changes {
        if current != Some(change.adding) {
            modes.push(if change.adding { '+' } else { '-' });
            current = Some(change.adding);
        }
        modes.push(change.mode.as_char());
        if let Some(arg) = &change.arg {
            args.push(arg.clone());
        }
    }

    (modes, args)
}
