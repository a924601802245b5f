//! rfc1459 case folding for nicks and channel names.
//!
//! ASCII letters fold as usual; `[ ] \ ~` fold to `{ } | ^`. Everything
//! else, including non-ASCII, is left untouched.

/// Fold one character.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    let folded = match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c,
    };
    folded.to_ascii_lowercase()
}

/// Fold a whole name, e.g. for use as a catalog key.
pub fn irc_to_lower(name: &str) -> String {
    name.chars().map(irc_lower_char).collect()
}

/// Whether two names are the same once folded.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.chars().map(irc_lower_char).eq(b.chars().map(irc_lower_char))
}
