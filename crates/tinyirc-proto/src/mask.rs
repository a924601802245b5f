//! Address masks.
//!
//! Ban, exception and invite lists store globs over a user address
//! (`nick!user@host`). Masks are normalized so that equivalent spellings
//! share one list entry.

use crate::casemap::{irc_lower_char, irc_to_lower};

fn or_star(segment: &str) -> &str {
    if segment.is_empty() {
        "*"
    } else {
        segment
    }
}

/// Normalize a mask into lower-cased `nick!user@host` form.
///
/// Missing or empty segments become `*`:
/// - `bob` becomes `bob!*@*`
/// - `~u@host` becomes `*!~u@host`
/// - `bob!u` becomes `bob!u@*`
pub fn normalize_mask(mask: &str) -> String {
    let (nick, user, host) = match mask.split_once('!') {
        Some((nick, rest)) => match rest.split_once('@') {
            Some((user, host)) => (nick, user, host),
            None => (nick, rest, ""),
        },
        None => match mask.split_once('@') {
            Some((user, host)) => ("", user, host),
            None => (mask, "", ""),
        },
    };

    irc_to_lower(&format!(
        "{}!{}@{}",
        or_star(nick),
        or_star(user),
        or_star(host)
    ))
}

/// Case-insensitive glob match supporting `*` and `?`.
pub fn matches_mask(pattern: &str, address: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().map(irc_lower_char).collect();
    let text: Vec<char> = address.chars().map(irc_lower_char).collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, tried)) => {
                    p = star + 1;
                    t = tried + 1;
                    backtrack = Some((star, tried + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
