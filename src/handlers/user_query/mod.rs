//! User query handlers: WHOIS and ISON.

mod ison;
mod whois;

pub use ison::IsonHandler;
pub use whois::WhoisHandler;
