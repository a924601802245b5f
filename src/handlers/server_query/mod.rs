//! Server query handlers: MOTD, LUSERS, VERSION.

mod lusers;
mod motd;
mod version;

pub use lusers::LusersHandler;
pub use motd::MotdHandler;
pub use version::VersionHandler;

pub(crate) use lusers::send_lusers;
pub(crate) use motd::send_motd;
