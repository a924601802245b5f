//! State management module.
//!
//! Contains the Server (shared server state) and the entities it tracks.

pub mod catalog;
pub mod channel;
mod router;
mod sender;
mod server;
pub(crate) mod user;

pub use catalog::{CaseMap, ChannelCatalog, ChannelRef, UserCatalog};
pub use channel::{Channel, ChannelFlags, ListEntry, MaskList, Member, Topic};
pub use router::{Entity, EntityRouter};
pub use sender::ClientSender;
pub use server::{Server, closing_link};
pub use user::{User, UserInfo, validate_nick};
