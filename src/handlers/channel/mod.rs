//! Channel membership and query handlers.
//!
//! Handles JOIN, PART, TOPIC, NAMES and LIST. Multi-channel commands report
//! a refusal for one channel and continue with the next.

mod join;
mod list;
mod names;
mod part;
mod topic;

pub use join::JoinHandler;
pub use list::ListHandler;
pub use names::NamesHandler;
pub use part::PartHandler;
pub use topic::TopicHandler;
