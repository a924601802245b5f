//! tinyircd - a small IRC daemon.
//!
//! The daemon core: registration, nick and channel catalogs, channel modes
//! with ban/except/invite lists, messaging and keepalive. The binary in
//! `main.rs` only loads the configuration and runs a [`network::Gateway`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
