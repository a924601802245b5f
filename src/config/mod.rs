//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, MotdConfig)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Size limits and keepalive timeouts (LimitsConfig, TimeoutsConfig)
//! - [`validation`]: Startup sanity checks

mod limits;
mod listen;
mod types;
mod validation;

pub use limits::{LimitsConfig, TimeoutsConfig};
pub use listen::ListenConfig;
pub use types::{Config, ConfigError, MotdConfig, ServerConfig};
pub use validation::{ValidationError, validate};
