//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces")]
    SpaceInServerName,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if config.server.name.contains(' ') {
        errors.push(ValidationError::SpaceInServerName);
    }

    let limits = &config.limits;
    for (name, value) in [
        ("nick_len", limits.nick_len),
        ("channel_len", limits.channel_len),
        ("max_channel_members", limits.max_channel_members),
        ("sendq", limits.sendq),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(name));
        }
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("ping_interval", timeouts.ping_interval),
        ("ping_timeout", timeouts.ping_timeout),
        ("registration", timeouts.registration.unwrap_or(1)),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
