//! Size limits and keepalive timing.

use serde::Deserialize;
use std::time::Duration;

/// Name lengths and resource ceilings.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum nickname length; longer nicks are truncated (default: 9).
    #[serde(default = "default_nick_len")]
    pub nick_len: usize,
    /// Maximum channel name length in bytes (default: 50).
    #[serde(default = "default_channel_len")]
    pub channel_len: usize,
    /// Hard ceiling on channel membership; `+l` is capped to it (default: 100).
    #[serde(default = "default_max_channel_members")]
    pub max_channel_members: usize,
    /// Outbound queue depth per connection before it is dropped (default: 4096).
    #[serde(default = "default_sendq")]
    pub sendq: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            nick_len: default_nick_len(),
            channel_len: default_channel_len(),
            max_channel_members: default_max_channel_members(),
            sendq: default_sendq(),
        }
    }
}

fn default_nick_len() -> usize {
    9
}

fn default_channel_len() -> usize {
    50
}

fn default_max_channel_members() -> usize {
    100
}

fn default_sendq() -> usize {
    4096
}

/// Keepalive and registration timers, in seconds.
///
/// Every `ping_interval` a registered client is sent a PING; if no PONG
/// arrives within `ping_timeout` it is disconnected with "Ping timeout".
#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutsConfig {
    /// Seconds between keepalive PINGs (default: 90).
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    /// Seconds to wait for PONG after a PING (default: 120).
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
    /// Seconds allowed for NICK/USER before disconnect (default: `ping_timeout`).
    pub registration: Option<u64>,
}

impl TimeoutsConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout)
    }

    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration.unwrap_or(self.ping_timeout))
    }
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            ping_interval: default_ping_interval(),
            ping_timeout: default_ping_timeout(),
            registration: None,
        }
    }
}

fn default_ping_interval() -> u64 {
    90
}

fn default_ping_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_default_values() {
        let config = LimitsConfig::default();
        assert_eq!(config.nick_len, 9);
        assert_eq!(config.channel_len, 50);
        assert_eq!(config.max_channel_members, 100);
        assert_eq!(config.sendq, 4096);
    }

    #[test]
    fn timeouts_default_values() {
        let config = TimeoutsConfig::default();
        assert_eq!(config.ping_interval(), Duration::from_secs(90));
        assert_eq!(config.ping_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn registration_timeout_falls_back_to_ping_timeout() {
        let mut config = TimeoutsConfig::default();
        assert_eq!(config.registration_timeout(), Duration::from_secs(120));
        config.registration = Some(5);
        assert_eq!(config.registration_timeout(), Duration::from_secs(5));
    }
}
