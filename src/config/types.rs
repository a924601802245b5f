//! Core configuration types.

use super::limits::{LimitsConfig, TimeoutsConfig};
use super::listen::ListenConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Server configuration.
///
/// Every section is optional; an empty file yields a working local server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Name lengths, channel size ceiling and queue depth.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Keepalive and registration timers.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    /// Message of the Day configuration.
    #[serde(default)]
    pub motd: MotdConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        super::validate(&config).map_err(|errors| {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ConfigError::Invalid(joined.join("; "))
        })?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name used as the origin of numeric replies.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Version string reported in 002/004/351.
    #[serde(default = "default_version")]
    pub version: String,
    /// Creation date reported in 003. Defaults to process start time.
    #[serde(default = "default_created")]
    pub created: String,
    /// Server info line for WHOIS and VERSION.
    #[serde(default = "default_description")]
    pub description: String,
    /// Supported user-mode letters, advertised in 004.
    #[serde(default = "default_user_modes")]
    pub user_modes: String,
    /// Supported channel-mode letters, advertised in 004.
    #[serde(default = "default_channel_modes")]
    pub channel_modes: String,
    /// Global connection password (optional).
    pub password: Option<String>,
    /// Answer unknown commands with 421 instead of dropping them.
    #[serde(default)]
    pub reply_unknown_command: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_version(),
            created: default_created(),
            description: default_description(),
            user_modes: default_user_modes(),
            channel_modes: default_channel_modes(),
            password: None,
            reply_unknown_command: false,
        }
    }
}

fn default_server_name() -> String {
    "irc.localhost".to_string()
}

fn default_version() -> String {
    format!("tinyircd-{}", env!("CARGO_PKG_VERSION"))
}

fn default_created() -> String {
    chrono::Utc::now()
        .format("%a %b %d %Y at %H:%M:%S UTC")
        .to_string()
}

fn default_description() -> String {
    "tinyircd server".to_string()
}

fn default_user_modes() -> String {
    "i".to_string()
}

fn default_channel_modes() -> String {
    "beIiklmosv".to_string()
}

/// Message of the Day (MOTD) configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MotdConfig {
    /// Inline MOTD lines. Empty means "MOTD File is missing".
    #[serde(default)]
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_a_valid_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.name, "irc.localhost");
        assert_eq!(config.server.user_modes, "i");
        assert_eq!(config.server.channel_modes, "beIiklmosv");
        assert!(config.server.password.is_none());
        assert!(!config.server.reply_unknown_command);
        assert!(config.motd.lines.is_empty());
    }

    #[test]
    fn default_version_carries_crate_version() {
        assert!(default_version().starts_with("tinyircd-"));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
[server]
name = "irc.test"
created = "today"

[listen]
address = "0.0.0.0:7000"

[limits]
nick_len = 16

[timeouts]
ping_interval = 30

[motd]
lines = ["hello", "world"]
"#,
        )
        .unwrap();
        assert_eq!(config.server.name, "irc.test");
        assert_eq!(config.server.created, "today");
        assert_eq!(config.listen.address.port(), 7000);
        assert_eq!(config.limits.nick_len, 16);
        assert_eq!(config.limits.channel_len, 50);
        assert_eq!(config.timeouts.ping_interval, 30);
        assert_eq!(config.motd.lines, vec!["hello", "world"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::parse("[limits]\nnick_len = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = Config::parse("[server\nname = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nname = \"irc.file\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.name, "irc.file");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
