//! Integration tests for loading configuration files.

use std::io::Write;
use tinyircd::config::{Config, ConfigError};

#[test]
fn loads_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
name = "irc.example.net"

[listen]
address = "0.0.0.0:6697"

[limits]
nick_len = 16

[timeouts]
ping_interval = 30

[motd]
lines = ["hello", "world"]
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.name, "irc.example.net");
    assert_eq!(config.listen.address.port(), 6697);
    assert_eq!(config.limits.nick_len, 16);
    assert_eq!(config.limits.channel_len, 50);
    assert_eq!(config.timeouts.ping_interval, 30);
    assert_eq!(config.timeouts.registration_timeout().as_secs(), 120);
    assert_eq!(config.motd.lines.len(), 2);
}

#[test]
fn empty_file_is_a_working_config() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.name, "irc.localhost");
    assert_eq!(config.listen.address.to_string(), "127.0.0.1:6667");
}

#[test]
fn invalid_values_are_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[limits]\nnick_len = 0").unwrap();
    assert!(matches!(
        Config::load(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(ConfigError::Io(_))
    ));
}
