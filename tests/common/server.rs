//! Test server management.
//!
//! Runs a gateway inside the test's runtime on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use tinyircd::config::Config;
use tinyircd::network::Gateway;
use tinyircd::state::Server;
use tokio::task::JoinHandle;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    #[allow(dead_code)]
    pub server: Arc<Server>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server with the default configuration and a one-line MOTD.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(
            r#"
[server]
name = "test.server"

[motd]
lines = ["Test Server"]
"#,
        )
        .await
    }

    /// Spawn a server from TOML configuration text.
    pub async fn spawn_with(config: &str) -> anyhow::Result<Self> {
        let mut config = Config::parse(config)?;
        config.listen.address = SocketAddr::from(([127, 0, 0, 1], 0));

        let server = Arc::new(Server::new(config));
        let gateway = Gateway::bind(server.config().listen.address, Arc::clone(&server)).await?;
        let addr = gateway.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self {
            addr,
            server,
            handle,
        })
    }

    /// Address clients should connect to.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
