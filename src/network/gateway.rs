//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds a socket and spawns a Connection task for each
//! incoming client.

use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    server: Arc<Server>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, server: Arc<Server>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Listener bound");
        Ok(Self {
            listener,
            server,
            registry: Arc::new(Registry::new()),
        })
    }

    /// Address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let id = self.server.connection_opened();
                    info!(%addr, id, "Connection accepted");

                    let server = Arc::clone(&self.server);
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        let connection =
                            Connection::new(id, stream, addr, Arc::clone(&server), registry);
                        if let Err(e) = connection.run().await {
                            error!(%addr, id, error = %e, "Connection error");
                        }
                        server.connection_closed();
                        info!(%addr, id, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
