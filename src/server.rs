//! TCP listener and dispatcher for the tarpit.
//!
//! Owns the listening socket, accepts incoming connections, and spawns one
//! independent session task per peer. The accept loop never waits on a
//! session, and sessions share nothing with each other beyond the
//! immutable configuration.

use crate::config::Config;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Server instance
pub struct Server {
    config: Arc<Config>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Server {
            config: Arc::new(config),
        }
    }

    /// Bind the configured address and trap connections until the process
    /// is stopped. A bind failure is fatal and propagates to the caller.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.config.listen).await?;
        info!(address = %self.config.listen, "Server listening");
        self.serve(listener).await;
        Ok(())
    }

    /// Accept connections until accept fails or an interrupt arrives.
    /// Either way the listener is dropped and the loop exits cleanly;
    /// nothing here is ever retried.
    async fn serve(&self, listener: TcpListener) {
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(peer = %peer, "New connection");
                        let config = Arc::clone(&self.config);
                        tokio::spawn(async move {
                            let mut session = Session::new(peer);
                            session.run(stream, &config).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection, shutting down");
                        return;
                    }
                },
                _ = &mut shutdown => {
                    info!("Interrupt received, shutting down");
                    return;
                }
            }
        }
    }
}
