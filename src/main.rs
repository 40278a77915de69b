//! mire: a TCP tarpit
//!
//! Accepts connections that were never going to be served and keeps their
//! initiators waiting: each peer is drained of whatever it has to say,
//! then fed an endless trickle of random base64-looking noise in place of
//! a real login banner. Scanners hold the connection open waiting for a
//! handshake that never completes.
//!
//! Features:
//! - One independent session task per connection, no shared state
//! - Deadline-bounded I/O so dead peers are reaped within a second
//! - Re-randomized line lengths and delays (no periodic signature)
//! - Configuration via CLI arguments or TOML file

mod config;
mod ident;
mod payload;
mod server;
mod session;

use config::Config;
use server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.listen,
        max_delay = ?config.max_delay,
        max_line_length = config.max_line_length,
        "Starting mire tarpit"
    );

    Server::new(config).run().await?;
    Ok(())
}
