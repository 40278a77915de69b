//! Per-connection tarpit sessions.
//!
//! A session drives one trapped connection through two phases:
//!
//! 1. **Drain**: read and discard whatever the peer sends up front, so a
//!    client that talks before waiting for our side of the handshake does
//!    not wedge the pipe.
//! 2. **Stall**: write random banner-looking noise at random intervals,
//!    forever, until the peer gives up.
//!
//! Every read and write runs under a fixed one-second window; an operation
//! that cannot finish inside its window ends the phase (drain) or the
//! connection (stall). The peer's machine, not ours, is always the slow
//! side, so a stuck write means the peer is gone.
//!
//! Sessions are generic over the stream so both phases can be exercised
//! against in-memory transports in tests. Each session owns its state
//! exclusively; nothing is shared between connections.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::{ident, payload};

/// Window granted to every individual read or write.
const IO_WINDOW: Duration = Duration::from_secs(1);

/// Size of the drain phase's scratch buffer.
const DRAIN_BUF_SIZE: usize = 128;

/// How the drain phase ended. Hard I/O errors are reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainOutcome {
    /// No data arrived within the window; the peer is waiting on us.
    Quiet,
    /// The peer closed its write side.
    Eof,
    /// A single read filled the whole scratch buffer.
    Filled,
}

/// State for one trapped connection.
pub struct Session {
    id: String,
    peer: SocketAddr,
    started_at: Instant,
    bytes_written: u64,
}

impl Session {
    /// Create session state for a connection accepted from `peer`.
    pub fn new(peer: SocketAddr) -> Self {
        Session {
            id: ident::conn_id(peer, Utc::now().timestamp()),
            peer,
            started_at: Instant::now(),
            bytes_written: 0,
        }
    }

    /// Drive the connection until the peer disconnects or an I/O failure
    /// ends it. The stream is consumed and dropped on return, which closes
    /// the socket on every exit path.
    pub async fn run<S>(&mut self, mut stream: S, config: &Config)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        info!(conn = %self.id, peer = %self.peer, "Peer connected");

        match self.drain(&mut stream).await {
            Ok(outcome) => {
                debug!(conn = %self.id, peer = %self.peer, ?outcome, "Drain finished");
            }
            Err(e) => {
                debug!(conn = %self.id, peer = %self.peer, error = %e, "Read failed during drain, closing");
                return;
            }
        }

        self.stall(&mut stream, config).await;

        info!(
            conn = %self.id,
            peer = %self.peer,
            bytes = self.bytes_written,
            elapsed = ?self.started_at.elapsed(),
            "Connection closed"
        );
    }

    /// Phase 1: read and discard anything the peer has to say before it
    /// settles down to wait for a banner. Content is never inspected.
    async fn drain<S>(&self, stream: &mut S) -> std::io::Result<DrainOutcome>
    where
        S: AsyncRead + Unpin,
    {
        let mut scratch = [0u8; DRAIN_BUF_SIZE];
        loop {
            match tokio::time::timeout(IO_WINDOW, stream.read(&mut scratch)).await {
                Err(_) => return Ok(DrainOutcome::Quiet),
                Ok(Ok(0)) => return Ok(DrainOutcome::Eof),
                Ok(Ok(n)) if n == scratch.len() => return Ok(DrainOutcome::Filled),
                Ok(Ok(_)) => continue,
                Ok(Err(e)) => return Err(e),
            }
        }
    }

    /// Phase 2: trickle noise until a write fails or overruns its window.
    /// Line length and pause are re-drawn every iteration so the stream
    /// carries no periodic signature.
    async fn stall<S>(&mut self, stream: &mut S, config: &Config)
    where
        S: AsyncWrite + Unpin,
    {
        loop {
            let line = {
                let mut rng = rand::rng();
                let len = next_line_len(&mut rng, config.max_line_length);
                payload::line(len, &mut rng)
            };

            match tokio::time::timeout(IO_WINDOW, stream.write_all(&line)).await {
                Ok(Ok(())) => self.bytes_written += line.len() as u64,
                Ok(Err(e)) => {
                    debug!(conn = %self.id, peer = %self.peer, error = %e, "Write failed during stall, closing");
                    return;
                }
                Err(_) => {
                    debug!(conn = %self.id, peer = %self.peer, "Write window elapsed during stall, closing");
                    return;
                }
            }

            let pause = next_delay(&mut rand::rng(), config.max_delay);
            trace!(conn = %self.id, wrote = line.len(), delay = ?pause, "Sent noise line");
            tokio::time::sleep(pause).await;
        }
    }
}

/// Draw the next line length, uniform over `[0, max)`. A zero maximum
/// collapses every line to the generator's four-byte minimum.
fn next_line_len(rng: &mut impl Rng, max: usize) -> usize {
    rng.random_range(0..max.max(1))
}

/// Draw the next inter-write pause, uniform over `[0, max)`.
fn next_delay(rng: &mut impl Rng, max: Duration) -> Duration {
    Duration::from_nanos((max.as_nanos() as f64 * rng.random::<f64>()) as u64)
}
