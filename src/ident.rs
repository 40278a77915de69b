//! Connection identifiers for log correlation.

use std::net::SocketAddr;

/// Derive the short hex identifier that ties one connection's log lines
/// together.
///
/// The id is a CRC-32 over the formatted peer address followed by the
/// decimal Unix timestamp, rendered as lowercase hex. Collisions only ever
/// cost log readability, never correctness, so a fast non-cryptographic
/// checksum is all this needs.
pub fn conn_id(peer: SocketAddr, unix_secs: i64) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(peer.to_string().as_bytes());
    hasher.update(unix_secs.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
