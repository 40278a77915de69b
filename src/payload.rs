//! Noise payload generation.
//!
//! Every line the tarpit sends is a run of random base64-alphabet bytes
//! with a fixed `==\n` tail, so the stream reads like the middle of an
//! encoded banner that never ends. Nothing here is valid in any real
//! protocol, and that is the point.

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;

/// The 64-symbol alphabet lines are drawn from: alphanumerics plus the two
/// extra base64 symbols.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+/";

/// Fixed tail of every line: base64-style padding and the terminator.
const SUFFIX: &[u8] = b"==\n";

/// Build one noise line of `n` bytes.
///
/// Requests shorter than four bytes are clamped up so there is always room
/// for at least one random byte ahead of the fixed suffix; everything else
/// comes back at exactly the requested length.
pub fn line(n: usize, rng: &mut impl Rng) -> Bytes {
    let len = n.max(SUFFIX.len() + 1);
    let mut buf = BytesMut::with_capacity(len);
    for _ in 0..len - SUFFIX.len() {
        buf.put_u8(ALPHABET[rng.random_range(0..ALPHABET.len())]);
    }
    buf.extend_from_slice(SUFFIX);
    buf.freeze()
}
