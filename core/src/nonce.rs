//! Nonce generation for replay-distinguishing tokens.

use rand::Rng;

/// Field carrying the nonce on the wire.
pub const NONCE_FIELD: &str = "nonce_str";

/// Default nonce length accepted by providers.
pub const NONCE_LENGTH: usize = 32;

const NONCE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Return `current` if it's a non-empty nonce, otherwise generate a new one.
///
/// The nonce is not a secret, it only lets the provider tell duplicate
/// submissions apart. Callers still pass a CSPRNG such as
/// `rand::thread_rng()` in production.
pub fn ensure_nonce<R: Rng>(current: Option<&str>, length: usize, rng: &mut R) -> String {
    match current {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => (0..length)
            .map(|_| NONCE_CHARSET[rng.gen_range(0..NONCE_CHARSET.len())] as char)
            .collect(),
    }
}
