//! Session and CSRF token utilities.
//!
//! Raw session tokens are handed to the browser once and never stored; the
//! database keeps only their HMAC-SHA256 digest keyed by the server secret.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

/// Random bytes in a raw session token (hex-encoded to twice the length).
pub const SESSION_TOKEN_BYTES: usize = 48;

/// Random bytes in a CSRF token.
pub const CSRF_TOKEN_BYTES: usize = 24;

type HmacSha256 = Hmac<Sha256>;

/// Generate `bytes` random bytes from the thread RNG, hex-encoded.
pub fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Compute the hex HMAC-SHA256 digest of a raw token under `secret`.
///
/// This is the value persisted as a session's `token_hash`.
pub fn sign_token(secret: &str, raw_token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(raw_token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compare two tokens without short-circuiting on the first differing byte.
pub fn tokens_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}
