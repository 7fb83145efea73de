//! Short, loggable identifier for the loaded session key.
//!
//! Replicas sharing a key log the same fingerprint, so a mismatched deploy
//! shows up in the startup logs without exposing key material.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Digest bytes kept before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Lowercase hex of the first eight SHA-256 bytes of the signing key.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use muncho_crm::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    digest
        .iter()
        .take(FINGERPRINT_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
