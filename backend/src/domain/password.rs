//! Password hashing for stored account credentials.
//!
//! Hashes use Argon2i with a per-account random salt. Both the digest and
//! the salt are stored hex encoded.

use rand::RngCore;
use zeroize::Zeroizing;

const SALT_BYTES: usize = 16;

/// Argon2i digest plus the salt it was derived with.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    hash: String,
    salt: String,
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHash").finish_non_exhaustive()
    }
}

fn digest(password: &str, salt: &str) -> Zeroizing<[u8; 32]> {
    Zeroizing::new(argon2rs::argon2i_simple(password, salt))
}

impl PasswordHash {
    /// Hash `password` with a freshly generated salt.
    #[must_use]
    pub fn derive(password: &str) -> Self {
        let mut salt_bytes = [0_u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);
        let hash = hex::encode(*digest(password, &salt));
        Self { hash, salt }
    }

    /// Rebuild a stored hash from its persisted parts.
    #[must_use]
    pub fn from_parts(hash: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            salt: salt.into(),
        }
    }

    /// Hex-encoded digest.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Hex-encoded salt.
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Check `password` against the stored digest in constant time.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let Ok(expected) = hex::decode(&self.hash) else {
            return false;
        };
        let candidate = digest(password, &self.salt);
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate.iter())
            .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_hash_verifies_original_password() {
        let hash = PasswordHash::derive("correct horse");
        assert!(hash.verify("correct horse"));
        assert!(!hash.verify("correct horsf"));
    }

    #[test]
    fn salts_differ_between_derivations() {
        let first = PasswordHash::derive("same password");
        let second = PasswordHash::derive("same password");
        assert_ne!(first.salt(), second.salt());
        assert_ne!(first.hash(), second.hash());
    }

    #[test]
    fn from_parts_round_trips_stored_values() {
        let original = PasswordHash::derive("stored secret");
        let restored = PasswordHash::from_parts(original.hash(), original.salt());
        assert!(restored.verify("stored secret"));
    }

    #[test]
    fn corrupt_digest_never_verifies() {
        let hash = PasswordHash::from_parts("zz-not-hex", "0011223344556677");
        assert!(!hash.verify("anything"));
    }

    #[test]
    fn debug_output_hides_material() {
        let hash = PasswordHash::derive("hidden");
        assert!(!format!("{hash:?}").contains(hash.hash()));
    }
}
