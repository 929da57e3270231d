//! Result Fingerprints
//!
//! A SHA-256 digest over a computed hash array and the parameters that
//! produced it. Two runs with identical configuration must produce the same
//! fingerprint on every platform, which makes it a cheap way to compare
//! whole fields in logs and tests.

use sha2::{Digest, Sha256};

/// Fingerprint output type (256 bits / 32 bytes)
pub type Fingerprint = [u8; 32];

/// Domain separator for hash fields.
const FIELD_DOMAIN: &[u8] = b"SPATIAL_HASH_FIELD_V1";

/// Incremental fingerprint builder.
///
/// Wraps SHA-256 with little-endian helpers. Order of updates matters.
pub struct FieldHasher {
    hasher: Sha256,
}

impl FieldHasher {
    /// Create a new hasher with a domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create a hasher for hash fields.
    pub fn for_field() -> Self {
        Self::new(FIELD_DOMAIN)
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a slice of u32 values, each little-endian.
    pub fn update_u32_slice(&mut self, values: &[u32]) {
        for value in values {
            self.update_u32(*value);
        }
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> Fingerprint {
        self.hasher.finalize().into()
    }
}

/// Fingerprint a hash array together with its seed and resolution.
pub fn fingerprint_field(seed: i32, resolution: u32, hashes: &[u32]) -> Fingerprint {
    let mut hasher = FieldHasher::for_field();
    hasher.update_i32(seed);
    hasher.update_u32(resolution);
    hasher.update_u32_slice(hashes);
    hasher.finalize()
}
