//! Small xxHash Accumulator
//!
//! A 32-bit mixing accumulator derived from xxHash32, reduced to the
//! single-lane case: one seed, any number of 32-bit words, one avalanche
//! step on read.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  seed(s)   acc = s + PRIME_E                              │
//! │  eat(d)    acc = rotl(acc + d * PRIME_C, 17) * PRIME_D    │
//! │  as_u32()  acc ^= acc >> 15;  acc *= PRIME_B              │
//! │            acc ^= acc >> 13;  acc *= PRIME_C              │
//! │            acc ^= acc >> 16                               │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic wraps modulo 2^32. The accumulator is a plain value:
//! every `eat` returns a new one, so a seeded hash can be copied into any
//! number of worker threads without coordination.

use std::fmt;

/// Avalanche multiplier (first finalize round).
pub const PRIME_B: u32 = 0x85EB_CA77;

/// Input multiplier, also used by the second finalize round.
pub const PRIME_C: u32 = 0xC2B2_AE3D;

/// Post-rotation multiplier.
pub const PRIME_D: u32 = 0x27D4_EB2F;

/// Seed offset.
pub const PRIME_E: u32 = 0x1656_67B1;

/// Bit rotation applied on every `eat`.
const EAT_ROTATION: u32 = 17;

/// Single-lane xxHash-style accumulator.
///
/// # Example
///
/// ```
/// use spatial_hash::core::hash::SmallXxHash;
///
/// let hash = SmallXxHash::seed(0).eat(-2).eat(-2);
/// assert_eq!(hash.as_u32(), 0x35DA_4B94);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SmallXxHash {
    accumulator: u32,
}

impl SmallXxHash {
    /// Start a new accumulator from a signed seed.
    #[inline]
    pub const fn seed(seed: i32) -> Self {
        Self {
            accumulator: (seed as u32).wrapping_add(PRIME_E),
        }
    }

    /// Fold one signed word into the accumulator.
    ///
    /// Order matters: `eat(a).eat(b)` and `eat(b).eat(a)` generally differ.
    #[inline]
    #[must_use]
    pub const fn eat(self, data: i32) -> Self {
        self.eat_u32(data as u32)
    }

    /// Fold one unsigned word into the accumulator.
    #[inline]
    #[must_use]
    pub const fn eat_u32(self, data: u32) -> Self {
        let mixed = self.accumulator.wrapping_add(data.wrapping_mul(PRIME_C));
        Self {
            accumulator: mixed.rotate_left(EAT_ROTATION).wrapping_mul(PRIME_D),
        }
    }

    /// Finalize into a well-distributed 32-bit value.
    ///
    /// The accumulator itself is left untouched; finalizing is only
    /// applied on read.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        let mut avalanche = self.accumulator;
        avalanche ^= avalanche >> 15;
        avalanche = avalanche.wrapping_mul(PRIME_B);
        avalanche ^= avalanche >> 13;
        avalanche = avalanche.wrapping_mul(PRIME_C);
        avalanche ^= avalanche >> 16;
        avalanche
    }

    /// Raw, unfinalized accumulator state.
    #[inline]
    pub const fn accumulator(self) -> u32 {
        self.accumulator
    }
}

impl From<u32> for SmallXxHash {
    /// Wrap an existing accumulator without reseeding.
    #[inline]
    fn from(accumulator: u32) -> Self {
        Self { accumulator }
    }
}

impl From<SmallXxHash> for u32 {
    #[inline]
    fn from(hash: SmallXxHash) -> Self {
        hash.as_u32()
    }
}

impl fmt::Debug for SmallXxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SmallXxHash({:#010x})", self.accumulator)
    }
}

// =============================================================================
// BYTE VIEWS
// =============================================================================
//
// Consumers slice a finalized hash into four independent bytes, e.g. three
// color channels plus a height offset per instance.

/// Bits 0..8 of a finalized hash.
#[inline]
pub const fn byte_a(hash: u32) -> u8 {
    hash as u8
}

/// Bits 8..16 of a finalized hash.
#[inline]
pub const fn byte_b(hash: u32) -> u8 {
    (hash >> 8) as u8
}

/// Bits 16..24 of a finalized hash.
#[inline]
pub const fn byte_c(hash: u32) -> u8 {
    (hash >> 16) as u8
}

/// Bits 24..32 of a finalized hash.
#[inline]
pub const fn byte_d(hash: u32) -> u8 {
    (hash >> 24) as u8
}

/// Map a byte to `[0, 1]`.
#[inline]
pub fn byte_as_unit(byte: u8) -> f32 {
    (1.0 / 255.0) * byte as f32
}

// =============================================================================
// TESTS
// =============================================================================
