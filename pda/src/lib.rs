//! Program-derived address derivation behind a pluggable [`DeriveAddress`].

#![cfg_attr(not(test), no_std)]

mod config_address;

#[cfg(feature = "solana")]
mod solana;

use thiserror::Error;

pub use config_address::*;

#[cfg(feature = "solana")]
pub use solana::*;

/// Maximum length of a derived address seed
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, **INCLUDING** the bump seed,
/// so max (MAX_SEEDS - 1) non-bump seeds.
pub const MAX_SEEDS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DeriveError {
    #[error("{count} seeds exceed the {} allowed before the bump seed", MAX_SEEDS - 1)]
    TooManySeeds { count: usize },

    #[error("seed {index} is {len} bytes, longer than {MAX_SEED_LEN}")]
    SeedTooLong { index: usize, len: usize },

    #[error("no bump seed yields an address off the curve")]
    NoViableBump,
}

/// Finds the canonical program-derived address of `seeds` under `namespace`.
///
/// Implementations must be deterministic: the same seeds and namespace
/// always derive the same address.
pub trait DeriveAddress {
    fn derive(&self, namespace: &[u8; 32], seeds: &[&[u8]]) -> Result<[u8; 32], DeriveError>;
}

impl<F: Fn(&[u8; 32], &[&[u8]]) -> Result<[u8; 32], DeriveError>> DeriveAddress for F {
    #[inline]
    fn derive(&self, namespace: &[u8; 32], seeds: &[&[u8]]) -> Result<[u8; 32], DeriveError> {
        self(namespace, seeds)
    }
}

/// Checks seed count and lengths, leaving room for the bump seed
#[inline]
pub fn check_seeds(seeds: &[&[u8]]) -> Result<(), DeriveError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(DeriveError::TooManySeeds { count: seeds.len() });
    }
    match seeds.iter().position(|s| s.len() > MAX_SEED_LEN) {
        Some(index) => Err(DeriveError::SeedTooLong {
            index,
            len: seeds[index].len(),
        }),
        None => Ok(()),
    }
}
