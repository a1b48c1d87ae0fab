//! Wire format of extra-account-meta lists.
//!
//! A configuration account published by a gating program holds an 8-byte tag,
//! a u32 LE length, a u32 LE record count, and then `count` fixed 35-byte
//! records. Each record says how to find one additional account that an
//! instruction needs: a literal address, a program-derived address built from
//! seed configs, or a pointer into instruction or account data.
//!
//! Everything here is pure and synchronous; resolving records against live
//! account data lives in `exmeta-resolver`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod error;
mod list;
mod pointer_config;
mod record;
mod role;
mod seed_config;

pub use error::*;
pub use list::*;
pub use pointer_config::*;
pub use record::*;
pub use role::*;
pub use seed_config::*;

pub const ADDRESS_LEN: usize = 32;

/// Renders a 32-byte address in base58 for logs and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressDisplay<'a>(pub &'a [u8; ADDRESS_LEN]);

impl core::fmt::Display for AddressDisplay<'_> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}
