//! The account-fetch capability consumed by resolution.
//!
//! Fetching is the only suspension point of a resolution. A fetch either
//! finds the account or reports it absent; timeouts and transport failures
//! are the implementor's concern and should surface as absence.

use core::future::Future;

use exmeta_meta::ADDRESS_LEN;

mod cache;
mod mem;
mod overlay;

pub use cache::*;
pub use mem::*;
pub use overlay::*;

/// An existing account's raw contents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FetchedAccount {
    pub data: Vec<u8>,
    pub owner: [u8; ADDRESS_LEN],
}

impl FetchedAccount {
    #[inline]
    pub const fn new(data: Vec<u8>, owner: [u8; ADDRESS_LEN]) -> Self {
        Self { data, owner }
    }
}

/// Retrieves accounts by address.
///
/// Must be safe to call repeatedly and concurrently for different addresses.
/// Closures `Fn([u8; 32]) -> impl Future<Output = Option<FetchedAccount>>`
/// implement this directly, e.g. wrapping an RPC client.
pub trait AccountFetch {
    /// `None` if the account does not exist
    fn fetch(&self, address: [u8; ADDRESS_LEN]) -> impl Future<Output = Option<FetchedAccount>>;
}

impl<F, Fut> AccountFetch for F
where
    F: Fn([u8; ADDRESS_LEN]) -> Fut,
    Fut: Future<Output = Option<FetchedAccount>>,
{
    #[inline]
    fn fetch(&self, address: [u8; ADDRESS_LEN]) -> impl Future<Output = Option<FetchedAccount>> {
        self(address)
    }
}
