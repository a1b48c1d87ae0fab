use exmeta_meta::{AddressDisplay, ADDRESS_LEN};

use crate::{AccountFetch, FetchedAccount, MemFetch};

/// Serves mocked accounts in front of an inner fetch.
///
/// Used when a resolution depends on accounts that only come into existence
/// earlier in the same transaction, so the network does not have them yet.
#[derive(Debug, Clone, Default)]
pub struct OverlayFetch<F> {
    overlay: MemFetch,
    inner: F,
}

impl<F> OverlayFetch<F> {
    #[inline]
    pub fn new(inner: F) -> Self {
        Self {
            overlay: MemFetch::new(),
            inner,
        }
    }

    #[inline]
    pub fn insert(
        &mut self,
        address: [u8; ADDRESS_LEN],
        account: FetchedAccount,
    ) -> Option<FetchedAccount> {
        self.overlay.insert(address, account)
    }

    #[inline]
    pub fn with_account(mut self, address: [u8; ADDRESS_LEN], account: FetchedAccount) -> Self {
        self.insert(address, account);
        self
    }

    #[inline]
    pub const fn inner(&self) -> &F {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: AccountFetch> AccountFetch for OverlayFetch<F> {
    async fn fetch(&self, address: [u8; ADDRESS_LEN]) -> Option<FetchedAccount> {
        match self.overlay.get(&address) {
            Some(acc) => {
                log::trace!("overlay serving {}", AddressDisplay(&address));
                Some(acc.clone())
            }
            None => self.inner.fetch(address).await,
        }
    }
}
