use dashmap::DashMap;
use exmeta_meta::{AddressDisplay, ADDRESS_LEN};

use crate::{AccountFetch, FetchedAccount};

/// Memoizes an inner fetch for the span of one resolution.
///
/// Absence is memoized too. Concurrent fetches of the same uncached address
/// both reach the inner fetch; the later result wins.
///
/// No shard guard is held across an await so the returned futures are
/// `Send` whenever the inner fetch's are.
#[derive(Debug)]
pub struct FetchCache<'a, F: ?Sized> {
    inner: &'a F,
    enabled: bool,
    memo: DashMap<[u8; ADDRESS_LEN], Option<FetchedAccount>>,
}

impl<'a, F: ?Sized> FetchCache<'a, F> {
    #[inline]
    pub fn new(inner: &'a F) -> Self {
        Self::with_enabled(inner, true)
    }

    /// A disabled cache forwards every call to `inner`
    #[inline]
    pub fn with_enabled(inner: &'a F, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            memo: DashMap::new(),
        }
    }

    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of distinct addresses memoized so far
    #[inline]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

impl<F: AccountFetch + ?Sized> AccountFetch for FetchCache<'_, F> {
    async fn fetch(&self, address: [u8; ADDRESS_LEN]) -> Option<FetchedAccount> {
        if !self.enabled {
            return self.inner.fetch(address).await;
        }
        // clone out so the shard guard drops before any await
        let hit = self.memo.get(&address).map(|entry| entry.value().clone());
        if let Some(hit) = hit {
            log::trace!("memo hit {}", AddressDisplay(&address));
            return hit;
        }
        let res = self.inner.fetch(address).await;
        self.memo.insert(address, res.clone());
        res
    }
}
