use core::future::{ready, Future};
use std::collections::HashMap;

use exmeta_meta::ADDRESS_LEN;

use crate::{AccountFetch, FetchedAccount};

/// Accounts held in memory, e.g. a snapshot taken ahead of resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemFetch {
    accounts: HashMap<[u8; ADDRESS_LEN], FetchedAccount>,
}

impl MemFetch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the account previously at `address`, if any
    #[inline]
    pub fn insert(
        &mut self,
        address: [u8; ADDRESS_LEN],
        account: FetchedAccount,
    ) -> Option<FetchedAccount> {
        self.accounts.insert(address, account)
    }

    #[inline]
    pub fn with_account(mut self, address: [u8; ADDRESS_LEN], account: FetchedAccount) -> Self {
        self.insert(address, account);
        self
    }

    #[inline]
    pub fn remove(&mut self, address: &[u8; ADDRESS_LEN]) -> Option<FetchedAccount> {
        self.accounts.remove(address)
    }

    #[inline]
    pub fn get(&self, address: &[u8; ADDRESS_LEN]) -> Option<&FetchedAccount> {
        self.accounts.get(address)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FromIterator<([u8; ADDRESS_LEN], FetchedAccount)> for MemFetch {
    #[inline]
    fn from_iter<T: IntoIterator<Item = ([u8; ADDRESS_LEN], FetchedAccount)>>(iter: T) -> Self {
        Self {
            accounts: iter.into_iter().collect(),
        }
    }
}

impl AccountFetch for MemFetch {
    #[inline]
    fn fetch(&self, address: [u8; ADDRESS_LEN]) -> impl Future<Output = Option<FetchedAccount>> {
        ready(self.get(&address).cloned())
    }
}
