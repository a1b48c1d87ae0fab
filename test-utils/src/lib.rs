use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use exmeta_fetch::{AccountFetch, FetchedAccount};
use exmeta_meta::{ExtraAccountMetaList, ExtraAccountMetaRecord, RECORD_LEN};
use proptest::{collection::vec, prelude::*};

/// Owner recorded on configuration accounts built by [`config_account`]
pub const CONFIG_OWNER: [u8; 32] = [0xC0; 32];

/// Idempotent, safe to call at the start of every test.
/// Honours `RUST_LOG` when set.
pub fn init_test_logger() {
    solana_logger::setup_with_default("exmeta_resolver=debug,exmeta_fetch=info");
}

pub fn any_address() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

pub fn two_different_addresses() -> impl Strategy<Value = [[u8; 32]; 2]> {
    (any_address(), any_address())
        .prop_filter("addresses must differ", |(a, b)| a != b)
        .prop_map(|(a, b)| [a, b])
}

/// Any record, including invalid discriminators and non-0/1 flag bytes
pub fn any_record() -> impl Strategy<Value = ExtraAccountMetaRecord> {
    any::<[u8; RECORD_LEN]>().prop_map(|b| ExtraAccountMetaRecord::from_bytes(&b))
}

pub fn any_literal_record() -> impl Strategy<Value = ExtraAccountMetaRecord> {
    (any_address(), any::<bool>(), any::<bool>()).prop_map(|(addr, is_signer, is_writable)| {
        ExtraAccountMetaRecord::literal(addr, is_signer, is_writable)
    })
}

pub fn any_list(max_records: usize) -> impl Strategy<Value = ExtraAccountMetaList> {
    (any::<[u8; 8]>(), vec(any_record(), 0..=max_records))
        .prop_map(|(tag, records)| ExtraAccountMetaList::new(tag, records))
}

/// The configuration account holding `list`
pub fn config_account(list: &ExtraAccountMetaList) -> FetchedAccount {
    FetchedAccount::new(list.encode(), CONFIG_OWNER)
}

/// Counts calls through to an inner fetch, and which addresses were asked for
#[derive(Debug, Default)]
pub struct CountingFetch<F> {
    inner: F,
    calls: AtomicUsize,
    requested: Mutex<Vec<[u8; 32]>>,
}

impl<F> CountingFetch<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Addresses in the order they were requested
    pub fn requested(&self) -> Vec<[u8; 32]> {
        self.requested.lock().unwrap().clone()
    }
}

impl<F: AccountFetch> AccountFetch for CountingFetch<F> {
    fn fetch(&self, address: [u8; 32]) -> impl Future<Output = Option<FetchedAccount>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(address);
        self.inner.fetch(address)
    }
}
