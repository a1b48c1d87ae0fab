use exmeta_fetch::{AccountFetch, FetchCache};
use exmeta_meta::{
    AddressConfig, AddressDisplay, ExtraAccountMetaList, ExtraAccountMetaRecord,
    InvalidDiscriminator, ResolvedAccountMeta, ADDRESS_LEN,
};
use exmeta_pda::DeriveAddress;

use crate::{resolve_pointer, seeds::unpack_seeds, ResolveError};

#[cfg(feature = "solana")]
use exmeta_pda::SolanaPda;

/// Resolves the extra accounts a configuration account asks for.
///
/// Holds no per-call state; one `Resolver` may serve any number of
/// concurrent resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolver<D> {
    deriver: D,
    concurrent_prefetch: bool,
    memo: bool,
}

#[cfg(feature = "solana")]
impl Resolver<SolanaPda> {
    #[inline]
    pub const fn new() -> Self {
        Self::with_deriver_only(SolanaPda)
    }
}

#[cfg(feature = "solana")]
impl Default for Resolver<SolanaPda> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Builder
impl<D> Resolver<D> {
    #[inline]
    pub const fn with_deriver_only(deriver: D) -> Self {
        Self {
            deriver,
            concurrent_prefetch: true,
            memo: true,
        }
    }

    #[inline]
    pub fn with_deriver<E>(self, deriver: E) -> Resolver<E> {
        let Self {
            concurrent_prefetch,
            memo,
            ..
        } = self;
        Resolver {
            deriver,
            concurrent_prefetch,
            memo,
        }
    }

    /// Fetch account-data seeds of one seed spec concurrently. On by default.
    #[inline]
    pub const fn with_concurrent_prefetch(mut self, concurrent_prefetch: bool) -> Self {
        self.concurrent_prefetch = concurrent_prefetch;
        self
    }

    /// Fetch each address at most once per resolution. On by default.
    #[inline]
    pub const fn with_memo(mut self, memo: bool) -> Self {
        self.memo = memo;
        self
    }

    #[inline]
    pub const fn deriver(&self) -> &D {
        &self.deriver
    }
}

/// Output of a resolution: the base accounts followed by the extra accounts,
/// one per configuration record, in record order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedMetas {
    metas: Vec<ResolvedAccountMeta>,
    base_len: usize,
}

impl ResolvedMetas {
    /// Base accounts then extra accounts
    #[inline]
    pub fn all(&self) -> &[ResolvedAccountMeta] {
        &self.metas
    }

    /// Only the accounts resolved from records
    #[inline]
    pub fn extra(&self) -> &[ResolvedAccountMeta] {
        &self.metas[self.base_len..]
    }

    #[inline]
    pub const fn base_len(&self) -> usize {
        self.base_len
    }

    #[inline]
    pub fn into_all(self) -> Vec<ResolvedAccountMeta> {
        self.metas
    }

    #[inline]
    pub fn into_extra(mut self) -> Vec<ResolvedAccountMeta> {
        self.metas.drain(..self.base_len);
        self.metas
    }
}

/// Working state of one resolution call
struct ResolutionContext<'a> {
    resolved: Vec<ResolvedAccountMeta>,
    base_len: usize,
    instruction_data: &'a [u8],
    gating_program_id: &'a [u8; ADDRESS_LEN],
}

impl<'a> ResolutionContext<'a> {
    fn new(
        base_metas: &[ResolvedAccountMeta],
        extra_count: usize,
        instruction_data: &'a [u8],
        gating_program_id: &'a [u8; ADDRESS_LEN],
    ) -> Self {
        let mut resolved = Vec::with_capacity(base_metas.len() + extra_count);
        resolved.extend_from_slice(base_metas);
        Self {
            resolved,
            base_len: base_metas.len(),
            instruction_data,
            gating_program_id,
        }
    }

    fn finish(self) -> ResolvedMetas {
        ResolvedMetas {
            metas: self.resolved,
            base_len: self.base_len,
        }
    }
}

impl<D: DeriveAddress> Resolver<D> {
    /// Fetches and decodes the configuration account at `config_address`,
    /// then resolves its records in order against `base_metas`.
    ///
    /// Record `i` may reference any of `base_metas` and the accounts resolved
    /// from records `0..i` by index. The first error aborts the resolution.
    pub async fn resolve<F: AccountFetch + ?Sized>(
        &self,
        config_address: &[u8; ADDRESS_LEN],
        base_metas: &[ResolvedAccountMeta],
        instruction_data: &[u8],
        gating_program_id: &[u8; ADDRESS_LEN],
        fetch: &F,
    ) -> Result<ResolvedMetas, ResolveError> {
        let fetch = FetchCache::with_enabled(fetch, self.memo);

        log::debug!(
            "fetching configuration account {}",
            AddressDisplay(config_address)
        );
        let config = fetch.fetch(*config_address).await.ok_or(
            ResolveError::ConfigurationAccountNotFound {
                address: *config_address,
            },
        )?;
        let list = ExtraAccountMetaList::decode(&config.data)
            .inspect_err(|e| log::debug!("configuration decode failed: {e}"))?;
        log::debug!("{} extra account metas to resolve", list.len());

        let mut ctx =
            ResolutionContext::new(base_metas, list.len(), instruction_data, gating_program_id);
        for (i, record) in list.iter().enumerate() {
            let meta = self
                .resolve_record(&ctx, i, record, &fetch)
                .await
                .inspect_err(|e| log::debug!("record {i} failed: {e}"))?;
            // later records may reference this one by index
            ctx.resolved.push(meta);
        }
        Ok(ctx.finish())
    }

    async fn resolve_record<F: AccountFetch + ?Sized>(
        &self,
        ctx: &ResolutionContext<'_>,
        record_index: usize,
        record: &ExtraAccountMetaRecord,
        fetch: &F,
    ) -> Result<ResolvedAccountMeta, ResolveError> {
        let kind = record
            .kind()
            .map_err(
                |InvalidDiscriminator(discriminator)| ResolveError::InvalidRecordDiscriminator {
                    record: record_index,
                    discriminator,
                },
            )?;
        let strategy = kind.strategy();
        let address = match kind {
            AddressConfig::Literal(address) => *address,
            AddressConfig::SelfSeeds(seeds) => {
                self.derive(ctx, seeds, ctx.gating_program_id, fetch)
                    .await?
            }
            AddressConfig::ExternalPointer(pointer) => {
                resolve_pointer(pointer, &ctx.resolved, ctx.instruction_data, fetch).await?
            }
            AddressConfig::NamespacedSeeds {
                namespace_index,
                seeds,
            } => {
                let index = usize::from(namespace_index);
                let namespace = ctx
                    .resolved
                    .get(index)
                    .ok_or(ResolveError::AccountIndexOutOfRange {
                        index,
                        len: ctx.resolved.len(),
                    })?
                    .address;
                self.derive(ctx, seeds, &namespace, fetch).await?
            }
        };
        let meta = ResolvedAccountMeta::new(address, record.role());
        log::trace!("record {record_index} ({strategy}) resolved to {meta}");
        Ok(meta)
    }

    async fn derive<F: AccountFetch + ?Sized>(
        &self,
        ctx: &ResolutionContext<'_>,
        seed_spec: &[u8],
        namespace: &[u8; ADDRESS_LEN],
        fetch: &F,
    ) -> Result<[u8; ADDRESS_LEN], ResolveError> {
        let seeds = unpack_seeds(
            seed_spec,
            &ctx.resolved,
            ctx.instruction_data,
            fetch,
            self.concurrent_prefetch,
        )
        .await?;
        let seeds: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
        self.deriver
            .derive(namespace, &seeds)
            .map_err(|source| ResolveError::DerivationFailed {
                namespace: *namespace,
                source,
            })
    }
}

/// [`Resolver::resolve`] with the default [`Resolver`]
#[cfg(feature = "solana")]
#[inline]
pub async fn resolve<F: AccountFetch + ?Sized>(
    config_address: &[u8; ADDRESS_LEN],
    base_metas: &[ResolvedAccountMeta],
    instruction_data: &[u8],
    gating_program_id: &[u8; ADDRESS_LEN],
    fetch: &F,
) -> Result<ResolvedMetas, ResolveError> {
    Resolver::new()
        .resolve(
            config_address,
            base_metas,
            instruction_data,
            gating_program_id,
            fetch,
        )
        .await
}

#[cfg(test)]
mod tests {
    use exmeta_fetch::MemFetch;
    use exmeta_meta::{DecodeError, SeedConfig};
    use exmeta_pda::DeriveError;
    use exmeta_test_utils::{config_account, init_test_logger, CountingFetch};
    use futures::executor::block_on;

    use super::*;

    const CONFIG: [u8; 32] = [0xCC; 32];
    const GATING: [u8; 32] = [0x6A; 32];

    /// Namespace with the seed lengths xor-ed into its first byte
    fn toy_deriver(ns: &[u8; 32], seeds: &[&[u8]]) -> Result<[u8; 32], DeriveError> {
        exmeta_pda::check_seeds(seeds)?;
        let mut res = *ns;
        for s in seeds {
            res[0] ^= s.len() as u8;
            res[1] = res[1].wrapping_add(s.iter().fold(0u8, |a, b| a.wrapping_add(*b)));
        }
        Ok(res)
    }

    fn fetch_with(records: impl IntoIterator<Item = ExtraAccountMetaRecord>) -> MemFetch {
        let list: ExtraAccountMetaList = records.into_iter().collect();
        MemFetch::new().with_account(CONFIG, config_account(&list))
    }

    #[test]
    fn resolved_metas_views() {
        let metas = ResolvedMetas {
            metas: vec![
                ResolvedAccountMeta::readonly([1; 32]),
                ResolvedAccountMeta::writable([2; 32]),
            ],
            base_len: 1,
        };
        assert_eq!(metas.all().len(), 2);
        assert_eq!(metas.extra(), &[ResolvedAccountMeta::writable([2; 32])]);
        assert_eq!(metas.clone().into_extra(), metas.extra());
        assert_eq!(metas.into_all().len(), 2);
    }

    #[test]
    fn builder_keeps_flags_across_deriver_swap() {
        let r = Resolver::with_deriver_only(())
            .with_memo(false)
            .with_concurrent_prefetch(false)
            .with_deriver(7u8);
        assert!(!r.memo);
        assert!(!r.concurrent_prefetch);
        assert_eq!(*r.deriver(), 7);
        assert_eq!(
            r.with_deriver("swapped"),
            Resolver::with_deriver_only("swapped")
                .with_memo(false)
                .with_concurrent_prefetch(false)
        );
    }

    #[test]
    fn error_stops_at_first_bad_record() {
        init_test_logger();
        let fetch = CountingFetch::new(fetch_with([
            ExtraAccountMetaRecord::literal([1; 32], false, false),
            ExtraAccountMetaRecord::new(3, [0; 32], false, false),
            ExtraAccountMetaRecord::with_pointer(
                exmeta_meta::PointerConfig::AccountData {
                    account_index: 0,
                    offset: 0,
                },
                false,
                false,
            ),
        ]));
        let res = block_on(Resolver::with_deriver_only(toy_deriver).resolve(
            &CONFIG,
            &[],
            &[],
            &GATING,
            &fetch,
        ));
        assert_eq!(
            res,
            Err(ResolveError::InvalidRecordDiscriminator {
                record: 1,
                discriminator: 3
            })
        );
        assert_eq!(fetch.calls(), 1);
    }

    #[test]
    fn missing_config_account() {
        let res = block_on(Resolver::with_deriver_only(toy_deriver).resolve(
            &CONFIG,
            &[],
            &[],
            &GATING,
            &MemFetch::new(),
        ));
        assert_eq!(
            res,
            Err(ResolveError::ConfigurationAccountNotFound { address: CONFIG })
        );
    }

    #[test]
    fn decode_error_passes_through() {
        let fetch = MemFetch::new().with_account(
            CONFIG,
            exmeta_fetch::FetchedAccount::new(vec![0; 10], [0; 32]),
        );
        let res = block_on(Resolver::with_deriver_only(toy_deriver).resolve(
            &CONFIG,
            &[],
            &[],
            &GATING,
            &fetch,
        ));
        assert_eq!(res, Err(ResolveError::Decode(DecodeError::TooShort { len: 10 })));
    }

    #[test]
    fn namespace_index_out_of_range() {
        let fetch = fetch_with([ExtraAccountMetaRecord::external_pda_with_seeds(
            2,
            &[SeedConfig::Literal(b"x")],
            false,
            false,
        )
        .unwrap()]);
        let res = block_on(Resolver::with_deriver_only(toy_deriver).resolve(
            &CONFIG,
            &[ResolvedAccountMeta::readonly([1; 32]); 2],
            &[],
            &GATING,
            &fetch,
        ));
        assert_eq!(
            res,
            Err(ResolveError::AccountIndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn derivation_failure_carries_namespace() {
        // 16 empty literals: one too many once the bump seed is counted
        let seeds = [SeedConfig::Literal(&[]); 16];
        let fetch = fetch_with([ExtraAccountMetaRecord::with_seeds(&seeds, false, false).unwrap()]);
        let res = block_on(Resolver::with_deriver_only(toy_deriver).resolve(
            &CONFIG,
            &[],
            &[],
            &GATING,
            &fetch,
        ));
        assert_eq!(
            res,
            Err(ResolveError::DerivationFailed {
                namespace: GATING,
                source: DeriveError::TooManySeeds { count: 16 }
            })
        );
    }
}
