use std::collections::HashMap;

use exmeta_fetch::{AccountFetch, FetchedAccount};
use exmeta_meta::{AddressDisplay, ResolvedAccountMeta, SeedConfig, SeedConfigIter, ADDRESS_LEN};
use futures::future::join_all;

use crate::{InvalidSeedReason, ResolveError};

/// Unpacks the seeds of a seed spec, in order.
///
/// Account-data seeds referencing distinct accounts are fetched concurrently.
/// The outcome, including which error is returned first, is the same as
/// evaluating every seed one after the other.
#[inline]
pub async fn resolve_seeds<F: AccountFetch + ?Sized>(
    spec: &[u8],
    resolved: &[ResolvedAccountMeta],
    instruction_data: &[u8],
    fetch: &F,
) -> Result<Vec<Vec<u8>>, ResolveError> {
    unpack_seeds(spec, resolved, instruction_data, fetch, true).await
}

pub(crate) async fn unpack_seeds<F: AccountFetch + ?Sized>(
    spec: &[u8],
    resolved: &[ResolvedAccountMeta],
    instruction_data: &[u8],
    fetch: &F,
    concurrent_prefetch: bool,
) -> Result<Vec<Vec<u8>>, ResolveError> {
    // up to and including the first malformed config
    let configs: Vec<_> = SeedConfigIter::new(spec).collect();

    let prefetched = if concurrent_prefetch {
        prefetch_account_data(&configs, resolved, fetch).await
    } else {
        HashMap::new()
    };

    let mut seeds = Vec::with_capacity(configs.len());
    for item in configs {
        let (cursor, config) = item?;
        let invalid = |reason: InvalidSeedReason| ResolveError::InvalidSeed { cursor, reason };
        let seed = match config {
            SeedConfig::Literal(literal) => literal.to_vec(),
            SeedConfig::InstructionArg { offset, len } => slice(instruction_data, offset, len)
                .map_err(|(offset, end)| {
                    invalid(InvalidSeedReason::InstructionDataTooSmall {
                        offset,
                        end,
                        available: instruction_data.len(),
                    })
                })?
                .to_vec(),
            SeedConfig::AccountKey { index } => {
                resolved_address(resolved, index).map_err(invalid)?.to_vec()
            }
            SeedConfig::AccountData {
                account_index,
                offset,
                len,
            } => {
                let address = resolved_address(resolved, account_index).map_err(invalid)?;
                let fetched: Option<FetchedAccount>;
                let account = match prefetched.get(&address) {
                    Some(acc) => acc.as_ref(),
                    None => {
                        fetched = fetch.fetch(address).await;
                        fetched.as_ref()
                    }
                };
                let data = &account
                    .ok_or(ResolveError::AccountDataNotFound { address })?
                    .data;
                slice(data, offset, len)
                    .map_err(|(offset, end)| {
                        invalid(InvalidSeedReason::AccountDataTooSmall {
                            offset,
                            end,
                            available: data.len(),
                        })
                    })?
                    .to_vec()
            }
        };
        seeds.push(seed);
    }
    Ok(seeds)
}

/// Fetches every distinct in-range account referenced by an account-data
/// seed, concurrently. Returns nothing unless there are at least two such
/// accounts, leaving the sequential pass to fetch on demand.
async fn prefetch_account_data<F: AccountFetch + ?Sized>(
    configs: &[Result<(usize, SeedConfig<'_>), exmeta_meta::SeedConfigError>],
    resolved: &[ResolvedAccountMeta],
    fetch: &F,
) -> HashMap<[u8; ADDRESS_LEN], Option<FetchedAccount>> {
    let mut addresses: Vec<[u8; ADDRESS_LEN]> = Vec::new();
    for config in configs {
        let Ok((_, SeedConfig::AccountData { account_index, .. })) = config else {
            continue;
        };
        if let Ok(address) = resolved_address(resolved, *account_index) {
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }
    }
    if addresses.len() < 2 {
        return HashMap::new();
    }
    log::trace!(
        "prefetching {} seed accounts: {}",
        addresses.len(),
        addresses
            .iter()
            .map(|a| AddressDisplay(a).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let accounts = join_all(addresses.iter().map(|a| fetch.fetch(*a))).await;
    addresses.into_iter().zip(accounts).collect()
}

#[inline]
fn resolved_address(
    resolved: &[ResolvedAccountMeta],
    index: u8,
) -> Result<[u8; ADDRESS_LEN], InvalidSeedReason> {
    let index = usize::from(index);
    resolved
        .get(index)
        .map(|m| m.address)
        .ok_or(InvalidSeedReason::AccountIndexOutOfRange {
            index,
            resolved: resolved.len(),
        })
}

/// Err((offset, end)) if out of bounds
#[inline]
fn slice(data: &[u8], offset: u8, len: u8) -> Result<&[u8], (usize, usize)> {
    let offset = usize::from(offset);
    let end = offset + usize::from(len);
    data.get(offset..end).ok_or((offset, end))
}
