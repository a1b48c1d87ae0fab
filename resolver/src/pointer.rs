use exmeta_fetch::AccountFetch;
use exmeta_meta::{PointerConfig, ResolvedAccountMeta, ADDRESS_LEN};

use crate::ResolveError;

/// Reads the 32-byte address a pointer spec points at, either in
/// `instruction_data` or in the fetched data of a resolved account.
pub async fn resolve_pointer<F: AccountFetch + ?Sized>(
    spec: &[u8],
    resolved: &[ResolvedAccountMeta],
    instruction_data: &[u8],
    fetch: &F,
) -> Result<[u8; ADDRESS_LEN], ResolveError> {
    match PointerConfig::unpack(spec)? {
        PointerConfig::InstructionData { offset } => read_address(instruction_data, offset.into()),
        PointerConfig::AccountData {
            account_index,
            offset,
        } => {
            let index = usize::from(account_index);
            let address = resolved
                .get(index)
                .ok_or(ResolveError::AccountIndexOutOfRange {
                    index,
                    len: resolved.len(),
                })?
                .address;
            let account = fetch
                .fetch(address)
                .await
                .ok_or(ResolveError::AccountNotFound { address })?;
            read_address(&account.data, offset.into())
        }
    }
}

#[inline]
fn read_address(data: &[u8], offset: usize) -> Result<[u8; ADDRESS_LEN], ResolveError> {
    data.get(offset..)
        .and_then(<[u8]>::first_chunk::<ADDRESS_LEN>)
        .copied()
        .ok_or(ResolveError::PointerDataTooSmall {
            offset,
            available: data.len(),
        })
}

#[cfg(test)]
mod tests {
    use exmeta_fetch::{FetchedAccount, MemFetch};
    use exmeta_meta::PointerConfigError;
    use futures::executor::block_on;
    use proptest::{collection::vec, prelude::*};

    use super::*;

    fn resolve(
        spec: &[u8],
        resolved: &[ResolvedAccountMeta],
        ix_data: &[u8],
        fetch: &MemFetch,
    ) -> Result<[u8; 32], ResolveError> {
        block_on(resolve_pointer(spec, resolved, ix_data, fetch))
    }

    #[test]
    fn from_instruction_data() {
        let ix_data: Vec<u8> = (0..40).collect();
        let expected: [u8; 32] = core::array::from_fn(|i| i as u8 + 8);
        assert_eq!(resolve(&[1, 8], &[], &ix_data, &MemFetch::new()), Ok(expected));
        assert_eq!(
            resolve(&[1, 9], &[], &ix_data, &MemFetch::new()),
            Err(ResolveError::PointerDataTooSmall {
                offset: 9,
                available: 40
            })
        );
    }

    #[test]
    fn from_account_data() {
        let holder = [5u8; 32];
        let mut data = vec![0u8; 3];
        data.extend_from_slice(&[7u8; 32]);
        let fetch = MemFetch::new().with_account(holder, FetchedAccount::new(data, [0; 32]));
        let resolved = [
            ResolvedAccountMeta::readonly([1; 32]),
            ResolvedAccountMeta::readonly(holder),
        ];
        assert_eq!(resolve(&[2, 1, 3], &resolved, &[], &fetch), Ok([7; 32]));
        assert_eq!(
            resolve(&[2, 1, 4], &resolved, &[], &fetch),
            Err(ResolveError::PointerDataTooSmall {
                offset: 4,
                available: 35
            })
        );
        assert_eq!(
            resolve(&[2, 2, 0], &resolved, &[], &fetch),
            Err(ResolveError::AccountIndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            resolve(&[2, 0, 0], &resolved, &[], &fetch),
            Err(ResolveError::AccountNotFound { address: [1; 32] })
        );
    }

    #[test]
    fn bad_specs() {
        let fetch = MemFetch::new();
        assert_eq!(
            resolve(&[0; 32], &[], &[0; 64], &fetch),
            Err(ResolveError::InvalidPointerSpec(
                PointerConfigError::UnknownTag(0)
            ))
        );
        assert_eq!(
            resolve(&[2, 0], &[], &[], &fetch),
            Err(ResolveError::InvalidPointerSpec(
                PointerConfigError::Truncated(2)
            ))
        );
    }

    proptest! {
        #[test]
        fn never_reads_past_instruction_data(
            ix_data in vec(any::<u8>(), 0..=300),
            offset: u8,
        ) {
            let res = resolve(&[1, offset], &[], &ix_data, &MemFetch::new());
            let o = usize::from(offset);
            if ix_data.len() < o + 32 {
                prop_assert_eq!(
                    res,
                    Err(ResolveError::PointerDataTooSmall { offset: o, available: ix_data.len() })
                );
            } else {
                let address = res.unwrap();
                prop_assert_eq!(&address[..], &ix_data[o..o + 32]);
            }
        }
    }
}
