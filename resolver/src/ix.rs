use exmeta_fetch::AccountFetch;
use exmeta_meta::{AccountRole, ResolvedAccountMeta, ADDRESS_LEN};
use exmeta_pda::DeriveAddress;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{ResolveError, Resolver};

#[inline]
pub fn to_account_meta(meta: &ResolvedAccountMeta) -> AccountMeta {
    AccountMeta {
        pubkey: Pubkey::new_from_array(meta.address),
        is_signer: meta.role.is_signer(),
        is_writable: meta.role.is_writable(),
    }
}

#[inline]
pub fn from_account_meta(meta: &AccountMeta) -> ResolvedAccountMeta {
    ResolvedAccountMeta::new(
        meta.pubkey.to_bytes(),
        AccountRole::from_flags(meta.is_signer, meta.is_writable),
    )
}

/// Instruction augmentation
impl<D: DeriveAddress> Resolver<D> {
    /// Resolves against `base_metas` and `ix.data`, then appends the extra
    /// accounts to `ix.accounts` in record order.
    ///
    /// `ix` is left untouched on error.
    pub async fn add_extra_account_metas<F: AccountFetch + ?Sized>(
        &self,
        ix: &mut Instruction,
        config_address: &[u8; ADDRESS_LEN],
        base_metas: &[ResolvedAccountMeta],
        gating_program_id: &[u8; ADDRESS_LEN],
        fetch: &F,
    ) -> Result<(), ResolveError> {
        let resolved = self
            .resolve(config_address, base_metas, &ix.data, gating_program_id, fetch)
            .await?;
        ix.accounts
            .extend(resolved.extra().iter().map(to_account_meta));
        Ok(())
    }

    /// [`Self::add_extra_account_metas`] with `ix`'s own accounts as the
    /// base accounts
    pub async fn augment_instruction<F: AccountFetch + ?Sized>(
        &self,
        ix: &mut Instruction,
        config_address: &[u8; ADDRESS_LEN],
        gating_program_id: &[u8; ADDRESS_LEN],
        fetch: &F,
    ) -> Result<(), ResolveError> {
        let base_metas: Vec<_> = ix.accounts.iter().map(from_account_meta).collect();
        self.add_extra_account_metas(ix, config_address, &base_metas, gating_program_id, fetch)
            .await
    }
}
