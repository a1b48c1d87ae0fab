use crate::{DeriveAddress, DeriveError};

/// Seed prefix of the configuration account a gating program reads on thaw
pub const THAW_EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"thaw_extra_account_metas";

/// Seed prefix of the configuration account a gating program reads on freeze
pub const FREEZE_EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"freeze_extra_account_metas";

/// Address of the thaw configuration account for `mint` under `gating_program_id`
#[inline]
pub fn find_thaw_extra_metas_address<D: DeriveAddress + ?Sized>(
    deriver: &D,
    mint: &[u8; 32],
    gating_program_id: &[u8; 32],
) -> Result<[u8; 32], DeriveError> {
    deriver.derive(gating_program_id, &[THAW_EXTRA_ACCOUNT_METAS_SEED, mint.as_slice()])
}

/// Address of the freeze configuration account for `mint` under `gating_program_id`
#[inline]
pub fn find_freeze_extra_metas_address<D: DeriveAddress + ?Sized>(
    deriver: &D,
    mint: &[u8; 32],
    gating_program_id: &[u8; 32],
) -> Result<[u8; 32], DeriveError> {
    deriver.derive(gating_program_id, &[FREEZE_EXTRA_ACCOUNT_METAS_SEED, mint.as_slice()])
}
