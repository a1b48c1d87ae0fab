use solana_pubkey::Pubkey;

use crate::{check_seeds, DeriveAddress, DeriveError};

/// Derives with the runtime's own algorithm: sha256 over the seeds, bump,
/// program id and the PDA marker, searching bumps from 255 down for an
/// off-curve result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SolanaPda;

impl DeriveAddress for SolanaPda {
    #[inline]
    fn derive(&self, namespace: &[u8; 32], seeds: &[&[u8]]) -> Result<[u8; 32], DeriveError> {
        check_seeds(seeds)?;
        Pubkey::try_find_program_address(seeds, &Pubkey::new_from_array(*namespace))
            .map(|(pda, _bump)| pda.to_bytes())
            .ok_or(DeriveError::NoViableBump)
    }
}
