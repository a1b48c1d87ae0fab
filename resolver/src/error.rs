use exmeta_meta::{AddressDisplay, DecodeError, PointerConfigError, SeedConfigError};
use exmeta_pda::DeriveError;
use thiserror::Error;

/// Failure of a resolution. Every failure is fatal to the whole call:
/// no partial list is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ResolveError {
    #[error("configuration account {} not found", AddressDisplay(.address))]
    ConfigurationAccountNotFound { address: [u8; 32] },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("record {record} has invalid discriminator {discriminator}")]
    InvalidRecordDiscriminator { record: usize, discriminator: u8 },

    #[error("invalid pointer spec: {0}")]
    InvalidPointerSpec(#[from] PointerConfigError),

    #[error("pointer reads 32 bytes at offset {offset} but only {available} bytes are available")]
    PointerDataTooSmall { offset: usize, available: usize },

    #[error("invalid seed at cursor {cursor}: {reason}")]
    InvalidSeed {
        cursor: usize,
        reason: InvalidSeedReason,
    },

    #[error("account index {index} out of range of {len} resolved accounts")]
    AccountIndexOutOfRange { index: usize, len: usize },

    #[error("account {} not found", AddressDisplay(.address))]
    AccountNotFound { address: [u8; 32] },

    #[error("account {} holding seed data not found", AddressDisplay(.address))]
    AccountDataNotFound { address: [u8; 32] },

    #[error("derivation under {} failed", AddressDisplay(.namespace))]
    DerivationFailed {
        namespace: [u8; 32],
        #[source]
        source: DeriveError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidSeedReason {
    #[error("unknown seed tag {0}")]
    UnknownTag(u8),

    #[error("seed tag {0} runs past the end of the seed spec")]
    Truncated(u8),

    #[error("instruction data slice {offset}..{end} out of bounds of {available} bytes")]
    InstructionDataTooSmall {
        offset: usize,
        end: usize,
        available: usize,
    },

    #[error("account index {index} out of range of {resolved} resolved accounts")]
    AccountIndexOutOfRange { index: usize, resolved: usize },

    #[error("account data slice {offset}..{end} out of bounds of {available} bytes")]
    AccountDataTooSmall {
        offset: usize,
        end: usize,
        available: usize,
    },
}

impl From<SeedConfigError> for ResolveError {
    #[inline]
    fn from(e: SeedConfigError) -> Self {
        let reason = match e {
            SeedConfigError::UnknownTag { tag, .. } => InvalidSeedReason::UnknownTag(tag),
            SeedConfigError::Truncated { tag, .. } => InvalidSeedReason::Truncated(tag),
        };
        Self::InvalidSeed {
            cursor: e.cursor(),
            reason,
        }
    }
}

/// Broad category of a [`ResolveError`], for deciding whether to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Bad on-chain configuration or protocol mismatch. Retrying cannot help.
    MalformedConfiguration,

    /// An account was absent. May succeed once the account is created.
    AccountMissing,

    /// Seeds were rejected by the derivation capability
    DerivationFailure,
}

impl ResolveError {
    #[inline]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::ConfigurationAccountNotFound { .. }
            | Self::AccountNotFound { .. }
            | Self::AccountDataNotFound { .. } => ErrorClass::AccountMissing,
            Self::DerivationFailed { .. } => ErrorClass::DerivationFailure,
            Self::Decode(_)
            | Self::InvalidRecordDiscriminator { .. }
            | Self::InvalidPointerSpec(_)
            | Self::PointerDataTooSmall { .. }
            | Self::InvalidSeed { .. }
            | Self::AccountIndexOutOfRange { .. } => ErrorClass::MalformedConfiguration,
        }
    }

    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::AccountMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert!(ResolveError::AccountDataNotFound { address: [0; 32] }.is_retryable());
        assert!(!ResolveError::Decode(DecodeError::TooShort { len: 10 }).is_retryable());
        assert_eq!(
            ResolveError::DerivationFailed {
                namespace: [0; 32],
                source: DeriveError::NoViableBump
            }
            .class(),
            ErrorClass::DerivationFailure
        );
    }

    #[test]
    fn seed_config_errors_keep_cursor() {
        assert_eq!(
            ResolveError::from(SeedConfigError::Truncated { cursor: 30, tag: 4 }),
            ResolveError::InvalidSeed {
                cursor: 30,
                reason: InvalidSeedReason::Truncated(4)
            }
        );
    }

    #[test]
    fn display_renders_base58() {
        let e = ResolveError::AccountNotFound { address: [0; 32] };
        assert_eq!(e.to_string(), "account 11111111111111111111111111111111 not found");
    }
}
