use thiserror::Error;

/// Failure to decode a configuration account's data into an
/// [`crate::ExtraAccountMetaList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DecodeError {
    #[error("configuration data is {len} bytes, too short to hold the list header")]
    TooShort { len: usize },

    #[error("declared length {declared} does not match {expected} expected for the record count")]
    LengthMismatch { declared: u32, expected: u64 },

    #[error("{count} records declared but only {available} bytes follow the header")]
    TruncatedRecords { count: u32, available: usize },
}

/// Discriminator in `3..=127`, which selects no resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("invalid record discriminator {0}")]
pub struct InvalidDiscriminator(pub u8);

/// A malformed seed config within a record's address config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SeedConfigError {
    #[error("unknown seed tag {tag} at cursor {cursor}")]
    UnknownTag { cursor: usize, tag: u8 },

    #[error("seed tag {tag} at cursor {cursor} runs past the end of the address config")]
    Truncated { cursor: usize, tag: u8 },
}

impl SeedConfigError {
    #[inline]
    pub const fn cursor(&self) -> usize {
        match self {
            Self::UnknownTag { cursor, .. } | Self::Truncated { cursor, .. } => *cursor,
        }
    }

    #[inline]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::UnknownTag { tag, .. } | Self::Truncated { tag, .. } => *tag,
        }
    }
}

/// A malformed pointer config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PointerConfigError {
    #[error("pointer config is empty")]
    Empty,

    #[error("unknown pointer tag {0}")]
    UnknownTag(u8),

    #[error("pointer tag {0} is missing its operand bytes")]
    Truncated(u8),
}

/// Failure to pack configs into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PackError {
    #[error("packed seed configs take {len} bytes, more than the 32-byte address config")]
    AddressConfigOverflow { len: usize },

    #[error("literal seed of {len} bytes does not fit its u8 length prefix")]
    LiteralTooLong { len: usize },

    #[error("namespace account index {0} does not fit below the namespace flag")]
    NamespaceIndexOutOfRange(u8),
}
