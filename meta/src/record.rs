use crate::{
    AccountRole, InvalidDiscriminator, PackError, PointerConfig, SeedConfig, ADDRESS_LEN,
};

pub const ADDRESS_CONFIG_LEN: usize = 32;

pub const RECORD_LEN: usize = 35;

/// Discriminator of a record whose address config is the address itself
pub const LITERAL_DISCRIMINATOR: u8 = 0;

/// Discriminator of a record derived from seeds under the gating program
pub const SEEDS_DISCRIMINATOR: u8 = 1;

/// Discriminator of a record that points into instruction or account data
pub const POINTER_DISCRIMINATOR: u8 = 2;

/// Discriminators with this bit set are derived from seeds under the address of
/// an already-resolved account, whose index is the remaining 7 bits
pub const NAMESPACED_SEEDS_FLAG: u8 = 0b1000_0000;

/// One entry of an extra-account-meta list, in its wire layout:
///
/// ```md
/// byte 0      : discriminator
/// bytes 1..33 : address config
/// byte 33     : is_signer
/// byte 34     : is_writable
/// ```
///
/// The flag bytes are kept as-is so that re-encoding reproduces the input.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtraAccountMetaRecord {
    discriminator: u8,
    address_config: [u8; ADDRESS_CONFIG_LEN],
    is_signer: u8,
    is_writable: u8,
}

const _ASSERT_RECORD_LEN: () =
    assert!(core::mem::size_of::<ExtraAccountMetaRecord>() == RECORD_LEN);
const _ASSERT_RECORD_ALIGN: () = assert!(core::mem::align_of::<ExtraAccountMetaRecord>() == 1);

/// How a record's address is found, decoded once from its discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressConfig<'a> {
    /// The address config is the address
    Literal(&'a [u8; ADDRESS_LEN]),

    /// Seed configs, derived under the gating program
    SelfSeeds(&'a [u8; ADDRESS_CONFIG_LEN]),

    /// A pointer config into instruction data or a resolved account's data
    ExternalPointer(&'a [u8; ADDRESS_CONFIG_LEN]),

    /// Seed configs, derived under the address of the resolved account
    /// at `namespace_index`
    NamespacedSeeds {
        namespace_index: u8,
        seeds: &'a [u8; ADDRESS_CONFIG_LEN],
    },
}

impl AddressConfig<'_> {
    /// Short name of the resolution strategy, for diagnostics
    #[inline]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::SelfSeeds(_) => "seeds",
            Self::ExternalPointer(_) => "pointer",
            Self::NamespacedSeeds { .. } => "namespaced seeds",
        }
    }
}

/// Constructors
impl ExtraAccountMetaRecord {
    #[inline]
    pub const fn new(
        discriminator: u8,
        address_config: [u8; ADDRESS_CONFIG_LEN],
        is_signer: bool,
        is_writable: bool,
    ) -> Self {
        Self {
            discriminator,
            address_config,
            is_signer: is_signer as u8,
            is_writable: is_writable as u8,
        }
    }

    #[inline]
    pub const fn from_bytes(bytes: &[u8; RECORD_LEN]) -> Self {
        let mut address_config = [0u8; ADDRESS_CONFIG_LEN];
        let mut i = 0;
        while i < ADDRESS_CONFIG_LEN {
            address_config[i] = bytes[1 + i];
            i += 1;
        }
        Self {
            discriminator: bytes[0],
            address_config,
            is_signer: bytes[33],
            is_writable: bytes[34],
        }
    }

    #[inline]
    pub const fn literal(address: [u8; ADDRESS_LEN], is_signer: bool, is_writable: bool) -> Self {
        Self::new(LITERAL_DISCRIMINATOR, address, is_signer, is_writable)
    }

    #[inline]
    pub fn with_seeds(
        seeds: &[SeedConfig],
        is_signer: bool,
        is_writable: bool,
    ) -> Result<Self, PackError> {
        Ok(Self::new(
            SEEDS_DISCRIMINATOR,
            SeedConfig::pack_into_address_config(seeds)?,
            is_signer,
            is_writable,
        ))
    }

    #[inline]
    pub const fn with_pointer(pointer: PointerConfig, is_signer: bool, is_writable: bool) -> Self {
        Self::new(POINTER_DISCRIMINATOR, pointer.pack(), is_signer, is_writable)
    }

    /// Derived under the address of the resolved account at `namespace_index`,
    /// which must be < 128
    #[inline]
    pub fn external_pda_with_seeds(
        namespace_index: u8,
        seeds: &[SeedConfig],
        is_signer: bool,
        is_writable: bool,
    ) -> Result<Self, PackError> {
        if namespace_index & NAMESPACED_SEEDS_FLAG != 0 {
            return Err(PackError::NamespaceIndexOutOfRange(namespace_index));
        }
        Ok(Self::new(
            NAMESPACED_SEEDS_FLAG | namespace_index,
            SeedConfig::pack_into_address_config(seeds)?,
            is_signer,
            is_writable,
        ))
    }
}

/// Accessors
impl ExtraAccountMetaRecord {
    #[inline]
    pub const fn discriminator(&self) -> u8 {
        self.discriminator
    }

    #[inline]
    pub const fn address_config(&self) -> &[u8; ADDRESS_CONFIG_LEN] {
        &self.address_config
    }

    #[inline]
    pub const fn is_signer(&self) -> bool {
        self.is_signer == 1
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.is_writable == 1
    }

    #[inline]
    pub const fn role(&self) -> AccountRole {
        AccountRole::from_flags(self.is_signer(), self.is_writable())
    }

    #[inline]
    pub const fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut res = [0u8; RECORD_LEN];
        res[0] = self.discriminator;
        let mut i = 0;
        while i < ADDRESS_CONFIG_LEN {
            res[1 + i] = self.address_config[i];
            i += 1;
        }
        res[33] = self.is_signer;
        res[34] = self.is_writable;
        res
    }

    #[inline]
    pub const fn kind(&self) -> Result<AddressConfig<'_>, InvalidDiscriminator> {
        let config = &self.address_config;
        match self.discriminator {
            LITERAL_DISCRIMINATOR => Ok(AddressConfig::Literal(config)),
            SEEDS_DISCRIMINATOR => Ok(AddressConfig::SelfSeeds(config)),
            POINTER_DISCRIMINATOR => Ok(AddressConfig::ExternalPointer(config)),
            d if d & NAMESPACED_SEEDS_FLAG != 0 => Ok(AddressConfig::NamespacedSeeds {
                namespace_index: d & !NAMESPACED_SEEDS_FLAG,
                seeds: config,
            }),
            d => Err(InvalidDiscriminator(d)),
        }
    }
}
