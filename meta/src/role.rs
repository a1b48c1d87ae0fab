use crate::{AddressDisplay, ADDRESS_LEN};

/// Signer/writable permissions of an account in an instruction.
///
/// Bit 0 is writable, bit 1 is signer, so merging two roles is a bitwise or
/// and can only ever add permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum AccountRole {
    #[default]
    Readonly = 0b00,
    Writable = 0b01,
    ReadonlySigner = 0b10,
    WritableSigner = 0b11,
}

impl AccountRole {
    const WRITABLE_BIT: u8 = 0b01;
    const SIGNER_BIT: u8 = 0b10;

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & (Self::WRITABLE_BIT | Self::SIGNER_BIT) {
            0b00 => Self::Readonly,
            0b01 => Self::Writable,
            0b10 => Self::ReadonlySigner,
            _ => Self::WritableSigner,
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Merges the signer axis and the writable axis independently
    #[inline]
    pub const fn from_flags(is_signer: bool, is_writable: bool) -> Self {
        let signer = if is_signer {
            Self::ReadonlySigner
        } else {
            Self::Readonly
        };
        let writable = if is_writable {
            Self::Writable
        } else {
            Self::Readonly
        };
        signer.merge(writable)
    }

    /// Union of both roles' permissions
    #[inline]
    pub const fn merge(self, other: Self) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    #[inline]
    pub const fn is_signer(self) -> bool {
        self.bits() & Self::SIGNER_BIT != 0
    }

    #[inline]
    pub const fn is_writable(self) -> bool {
        self.bits() & Self::WRITABLE_BIT != 0
    }
}

/// An address together with the role it plays in the instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedAccountMeta {
    pub address: [u8; ADDRESS_LEN],
    pub role: AccountRole,
}

/// Constructors
impl ResolvedAccountMeta {
    #[inline]
    pub const fn new(address: [u8; ADDRESS_LEN], role: AccountRole) -> Self {
        Self { address, role }
    }

    #[inline]
    pub const fn readonly(address: [u8; ADDRESS_LEN]) -> Self {
        Self::new(address, AccountRole::Readonly)
    }

    #[inline]
    pub const fn writable(address: [u8; ADDRESS_LEN]) -> Self {
        Self::new(address, AccountRole::Writable)
    }

    #[inline]
    pub const fn readonly_signer(address: [u8; ADDRESS_LEN]) -> Self {
        Self::new(address, AccountRole::ReadonlySigner)
    }

    #[inline]
    pub const fn writable_signer(address: [u8; ADDRESS_LEN]) -> Self {
        Self::new(address, AccountRole::WritableSigner)
    }
}

impl core::fmt::Display for ResolvedAccountMeta {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({:?})", AddressDisplay(&self.address), self.role)
    }
}
