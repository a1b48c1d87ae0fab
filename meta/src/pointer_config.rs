use crate::{PointerConfigError, ADDRESS_CONFIG_LEN};

pub const POINTER_INSTRUCTION_DATA_TAG: u8 = 1;
pub const POINTER_ACCOUNT_DATA_TAG: u8 = 2;

/// Where a pointer record reads its 32-byte address from:
///
/// ```md
/// 1, offset         : instruction_data[offset..offset + 32]
/// 2, index, offset  : data of resolved account `index`, [offset..offset + 32]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerConfig {
    InstructionData { offset: u8 },
    AccountData { account_index: u8, offset: u8 },
}

impl PointerConfig {
    #[inline]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::InstructionData { .. } => POINTER_INSTRUCTION_DATA_TAG,
            Self::AccountData { .. } => POINTER_ACCOUNT_DATA_TAG,
        }
    }

    /// Trailing bytes after the operands are ignored
    #[inline]
    pub fn unpack(config: &[u8]) -> Result<Self, PointerConfigError> {
        let (&tag, rest) = config.split_first().ok_or(PointerConfigError::Empty)?;
        let truncated = PointerConfigError::Truncated(tag);
        match tag {
            POINTER_INSTRUCTION_DATA_TAG => {
                let [offset] = *rest.first_chunk::<1>().ok_or(truncated)?;
                Ok(Self::InstructionData { offset })
            }
            POINTER_ACCOUNT_DATA_TAG => {
                let [account_index, offset] = *rest.first_chunk::<2>().ok_or(truncated)?;
                Ok(Self::AccountData {
                    account_index,
                    offset,
                })
            }
            tag => Err(PointerConfigError::UnknownTag(tag)),
        }
    }

    #[inline]
    pub const fn pack(&self) -> [u8; ADDRESS_CONFIG_LEN] {
        let mut res = [0u8; ADDRESS_CONFIG_LEN];
        res[0] = self.tag();
        match *self {
            Self::InstructionData { offset } => {
                res[1] = offset;
            }
            Self::AccountData {
                account_index,
                offset,
            } => {
                res[1] = account_index;
                res[2] = offset;
            }
        }
        res
    }
}
