use core::iter::FusedIterator;

use crate::{PackError, SeedConfigError, ADDRESS_CONFIG_LEN};

pub const SEED_TERMINATOR_TAG: u8 = 0;
pub const SEED_LITERAL_TAG: u8 = 1;
pub const SEED_INSTRUCTION_ARG_TAG: u8 = 2;
pub const SEED_ACCOUNT_KEY_TAG: u8 = 3;
pub const SEED_ACCOUNT_DATA_TAG: u8 = 4;

/// One seed of a derived address, as packed into a record's 32-byte
/// address config. Each is a tag byte followed by its operands:
///
/// ```md
/// 0                          : end of seeds
/// 1, len, bytes[len]         : literal bytes
/// 2, offset, len             : instruction_data[offset..offset + len]
/// 3, index                   : address of resolved account `index`
/// 4, index, offset, len      : data of resolved account `index`, [offset..offset + len]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedConfig<'a> {
    Literal(&'a [u8]),
    InstructionArg { offset: u8, len: u8 },
    AccountKey { index: u8 },
    AccountData { account_index: u8, offset: u8, len: u8 },
}

impl SeedConfig<'_> {
    #[inline]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Literal(_) => SEED_LITERAL_TAG,
            Self::InstructionArg { .. } => SEED_INSTRUCTION_ARG_TAG,
            Self::AccountKey { .. } => SEED_ACCOUNT_KEY_TAG,
            Self::AccountData { .. } => SEED_ACCOUNT_DATA_TAG,
        }
    }

    /// Bytes taken in the address config, tag included
    #[inline]
    pub const fn packed_len(&self) -> usize {
        match self {
            Self::Literal(l) => 2 + l.len(),
            Self::InstructionArg { .. } => 3,
            Self::AccountKey { .. } => 2,
            Self::AccountData { .. } => 4,
        }
    }

    /// Packs `seeds` back to back. Unused trailing bytes are zero,
    /// which reads back as the terminator.
    pub fn pack_into_address_config(
        seeds: &[SeedConfig],
    ) -> Result<[u8; ADDRESS_CONFIG_LEN], PackError> {
        let len: usize = seeds.iter().map(SeedConfig::packed_len).sum();
        if len > ADDRESS_CONFIG_LEN {
            return Err(PackError::AddressConfigOverflow { len });
        }
        let mut res = [0u8; ADDRESS_CONFIG_LEN];
        let mut cursor = 0;
        for seed in seeds {
            res[cursor] = seed.tag();
            let operands = &mut res[cursor + 1..cursor + seed.packed_len()];
            match *seed {
                SeedConfig::Literal(l) => {
                    // fits since packed len checked above
                    operands[0] = l.len() as u8;
                    operands[1..].copy_from_slice(l);
                }
                SeedConfig::InstructionArg { offset, len } => {
                    operands.copy_from_slice(&[offset, len]);
                }
                SeedConfig::AccountKey { index } => {
                    operands[0] = index;
                }
                SeedConfig::AccountData {
                    account_index,
                    offset,
                    len,
                } => {
                    operands.copy_from_slice(&[account_index, offset, len]);
                }
            }
            cursor += seed.packed_len();
        }
        Ok(res)
    }
}

/// Iterates the seed configs packed in an address config.
///
/// Yields each config with the cursor it starts at. Ends at the terminator
/// tag, at the end of `config`, or once the cursor reaches 32, and after the
/// first error. Bytes past the first 32 are never read.
#[derive(Debug, Clone)]
pub struct SeedConfigIter<'a> {
    config: &'a [u8],
    cursor: usize,
    done: bool,
}

impl<'a> SeedConfigIter<'a> {
    #[inline]
    pub fn new(config: &'a [u8]) -> Self {
        Self {
            config: config.get(..ADDRESS_CONFIG_LEN).unwrap_or(config),
            cursor: 0,
            done: false,
        }
    }

    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    fn next_config(&mut self) -> Result<Option<SeedConfig<'a>>, SeedConfigError> {
        let cursor = self.cursor;
        let config: &'a [u8] = self.config;
        let Some((&tag, rest)) = config.get(cursor..).and_then(<[u8]>::split_first) else {
            return Ok(None);
        };
        let truncated = SeedConfigError::Truncated { cursor, tag };
        let (config, packed_len) = match tag {
            SEED_TERMINATOR_TAG => return Ok(None),
            SEED_LITERAL_TAG => {
                let (&len, rest) = rest.split_first().ok_or(truncated)?;
                let literal = rest.get(..len as usize).ok_or(truncated)?;
                (SeedConfig::Literal(literal), 2 + len as usize)
            }
            SEED_INSTRUCTION_ARG_TAG => {
                let [offset, len] = *rest.first_chunk::<2>().ok_or(truncated)?;
                (SeedConfig::InstructionArg { offset, len }, 3)
            }
            SEED_ACCOUNT_KEY_TAG => {
                let [index] = *rest.first_chunk::<1>().ok_or(truncated)?;
                (SeedConfig::AccountKey { index }, 2)
            }
            SEED_ACCOUNT_DATA_TAG => {
                let [account_index, offset, len] = *rest.first_chunk::<3>().ok_or(truncated)?;
                (
                    SeedConfig::AccountData {
                        account_index,
                        offset,
                        len,
                    },
                    4,
                )
            }
            tag => return Err(SeedConfigError::UnknownTag { cursor, tag }),
        };
        self.cursor += packed_len;
        Ok(Some(config))
    }
}

impl<'a> Iterator for SeedConfigIter<'a> {
    type Item = Result<(usize, SeedConfig<'a>), SeedConfigError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let cursor = self.cursor;
        let res = self.next_config().transpose();
        if !matches!(res, Some(Ok(_))) {
            self.done = true;
        }
        res.map(|r| r.map(|c| (cursor, c)))
    }
}

impl FusedIterator for SeedConfigIter<'_> {}
