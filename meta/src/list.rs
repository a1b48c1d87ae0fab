use alloc::vec::Vec;

use crate::{DecodeError, ExtraAccountMetaRecord, RECORD_LEN};

pub const TAG_LEN: usize = 8;

pub const LENGTH_OFFSET: usize = 8;

pub const COUNT_OFFSET: usize = 12;

pub const RECORDS_OFFSET: usize = 16;

/// The declared length counts the u32 record count plus the records
const COUNT_FIELD_LEN: u64 = 4;

/// A decoded configuration account: the opaque 8-byte tag followed by
/// the ordered records.
///
/// ```md
/// bytes 0..8   : tag, not checked on decode
/// bytes 8..12  : u32 LE declared length == count * 35 + 4
/// bytes 12..16 : u32 LE record count
/// bytes 16..   : count records of 35 bytes each
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ExtraAccountMetaList {
    tag: [u8; TAG_LEN],
    records: Vec<ExtraAccountMetaRecord>,
}

/// Constructors
impl ExtraAccountMetaList {
    #[inline]
    pub const fn new(tag: [u8; TAG_LEN], records: Vec<ExtraAccountMetaRecord>) -> Self {
        Self { tag, records }
    }

    /// Bytes past the last declared record are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let too_short = DecodeError::TooShort { len: data.len() };
        // 12..16 bytes has a declared length but no count to check it against
        let mut rest = data.get(RECORDS_OFFSET..).ok_or(too_short)?;
        let tag = *data.first_chunk::<TAG_LEN>().ok_or(too_short)?;
        let declared = read_u32_le(data, LENGTH_OFFSET).ok_or(too_short)?;
        let count = read_u32_le(data, COUNT_OFFSET).ok_or(too_short)?;

        let expected = Self::expected_length(count);
        if u64::from(declared) != expected {
            return Err(DecodeError::LengthMismatch { declared, expected });
        }
        if (count as u64) * (RECORD_LEN as u64) > rest.len() as u64 {
            return Err(DecodeError::TruncatedRecords {
                count,
                available: rest.len(),
            });
        }

        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            // bounds checked against count above
            let Some((record, r)) = rest.split_first_chunk::<RECORD_LEN>() else {
                break;
            };
            records.push(ExtraAccountMetaRecord::from_bytes(record));
            rest = r;
        }

        Ok(Self { tag, records })
    }
}

#[inline]
fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..)?
        .first_chunk::<4>()
        .copied()
        .map(u32::from_le_bytes)
}

/// Accessors
impl ExtraAccountMetaList {
    #[inline]
    pub const fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    #[inline]
    pub fn records(&self) -> &[ExtraAccountMetaRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ExtraAccountMetaRecord> {
        self.records.iter()
    }

    #[inline]
    pub fn push(&mut self, record: ExtraAccountMetaRecord) {
        self.records.push(record);
    }
}

/// Encoding
impl ExtraAccountMetaList {
    /// Value the length field must hold for `count` records
    #[inline]
    pub const fn expected_length(count: u32) -> u64 {
        count as u64 * RECORD_LEN as u64 + COUNT_FIELD_LEN
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        RECORDS_OFFSET + self.records.len() * RECORD_LEN
    }

    /// # Panics
    /// - if there are more than [`u32::MAX`] records, which cannot be
    ///   represented in the count field
    pub fn encode(&self) -> Vec<u8> {
        let count = u32::try_from(self.records.len()).unwrap_or_else(|_| {
            panic!("{} records overflow the u32 count", self.records.len())
        });
        let mut res = Vec::with_capacity(self.encoded_len());
        res.extend_from_slice(&self.tag);
        // at most u32::MAX * 35 + 4, which can exceed u32: truncation here
        // yields a list that fails decode, same as any other inconsistent input
        res.extend_from_slice(&(Self::expected_length(count) as u32).to_le_bytes());
        res.extend_from_slice(&count.to_le_bytes());
        for record in self.records.iter() {
            res.extend_from_slice(&record.to_bytes());
        }
        res
    }
}

impl<'a> IntoIterator for &'a ExtraAccountMetaList {
    type Item = &'a ExtraAccountMetaRecord;

    type IntoIter = core::slice::Iter<'a, ExtraAccountMetaRecord>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ExtraAccountMetaRecord> for ExtraAccountMetaList {
    #[inline]
    fn from_iter<T: IntoIterator<Item = ExtraAccountMetaRecord>>(iter: T) -> Self {
        Self::new([0; TAG_LEN], iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use super::*;

    fn header(declared: u32, count: u32) -> Vec<u8> {
        let mut res = vec![0xEE; TAG_LEN];
        res.extend_from_slice(&declared.to_le_bytes());
        res.extend_from_slice(&count.to_le_bytes());
        res
    }

    #[test]
    fn header_fields_at_fixed_offsets() {
        let list: ExtraAccountMetaList =
            core::iter::repeat(ExtraAccountMetaRecord::literal([3; 32], true, false))
                .take(2)
                .collect();
        let data = list.encode();
        assert_eq!(data.len(), list.encoded_len());
        assert_eq!(
            data[LENGTH_OFFSET..COUNT_OFFSET],
            (2 * RECORD_LEN as u32 + 4).to_le_bytes()
        );
        assert_eq!(data[COUNT_OFFSET..RECORDS_OFFSET], 2u32.to_le_bytes());
        assert_eq!(data[RECORDS_OFFSET], 0);
        assert_eq!(data[RECORDS_OFFSET + 1..RECORDS_OFFSET + 33], [3; 32]);
    }

    #[test]
    fn too_short() {
        for len in 0..RECORDS_OFFSET {
            assert_eq!(
                ExtraAccountMetaList::decode(&vec![0u8; len]),
                Err(DecodeError::TooShort { len })
            );
        }
    }

    #[test]
    fn empty_list() {
        let list = ExtraAccountMetaList::decode(&header(4, 0)).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.tag(), &[0xEE; TAG_LEN]);
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(
            ExtraAccountMetaList::decode(&header(0, 0)),
            Err(DecodeError::LengthMismatch {
                declared: 0,
                expected: 4
            })
        );
        let mut data = header(39, 2);
        data.extend_from_slice(&[0u8; 2 * RECORD_LEN]);
        assert_eq!(
            ExtraAccountMetaList::decode(&data),
            Err(DecodeError::LengthMismatch {
                declared: 39,
                expected: 74
            })
        );
    }

    #[test]
    fn huge_count_does_not_overflow() {
        assert_eq!(
            ExtraAccountMetaList::decode(&header(4, u32::MAX)),
            Err(DecodeError::LengthMismatch {
                declared: 4,
                expected: u32::MAX as u64 * 35 + 4
            })
        );
    }

    #[test]
    fn truncated_records() {
        let mut data = header(74, 2);
        data.extend_from_slice(&[0u8; RECORD_LEN + 34]);
        assert_eq!(
            ExtraAccountMetaList::decode(&data),
            Err(DecodeError::TruncatedRecords {
                count: 2,
                available: RECORD_LEN + 34
            })
        );
    }

    #[test]
    fn trailing_bytes_ignored() {
        let record = ExtraAccountMetaRecord::literal([9; 32], false, true);
        let mut data = ExtraAccountMetaList::from_iter([record]).encode();
        data.extend_from_slice(&[1, 2, 3]);
        let list = ExtraAccountMetaList::decode(&data).unwrap();
        assert_eq!(list.records(), &[record]);
    }

    fn any_record() -> impl Strategy<Value = ExtraAccountMetaRecord> {
        any::<[u8; RECORD_LEN]>().prop_map(|b| ExtraAccountMetaRecord::from_bytes(&b))
    }

    proptest! {
        #[test]
        fn encode_decode_round_trip(
            tag: [u8; TAG_LEN],
            records in vec(any_record(), 0..=12),
        ) {
            let list = ExtraAccountMetaList::new(tag, records);
            let data = list.encode();
            prop_assert_eq!(data.len(), list.encoded_len());
            prop_assert_eq!(ExtraAccountMetaList::decode(&data).unwrap(), list);
        }

        #[test]
        fn tag_is_not_checked(tag: [u8; TAG_LEN]) {
            let mut data = header(4, 0);
            data[..TAG_LEN].copy_from_slice(&tag);
            prop_assert!(ExtraAccountMetaList::decode(&data).is_ok());
        }
    }
}
