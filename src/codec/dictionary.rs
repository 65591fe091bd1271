//! ORDER_VALUES_WITH_DICTIONARY strategy: a deduplicated table of distinct
//! slot records followed by one index byte per slot.
//!
//! Payload layout:
//!
//! ```text
//! [entry count: u8][count * record_width entries][slots * u8 indexes]
//! ```
//!
//! Entries appear in first-occurrence order, which keeps repeated builds
//! byte-identical. Wins over the flat array whenever few distinct value
//! tuples repeat across many slots, e.g. broad flat regions of a chromosome.

use crate::error::CodecError;
use crate::layout::RecordLayout;

/// A u8 index caps the dictionary; buckets hold at most 200 slots today, so
/// the cap only binds for larger bucket configurations.
const MAX_ENTRIES: usize = u8::MAX as usize;

pub(super) fn try_pack(layout: &RecordLayout, records: &[Vec<u8>]) -> Option<Vec<u8>> {
    let mut entries: Vec<&[u8]> = Vec::new();
    let mut indexes = Vec::with_capacity(records.len());
    for record in records {
        let index = match entries.iter().position(|entry| *entry == record.as_slice()) {
            Some(index) => index,
            None => {
                if entries.len() == MAX_ENTRIES {
                    return None;
                }
                entries.push(record);
                entries.len() - 1
            }
        };
        indexes.push(index as u8);
    }

    let mut out = Vec::with_capacity(1 + entries.len() * layout.record_width() + indexes.len());
    out.push(entries.len() as u8);
    for entry in entries {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(&indexes);
    Some(out)
}

pub(super) fn payload_size(
    layout: &RecordLayout,
    slots: usize,
    bytes: &[u8],
    offset: usize,
) -> Result<usize, CodecError> {
    if bytes.len() <= offset {
        return Err(CodecError::TruncatedPayload {
            needed: offset + 1,
            got: bytes.len(),
        });
    }
    let entries = bytes[offset] as usize;
    Ok(1 + entries * layout.record_width() + slots)
}

pub(super) fn unpack_record(
    layout: &RecordLayout,
    bytes: &[u8],
    offset: usize,
    slot: usize,
) -> Result<Vec<Option<f32>>, CodecError> {
    let entries = bytes[offset] as usize;
    let table_end = offset + 1 + entries * layout.record_width();

    let index = bytes[table_end + slot] as usize;
    if index >= entries {
        return Err(CodecError::InvalidDictionaryIndex { index, entries });
    }

    let entry_start = offset + 1 + index * layout.record_width();
    Ok(layout.decode_record(&bytes[entry_start..entry_start + layout.record_width()]))
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::layout::conservation_layout;

    #[test]
    fn test_entries_in_first_occurrence_order() {
        let layout = conservation_layout();
        let a = {
            let mut r = Vec::new();
            layout.encode_record(&[Some(2.0), None], &mut r).unwrap();
            r
        };
        let b = layout.null_record();

        let records = vec![a.clone(), b.clone(), a.clone(), a.clone()];
        let packed = try_pack(&layout, &records).unwrap();

        assert_eq!(packed[0], 2);
        assert_eq!(&packed[1..5], a.as_slice());
        assert_eq!(&packed[5..9], b.as_slice());
        assert_eq!(&packed[9..], &[0, 1, 0, 0]);
    }

    #[test]
    fn test_unsupported_past_entry_cap() {
        // 300 distinct single-field records cannot be indexed by one byte
        let layout = crate::layout::RecordLayout::new(vec![crate::layout::FieldSpec::new(
            "v",
            crate::fixed::FieldKind::I16,
        )]);
        let records: Vec<Vec<u8>> = (0..300)
            .map(|i| {
                let mut r = Vec::new();
                layout
                    .encode_record(&[Some(f64::from(i) as f32 * 0.001)], &mut r)
                    .unwrap();
                r
            })
            .collect();
        assert!(try_pack(&layout, &records).is_none());
    }

    #[test]
    fn test_corrupt_index_detected() {
        let layout = conservation_layout();
        let records = vec![layout.null_record(); 4];
        let mut packed = try_pack(&layout, &records).unwrap();
        let last = packed.len() - 1;
        packed[last] = 7; // points past the single dictionary entry

        let err = unpack_record(&layout, &packed, 0, 3).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidDictionaryIndex { index: 7, entries: 1 }
        ));
    }
}
