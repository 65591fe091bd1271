//! ORDER_VALUES strategy: every slot laid out sequentially as a flat
//! fixed-width array. Always applicable; the baseline every other strategy
//! has to beat.

use crate::layout::RecordLayout;

pub(super) fn pack(records: &[Vec<u8>]) -> Vec<u8> {
    records.concat()
}

pub(super) fn payload_size(layout: &RecordLayout, slots: usize) -> usize {
    layout.record_width() * slots
}

pub(super) fn unpack_record(
    layout: &RecordLayout,
    bytes: &[u8],
    offset: usize,
    slot: usize,
) -> Vec<Option<f32>> {
    let start = offset + layout.record_width() * slot;
    layout.decode_record(&bytes[start..start + layout.record_width()])
}
