//! EMPTY strategy: a bucket whose every field is null stores nothing.
//!
//! Sparse coverage makes this the common case; the bucket is usually not
//! even persisted, but the tag keeps the payload self-describing when it is.

use crate::layout::RecordLayout;

pub(super) fn try_pack(layout: &RecordLayout, records: &[Vec<u8>]) -> Option<Vec<u8>> {
    let null = layout.null_record();
    records
        .iter()
        .all(|record| *record == null)
        .then(Vec::new)
}

pub(super) fn payload_size() -> usize {
    0
}

pub(super) fn unpack_record(layout: &RecordLayout) -> Vec<Option<f32>> {
    vec![None; layout.num_fields()]
}
