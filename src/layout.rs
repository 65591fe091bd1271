//! Record layout descriptor: an ordered field list with derived offsets.
//!
//! A bucket stores one fixed-width record slot per position. The layout is
//! the single place that knows how wide a slot is and where each field sits
//! inside it; the bucket writer, reader and codec strategies all defer to it.

use crate::error::CodecError;
use crate::fixed::FieldKind;

/// One named field of a record slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// An ordered list of field specs defining the on-disk layout of one slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    fields: Vec<FieldSpec>,
}

impl RecordLayout {
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        assert!(!fields.is_empty(), "a record layout needs at least one field");
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of fields per slot
    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Byte offset of `field_index` inside one slot
    #[must_use]
    pub fn offset_of(&self, field_index: usize) -> usize {
        self.fields[..field_index]
            .iter()
            .map(|f| f.kind.width())
            .sum()
    }

    /// Total byte width of one slot
    #[must_use]
    pub fn record_width(&self) -> usize {
        self.fields.iter().map(|f| f.kind.width()).sum()
    }

    /// Encodes one slot's values in field order, appending to `out`
    pub fn encode_record(&self, values: &[Option<f32>], out: &mut Vec<u8>) -> Result<(), CodecError> {
        if values.len() != self.fields.len() {
            return Err(CodecError::ArityMismatch {
                expected: self.fields.len(),
                got: values.len(),
            });
        }
        for (field, value) in self.fields.iter().zip(values) {
            field.kind.encode(*value, out)?;
        }
        Ok(())
    }

    /// Decodes a single field from one slot window
    #[must_use]
    pub fn decode_field(&self, record: &[u8], field_index: usize) -> Option<f32> {
        self.fields[field_index]
            .kind
            .decode(record, self.offset_of(field_index))
    }

    /// Decodes every field of one slot window
    #[must_use]
    pub fn decode_record(&self, record: &[u8]) -> Vec<Option<f32>> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut offset = 0;
        for field in &self.fields {
            values.push(field.kind.decode(record, offset));
            offset += field.kind.width();
        }
        values
    }

    /// The encoded form of an all-null slot: every field at its sentinel
    #[must_use]
    pub fn null_record(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.record_width());
        for field in &self.fields {
            // encoding None cannot fail
            let _ = field.kind.encode(None, &mut out);
        }
        out
    }
}

/// The canonical field set of the conservation score store: GERP rejected
/// substitutions score followed by GERP neutral rate, both 2-byte fields.
#[must_use]
pub fn conservation_layout() -> RecordLayout {
    RecordLayout::new(vec![
        FieldSpec::new("gerp_rs", FieldKind::I16),
        FieldSpec::new("gerp_n", FieldKind::I16),
    ])
}

#[cfg(test)]
mod testing {
    use super::*;

    fn mixed_layout() -> RecordLayout {
        RecordLayout::new(vec![
            FieldSpec::new("a", FieldKind::I16),
            FieldSpec::new("b", FieldKind::I32),
            FieldSpec::new("c", FieldKind::I16),
        ])
    }

    #[test]
    fn test_offsets_and_width() {
        let layout = mixed_layout();
        assert_eq!(layout.offset_of(0), 0);
        assert_eq!(layout.offset_of(1), 2);
        assert_eq!(layout.offset_of(2), 6);
        assert_eq!(layout.record_width(), 8);
    }

    #[test]
    fn test_encode_decode_record() {
        let layout = mixed_layout();
        let values = vec![Some(1.5), None, Some(-0.25)];
        let mut buf = Vec::new();
        layout.encode_record(&values, &mut buf).unwrap();
        assert_eq!(buf.len(), layout.record_width());
        assert_eq!(layout.decode_record(&buf), values);
        assert_eq!(layout.decode_field(&buf, 1), None);
        assert_eq!(layout.decode_field(&buf, 2), Some(-0.25));
    }

    #[test]
    fn test_arity_mismatch() {
        let layout = mixed_layout();
        let mut buf = Vec::new();
        let err = layout.encode_record(&[Some(1.0)], &mut buf).unwrap_err();
        assert!(matches!(err, CodecError::ArityMismatch { expected: 3, got: 1 }));
    }

    #[test]
    fn test_null_record_decodes_to_all_none() {
        let layout = mixed_layout();
        let null = layout.null_record();
        assert_eq!(null.len(), layout.record_width());
        assert_eq!(layout.decode_record(&null), vec![None, None, None]);
    }

    #[test]
    fn test_conservation_layout_shape() {
        let layout = conservation_layout();
        assert_eq!(layout.num_fields(), 2);
        assert_eq!(layout.record_width(), 4);
        assert_eq!(layout.fields()[0].name, "gerp_rs");
        assert_eq!(layout.fields()[1].name, "gerp_n");
    }
}
