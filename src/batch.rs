//! Bucket-level write and read access.
//!
//! A bucket covers one fixed-size, coordinate-aligned interval and stores one
//! fixed-width record slot per position. [`BucketWriter`] accumulates field
//! values for every position of the interval and hands the finished bucket to
//! the codec registry; [`BucketReader`] decodes a single slot out of a packed
//! payload without touching its neighbors.

use crate::codec::Compression;
use crate::coord::{Interval, Position};
use crate::error::{CodecError, ReadError, Result};
use crate::layout::RecordLayout;

/// Accumulates per-position field values for one bucket interval
pub struct BucketWriter<'a> {
    interval: Interval,
    layout: &'a RecordLayout,
    slots: Vec<Vec<Option<f32>>>,
}

impl<'a> BucketWriter<'a> {
    #[must_use]
    pub fn new(interval: Interval, layout: &'a RecordLayout) -> Self {
        let slots = vec![vec![None; layout.num_fields()]; interval.len()];
        Self {
            interval,
            layout,
            slots,
        }
    }

    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Stores the field values for one position; unset positions stay all-null
    pub fn set(&mut self, position: &Position, values: &[Option<f32>]) -> Result<()> {
        ensure_contains(&self.interval, position)?;
        if values.len() != self.layout.num_fields() {
            return Err(CodecError::ArityMismatch {
                expected: self.layout.num_fields(),
                got: values.len(),
            }
            .into());
        }
        let slot = (position.value - self.interval.start) as usize;
        self.slots[slot] = values.to_vec();
        Ok(())
    }

    /// True iff the whole bucket would encode via the EMPTY codec
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.iter().all(Option::is_none))
    }

    /// Packs the bucket through the codec registry into a tagged payload
    pub fn build(&self) -> Result<Vec<u8>> {
        let compression = Compression::new(self.layout, self.slots.len());
        Ok(compression.pack(&self.slots)?)
    }
}

/// Decodes single positions out of one bucket's packed payload
pub struct BucketReader<'a> {
    interval: Interval,
    layout: &'a RecordLayout,
    bytes: &'a [u8],
}

impl<'a> BucketReader<'a> {
    #[must_use]
    pub fn new(interval: Interval, layout: &'a RecordLayout, bytes: &'a [u8]) -> Self {
        Self {
            interval,
            layout,
            bytes,
        }
    }

    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Total bytes the active codec occupies, tag included
    pub fn payload_len(&self) -> Result<usize> {
        let compression = Compression::new(self.layout, self.interval.len());
        Ok(compression.unpack_size(self.bytes, 0)?)
    }

    /// Decodes every field of one position.
    ///
    /// A position outside the owning interval, or on another chromosome, is a
    /// caller contract violation and errors before any decode.
    pub fn record(&self, position: &Position) -> Result<Vec<Option<f32>>> {
        ensure_contains(&self.interval, position)?;
        let slot = (position.value - self.interval.start) as usize;
        let compression = Compression::new(self.layout, self.interval.len());
        Ok(compression.unpack_record(self.bytes, 0, slot)?)
    }

    /// Decodes only the requested field of one position
    pub fn value(&self, position: &Position, field_index: usize) -> Result<Option<f32>> {
        let values = self.record(position)?;
        match values.get(field_index) {
            Some(value) => Ok(*value),
            None => Err(CodecError::ArityMismatch {
                expected: self.layout.num_fields(),
                got: field_index + 1,
            }
            .into()),
        }
    }
}

fn ensure_contains(interval: &Interval, position: &Position) -> Result<(), ReadError> {
    if position.chromosome != interval.chromosome {
        return Err(ReadError::ChromosomeMismatch {
            position: *position,
            interval: *interval,
        });
    }
    if position.value < interval.start || position.value > interval.end {
        return Err(ReadError::OutOfRange {
            position: *position,
            interval: *interval,
        });
    }
    Ok(())
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::codec::{TAG_EMPTY, TAG_ORDER_VALUES_WITH_DICTIONARY};
    use crate::coord::Chromosome;
    use crate::error::Error;
    use crate::layout::conservation_layout;

    const CHR1: Chromosome = Chromosome::Autosome(1);

    fn bucket() -> Interval {
        Interval::new(CHR1, 0, 199).unwrap()
    }

    #[test]
    fn test_unset_positions_default_to_null() {
        let layout = conservation_layout();
        let writer = BucketWriter::new(bucket(), &layout);
        assert!(writer.is_empty());

        let bytes = writer.build().unwrap();
        assert_eq!(bytes, vec![TAG_EMPTY]);

        let reader = BucketReader::new(bucket(), &layout, &bytes);
        let record = reader.record(&Position::new(CHR1, 42)).unwrap();
        assert_eq!(record, vec![None, None]);
    }

    #[test]
    fn test_set_then_read_back() {
        let layout = conservation_layout();
        let mut writer = BucketWriter::new(bucket(), &layout);
        writer
            .set(&Position::new(CHR1, 150), &[Some(0.032), Some(4.1)])
            .unwrap();
        assert!(!writer.is_empty());

        let bytes = writer.build().unwrap();
        assert_eq!(bytes[0], TAG_ORDER_VALUES_WITH_DICTIONARY);

        let reader = BucketReader::new(bucket(), &layout, &bytes);
        assert_eq!(
            reader.record(&Position::new(CHR1, 150)).unwrap(),
            vec![Some(0.032), Some(4.1)]
        );
        assert_eq!(
            reader.record(&Position::new(CHR1, 151)).unwrap(),
            vec![None, None]
        );
        assert_eq!(
            reader.value(&Position::new(CHR1, 150), 1).unwrap(),
            Some(4.1)
        );
        assert_eq!(reader.value(&Position::new(CHR1, 150), 0).unwrap(), Some(0.032));
    }

    #[test]
    fn test_slot_resolution_at_boundaries() {
        let layout = conservation_layout();
        let interval = Interval::new(CHR1, 400, 599).unwrap();
        let mut writer = BucketWriter::new(interval, &layout);
        writer
            .set(&Position::new(CHR1, 400), &[Some(1.0), None])
            .unwrap();
        writer
            .set(&Position::new(CHR1, 599), &[None, Some(-1.0)])
            .unwrap();

        let bytes = writer.build().unwrap();
        let reader = BucketReader::new(interval, &layout, &bytes);

        // interval.start resolves to slot 0, interval.end to slot size-1
        assert_eq!(
            reader.record(&Position::new(CHR1, 400)).unwrap(),
            vec![Some(1.0), None]
        );
        assert_eq!(
            reader.record(&Position::new(CHR1, 599)).unwrap(),
            vec![None, Some(-1.0)]
        );
    }

    #[test]
    fn test_read_one_past_end_is_out_of_range() {
        let layout = conservation_layout();
        let interval = Interval::new(CHR1, 400, 599).unwrap();
        let bytes = BucketWriter::new(interval, &layout).build().unwrap();
        let reader = BucketReader::new(interval, &layout, &bytes);

        let err = reader.record(&Position::new(CHR1, 600)).unwrap_err();
        assert!(matches!(err, Error::ReadError(ReadError::OutOfRange { .. })));

        let err = reader.record(&Position::new(CHR1, 399)).unwrap_err();
        assert!(matches!(err, Error::ReadError(ReadError::OutOfRange { .. })));
    }

    #[test]
    fn test_chromosome_mismatch_rejected() {
        let layout = conservation_layout();
        let bytes = BucketWriter::new(bucket(), &layout).build().unwrap();
        let reader = BucketReader::new(bucket(), &layout, &bytes);

        let err = reader
            .record(&Position::new(Chromosome::Autosome(2), 100))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ReadError(ReadError::ChromosomeMismatch { .. })
        ));
    }

    #[test]
    fn test_writer_rejects_foreign_position() {
        let layout = conservation_layout();
        let mut writer = BucketWriter::new(bucket(), &layout);
        let err = writer
            .set(&Position::new(CHR1, 200), &[None, None])
            .unwrap_err();
        assert!(matches!(err, Error::ReadError(ReadError::OutOfRange { .. })));
    }

    #[test]
    fn test_writer_rejects_wrong_arity() {
        let layout = conservation_layout();
        let mut writer = BucketWriter::new(bucket(), &layout);
        let err = writer.set(&Position::new(CHR1, 5), &[Some(1.0)]).unwrap_err();
        assert!(matches!(
            err,
            Error::CodecError(CodecError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn test_payload_len() {
        let layout = conservation_layout();
        let mut writer = BucketWriter::new(bucket(), &layout);
        writer
            .set(&Position::new(CHR1, 10), &[Some(3.0), Some(3.0)])
            .unwrap();
        let bytes = writer.build().unwrap();
        let reader = BucketReader::new(bucket(), &layout, &bytes);
        assert_eq!(reader.payload_len().unwrap(), bytes.len());
    }

    #[test]
    fn test_overwrite_same_slot() {
        let layout = conservation_layout();
        let mut writer = BucketWriter::new(bucket(), &layout);
        writer
            .set(&Position::new(CHR1, 7), &[Some(1.0), Some(1.0)])
            .unwrap();
        writer.set(&Position::new(CHR1, 7), &[None, None]).unwrap();
        assert!(writer.is_empty());
    }
}
