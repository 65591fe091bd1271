//! Interchangeable bucket packing strategies.
//!
//! A bucket payload is `[codec tag: 1 byte][codec-specific bytes]`. At build
//! time every strategy is offered the bucket and the globally shortest
//! successful encoding wins; equal lengths resolve to the earlier-declared
//! strategy so repeated builds are byte-identical. Selection cost is paid
//! once offline, never on the read path.
//!
//! ```text
//! tag 0  EMPTY                          (no payload)
//! tag 1  ORDER_VALUES                   [slot 0][slot 1]...[slot n-1]
//! tag 2  ORDER_VALUES_WITH_DICTIONARY   [count][entries...][slot indexes...]
//! ```
//!
//! Strategies operate on slots already encoded to their fixed-point byte
//! form, so value-tuple equality is plain byte equality and dictionary
//! construction stays deterministic.

mod dictionary;
mod empty;
mod order;

use crate::error::CodecError;
use crate::layout::RecordLayout;

/// Codec tag for [`Codec::Empty`]
pub const TAG_EMPTY: u8 = 0;
/// Codec tag for [`Codec::OrderValues`]
pub const TAG_ORDER_VALUES: u8 = 1;
/// Codec tag for [`Codec::OrderValuesWithDictionary`]
pub const TAG_ORDER_VALUES_WITH_DICTIONARY: u8 = 2;

/// The closed set of bucket packing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Every field of every slot is null; nothing is stored
    Empty,
    /// Flat fixed-width slot array, the always-applicable baseline
    OrderValues,
    /// Dictionary of distinct slot records plus one index byte per slot
    OrderValuesWithDictionary,
}

impl Codec {
    /// All codecs in declaration (and tag) order, the order selection tries
    pub const ALL: [Self; 3] = [Self::Empty, Self::OrderValues, Self::OrderValuesWithDictionary];

    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Empty => TAG_EMPTY,
            Self::OrderValues => TAG_ORDER_VALUES,
            Self::OrderValuesWithDictionary => TAG_ORDER_VALUES_WITH_DICTIONARY,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            TAG_EMPTY => Ok(Self::Empty),
            TAG_ORDER_VALUES => Ok(Self::OrderValues),
            TAG_ORDER_VALUES_WITH_DICTIONARY => Ok(Self::OrderValuesWithDictionary),
            _ => Err(CodecError::UnknownTag(tag)),
        }
    }

    /// Attempts to pack the encoded slot records; `None` means this strategy
    /// does not support the bucket's contents
    fn try_pack(self, layout: &RecordLayout, records: &[Vec<u8>]) -> Option<Vec<u8>> {
        match self {
            Self::Empty => empty::try_pack(layout, records),
            Self::OrderValues => Some(order::pack(records)),
            Self::OrderValuesWithDictionary => dictionary::try_pack(layout, records),
        }
    }

    /// Payload length (excluding the tag byte) this codec occupies at `offset`
    fn payload_size(self, layout: &RecordLayout, slots: usize, bytes: &[u8], offset: usize) -> Result<usize, CodecError> {
        match self {
            Self::Empty => Ok(empty::payload_size()),
            Self::OrderValues => Ok(order::payload_size(layout, slots)),
            Self::OrderValuesWithDictionary => dictionary::payload_size(layout, slots, bytes, offset),
        }
    }

    fn unpack_record(
        self,
        layout: &RecordLayout,
        bytes: &[u8],
        offset: usize,
        slot: usize,
    ) -> Result<Vec<Option<f32>>, CodecError> {
        match self {
            Self::Empty => Ok(empty::unpack_record(layout)),
            Self::OrderValues => Ok(order::unpack_record(layout, bytes, offset, slot)),
            Self::OrderValuesWithDictionary => dictionary::unpack_record(layout, bytes, offset, slot),
        }
    }
}

/// The codec registry for one bucket shape: a record layout plus a slot count
#[derive(Clone, Copy, Debug)]
pub struct Compression<'a> {
    layout: &'a RecordLayout,
    slots: usize,
}

impl<'a> Compression<'a> {
    #[must_use]
    pub fn new(layout: &'a RecordLayout, slots: usize) -> Self {
        Self { layout, slots }
    }

    /// Packs one bucket of per-slot values into a tagged payload.
    ///
    /// Every strategy that accepts the bucket is tried; the shortest output
    /// wins, ties going to the earlier-declared strategy.
    pub fn pack(&self, values: &[Vec<Option<f32>>]) -> Result<Vec<u8>, CodecError> {
        if values.len() != self.slots {
            return Err(CodecError::SlotCountMismatch {
                expected: self.slots,
                got: values.len(),
            });
        }

        // Fixed-point encode every slot up front; domain errors surface here,
        // before any strategy runs.
        let mut records = Vec::with_capacity(values.len());
        for slot_values in values {
            let mut record = Vec::with_capacity(self.layout.record_width());
            self.layout.encode_record(slot_values, &mut record)?;
            records.push(record);
        }

        let mut best: Option<(Codec, Vec<u8>)> = None;
        for codec in Codec::ALL {
            let Some(payload) = codec.try_pack(self.layout, &records) else {
                continue;
            };
            match &best {
                Some((_, current)) if current.len() <= payload.len() => {}
                _ => best = Some((codec, payload)),
            }
        }
        let (codec, payload) = best.expect("ORDER_VALUES accepts any bucket");

        let mut out = Vec::with_capacity(1 + payload.len());
        out.push(codec.tag());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Total bytes (tag included) the tagged payload at `offset` occupies
    pub fn unpack_size(&self, bytes: &[u8], offset: usize) -> Result<usize, CodecError> {
        let codec = self.codec_at(bytes, offset)?;
        let size = codec.payload_size(self.layout, self.slots, bytes, offset + 1)?;
        self.ensure_len(bytes, offset + 1 + size)?;
        Ok(size + 1)
    }

    /// Decodes every field of one slot from the tagged payload at `offset`
    pub fn unpack_record(
        &self,
        bytes: &[u8],
        offset: usize,
        slot: usize,
    ) -> Result<Vec<Option<f32>>, CodecError> {
        if slot >= self.slots {
            return Err(CodecError::SlotOutOfRange {
                slot,
                slots: self.slots,
            });
        }
        let codec = self.codec_at(bytes, offset)?;
        let size = codec.payload_size(self.layout, self.slots, bytes, offset + 1)?;
        self.ensure_len(bytes, offset + 1 + size)?;
        codec.unpack_record(self.layout, bytes, offset + 1, slot)
    }

    fn codec_at(&self, bytes: &[u8], offset: usize) -> Result<Codec, CodecError> {
        self.ensure_len(bytes, offset + 1)?;
        Codec::from_tag(bytes[offset])
    }

    fn ensure_len(&self, bytes: &[u8], needed: usize) -> Result<(), CodecError> {
        if bytes.len() < needed {
            return Err(CodecError::TruncatedPayload {
                needed,
                got: bytes.len(),
            });
        }
        Ok(())
    }
}
