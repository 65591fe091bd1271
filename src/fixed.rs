//! Fixed-point encoding of nullable bounded-precision scores.
//!
//! A score keeps at most three decimal places, so it is stored as the value
//! scaled by 1000 in a fixed-width signed integer. The minimum value of each
//! width is reserved as the null sentinel: for a 2-byte field `i16::MIN`
//! means "no value", leaving roughly `[-32.0, 31.0]` for real scores.

use byteorder::{BigEndian, ByteOrder};

use crate::error::CodecError;

/// Scale factor between the floating score and its stored integer form
pub const SCALE: f64 = 1000.0;

/// The width class of one stored field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 2-byte signed fixed-point field
    I16,
    /// 4-byte signed fixed-point field
    I32,
}

impl FieldKind {
    /// On-disk width of one value of this kind
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::I16 => 2,
            Self::I32 => 4,
        }
    }

    /// Inclusive bounds a score must satisfy before scaling
    const fn domain(self) -> (f64, f64) {
        match self {
            Self::I16 => (-32.0, 31.0),
            Self::I32 => (-2_147_482.0, 2_147_482.0),
        }
    }

    /// Appends the fixed-point form of `value` to `out`.
    ///
    /// `None` writes the width's sentinel. A value outside the width's domain,
    /// or one whose scaled form would land on the sentinel, is a domain error.
    pub fn encode(self, value: Option<f32>, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let scaled = match value {
            None => None,
            Some(v) => {
                let (lo, hi) = self.domain();
                let exact = f64::from(v);
                if !(lo..=hi).contains(&exact) {
                    return Err(CodecError::ValueOutOfDomain {
                        value: v,
                        kind: self,
                    });
                }
                Some((exact * SCALE).round() as i64)
            }
        };

        match self {
            Self::I16 => {
                let raw = match scaled {
                    None => i16::MIN,
                    Some(s) if s == i64::from(i16::MIN) => {
                        return Err(CodecError::SentinelCollision {
                            value: value.unwrap_or_default(),
                            kind: self,
                        });
                    }
                    Some(s) => s as i16,
                };
                let mut buf = [0u8; 2];
                BigEndian::write_i16(&mut buf, raw);
                out.extend_from_slice(&buf);
            }
            Self::I32 => {
                let raw = match scaled {
                    None => i32::MIN,
                    Some(s) if s == i64::from(i32::MIN) => {
                        return Err(CodecError::SentinelCollision {
                            value: value.unwrap_or_default(),
                            kind: self,
                        });
                    }
                    Some(s) => s as i32,
                };
                let mut buf = [0u8; 4];
                BigEndian::write_i32(&mut buf, raw);
                out.extend_from_slice(&buf);
            }
        }
        Ok(())
    }

    /// Decodes one value of this kind starting at `offset`.
    ///
    /// The caller guarantees `bytes[offset..]` holds at least [`width`] bytes.
    ///
    /// [`width`]: FieldKind::width
    #[must_use]
    pub fn decode(self, bytes: &[u8], offset: usize) -> Option<f32> {
        match self {
            Self::I16 => {
                let raw = BigEndian::read_i16(&bytes[offset..]);
                if raw == i16::MIN {
                    None
                } else {
                    Some(f32::from(raw) / SCALE as f32)
                }
            }
            Self::I32 => {
                let raw = BigEndian::read_i32(&bytes[offset..]);
                if raw == i32::MIN {
                    None
                } else {
                    Some(raw as f32 / SCALE as f32)
                }
            }
        }
    }
}
