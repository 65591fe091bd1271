//! Order-preserving packing of (chromosome, bucket-aligned interval) into a
//! 4-byte engine key.
//!
//! Key layout: `[chromosome byte][bucket index, 24-bit big-endian]`, so the
//! engine's native key ordering follows genomic coordinate order within a
//! chromosome. Only point lookups are issued today, but range scans stay
//! cheap if they are ever needed.
//!
//! The packer is only ever handed aligned intervals produced by
//! [`bucket_interval`]; alignment is a debug assertion, not a runtime check,
//! to keep the decode hot path allocation-free.

use byteorder::{BigEndian, ByteOrder};

use crate::coord::{Chromosome, Interval, Position};
use crate::error::ValueError;
use crate::BUCKET_SIZE;

/// Byte length of a packed interval key
pub const KEY_SIZE: usize = 4;

const BYTE_CHR_X: u8 = 24;
const BYTE_CHR_Y: u8 = 25;
const BYTE_CHR_M: u8 = 26;

/// The bucket-aligned interval owning `position`
#[must_use]
pub fn bucket_interval(position: &Position) -> Interval {
    let k = position.value / BUCKET_SIZE;
    Interval {
        chromosome: position.chromosome,
        start: k * BUCKET_SIZE,
        end: k * BUCKET_SIZE + BUCKET_SIZE - 1,
    }
}

/// Packs a bucket-aligned interval into its engine key
#[must_use]
pub fn pack_interval(interval: &Interval) -> [u8; KEY_SIZE] {
    debug_assert_eq!(interval.start % BUCKET_SIZE, 0, "misaligned bucket start");
    debug_assert_eq!(
        interval.end,
        interval.start + BUCKET_SIZE - 1,
        "interval is not one bucket wide"
    );
    let k = interval.start / BUCKET_SIZE;
    debug_assert!(k < 1 << 24, "bucket index exceeds 24-bit key space");

    let mut key = [0u8; KEY_SIZE];
    BigEndian::write_u32(&mut key, k);
    // the top byte is free after the assertion above
    key[0] = chromosome_byte(interval.chromosome);
    key
}

/// Reverses [`pack_interval`]
pub fn unpack_interval(key: &[u8; KEY_SIZE]) -> Result<Interval, ValueError> {
    let chromosome = chromosome_from_byte(key[0])?;
    let k = u32::from(key[1]) << 16 | u32::from(key[2]) << 8 | u32::from(key[3]);
    Ok(Interval {
        chromosome,
        start: k * BUCKET_SIZE,
        end: k * BUCKET_SIZE + BUCKET_SIZE - 1,
    })
}

fn chromosome_byte(chromosome: Chromosome) -> u8 {
    match chromosome {
        Chromosome::Autosome(n) => n,
        Chromosome::X => BYTE_CHR_X,
        Chromosome::Y => BYTE_CHR_Y,
        Chromosome::M => BYTE_CHR_M,
    }
}

fn chromosome_from_byte(byte: u8) -> Result<Chromosome, ValueError> {
    match byte {
        1..=23 => Ok(Chromosome::Autosome(byte)),
        BYTE_CHR_X => Ok(Chromosome::X),
        BYTE_CHR_Y => Ok(Chromosome::Y),
        BYTE_CHR_M => Ok(Chromosome::M),
        _ => Err(ValueError::InvalidChromosome(format!("key byte {byte}"))),
    }
}
