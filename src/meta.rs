//! The info region: a two-entry metadata table written once at build time
//! and validated once at open time.

use byteorder::{BigEndian, ByteOrder};
use rocksdb::{ColumnFamily, DB};

use crate::coord::Assembly;
use crate::error::{OpenError, Result};

/// Info-region key holding the on-disk format version (big-endian i16)
pub const KEY_FORMAT_VERSION: &str = "format_version";
/// Info-region key holding the genome assembly name (UTF-8)
pub const KEY_ASSEMBLY: &str = "assembly";

/// The decoded metadata table of a store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub format_version: i16,
    pub assembly: String,
}

impl Metadata {
    /// Reads and decodes both entries from the info column family
    pub fn read(db: &DB, cf_info: &ColumnFamily) -> Result<Self> {
        let bytes = db
            .get_cf(cf_info, KEY_FORMAT_VERSION)?
            .ok_or(OpenError::MissingMetadata(KEY_FORMAT_VERSION))?;
        if bytes.len() != 2 {
            return Err(OpenError::InvalidMetadata {
                key: KEY_FORMAT_VERSION,
                reason: format!("expected 2 bytes, found {}", bytes.len()),
            }
            .into());
        }
        let format_version = BigEndian::read_i16(&bytes);

        let bytes = db
            .get_cf(cf_info, KEY_ASSEMBLY)?
            .ok_or(OpenError::MissingMetadata(KEY_ASSEMBLY))?;
        let assembly = String::from_utf8(bytes).map_err(|e| OpenError::InvalidMetadata {
            key: KEY_ASSEMBLY,
            reason: e.to_string(),
        })?;

        Ok(Self {
            format_version,
            assembly,
        })
    }

    /// Writes both entries; called exactly once per build
    pub fn write(db: &DB, cf_info: &ColumnFamily, format_version: i16, assembly: Assembly) -> Result<()> {
        let mut version_bytes = [0u8; 2];
        BigEndian::write_i16(&mut version_bytes, format_version);
        db.put_cf(cf_info, KEY_FORMAT_VERSION, version_bytes)?;
        db.put_cf(cf_info, KEY_ASSEMBLY, assembly.as_str().as_bytes())?;
        Ok(())
    }
}
