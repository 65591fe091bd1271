//! Read-side storage connector: opens a built store read-only, validates its
//! metadata once, and serves exact-position lookups.
//!
//! The connector composes the interval key packer, one engine point read and
//! the bucket reader. A missing bucket key is the expected outcome for sparse
//! coverage and surfaces as `Ok(None)`, indistinguishable from a bucket that
//! packed EMPTY and was never persisted.
//!
//! The handle is safe for unbounded concurrent point lookups: the engine
//! provides thread-safe reads and decoding is a pure function over the
//! returned bytes.

use std::path::Path;

use rocksdb::{ColumnFamily, Options, DB};
use tracing::debug;

use crate::batch::BucketReader;
use crate::coord::{Assembly, Position};
use crate::error::{OpenError, Result};
use crate::key::{bucket_interval, pack_interval};
use crate::layout::{conservation_layout, RecordLayout};
use crate::meta::Metadata;
use crate::FORMAT_VERSION;

/// Column family holding the metadata table
pub const CF_INFO: &str = "info";
/// Column family holding packed buckets keyed by interval
pub const CF_RECORD: &str = "record";

/// Index of the GERP rejected-substitutions field in the canonical layout
pub const FIELD_GERP_RS: usize = 0;
/// Index of the GERP neutral-rate field in the canonical layout
pub const FIELD_GERP_N: usize = 1;

/// One position's decoded annotation values
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Record {
    pub gerp_rs: Option<f32>,
    pub gerp_n: Option<f32>,
}

/// A score store opened read-only for the lifetime of the process
#[derive(Debug)]
pub struct Store {
    db: DB,
    layout: RecordLayout,
    metadata: Metadata,
}

impl Store {
    /// Opens and validates a store.
    ///
    /// Fatal if the format version or assembly does not match, or if a
    /// required region is missing; there is no degraded mode.
    pub fn open<P: AsRef<Path>>(path: P, expected_assembly: Assembly) -> Result<Self> {
        let path = path.as_ref();
        let opts = Options::default();
        let column_families = DB::list_cf(&opts, path)?;
        for required in [CF_INFO, CF_RECORD] {
            if !column_families.iter().any(|name| name == required) {
                return Err(OpenError::MissingColumnFamily(required).into());
            }
        }

        let db = DB::open_cf_for_read_only(&opts, path, &column_families, false)?;
        let metadata = {
            let cf_info = cf(&db, CF_INFO)?;
            Metadata::read(&db, cf_info)?
        };
        if metadata.format_version != FORMAT_VERSION {
            return Err(OpenError::FormatVersionMismatch {
                found: metadata.format_version,
                expected: FORMAT_VERSION,
            }
            .into());
        }
        if metadata.assembly != expected_assembly.as_str() {
            return Err(OpenError::AssemblyMismatch {
                found: metadata.assembly,
                expected: expected_assembly,
            }
            .into());
        }

        debug!(path = %path.display(), assembly = %metadata.assembly, "opened score store");
        Ok(Self {
            db,
            layout: conservation_layout(),
            metadata,
        })
    }

    /// Looks up one position; `Ok(None)` means no data for its whole bucket
    pub fn get_record(&self, position: &Position) -> Result<Option<Record>> {
        let interval = bucket_interval(position);
        let key = pack_interval(&interval);
        let Some(bytes) = self.db.get_cf(cf(&self.db, CF_RECORD)?, key)? else {
            return Ok(None);
        };

        let reader = BucketReader::new(interval, &self.layout, &bytes);
        let values = reader.record(position)?;
        Ok(Some(Record {
            gerp_rs: values[FIELD_GERP_RS],
            gerp_n: values[FIELD_GERP_N],
        }))
    }

    #[must_use]
    pub fn format_version(&self) -> i16 {
        self.metadata.format_version
    }

    #[must_use]
    pub fn assembly(&self) -> &str {
        &self.metadata.assembly
    }

    /// Releases the engine handle
    pub fn close(self) {
        drop(self);
    }
}

pub(crate) fn cf<'a>(db: &'a DB, name: &'static str) -> Result<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| OpenError::MissingColumnFamily(name).into())
}
