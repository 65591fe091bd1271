use crate::coord::{Assembly, Interval, Position};
use crate::fixed::FieldKind;

/// Custom Result type for scoredb operations, wrapping the custom [`Error`]
/// type by default; helpers narrow the error parameter to one sub-enum
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main error type for the scoredb library, encompassing all possible error
/// cases that can occur while building or querying a score store.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Errors raised while validating a store at open time
    #[error("Error opening store: {0}")]
    OpenError(#[from] OpenError),

    /// Errors raised while packing or unpacking bucket payloads
    #[error("Error processing bucket payload: {0}")]
    CodecError(#[from] CodecError),

    /// Errors raised on the point-lookup decode path
    #[error("Error reading bucket: {0}")]
    ReadError(#[from] ReadError),

    /// Errors raised by the offline build pipeline
    #[error("Error building store: {0}")]
    BuildError(#[from] BuildError),

    /// Errors raised while parsing genomic value tokens
    #[error("Invalid value: {0}")]
    ValueError(#[from] ValueError),

    /// Failures of the embedded storage engine
    #[error("External storage error: {0}")]
    EngineError(#[from] rocksdb::Error),
}

/// Fatal errors detected while opening a store.
///
/// None of these are retryable: the caller must rebuild the store or fix its
/// configuration.
#[derive(thiserror::Error, Debug)]
pub enum OpenError {
    /// The on-disk format version does not match the version this library writes
    #[error("Format version mismatch: found {found}, expected {expected}")]
    FormatVersionMismatch { found: i16, expected: i16 },

    /// The store was built against a different genome assembly
    #[error("Assembly mismatch: store built for {found}, caller expects {expected}")]
    AssemblyMismatch { found: String, expected: Assembly },

    /// A required logical region is absent from the store
    #[error("Missing required column family: {0}")]
    MissingColumnFamily(&'static str),

    /// A required metadata entry is absent from the info region
    #[error("Missing metadata entry: {0}")]
    MissingMetadata(&'static str),

    /// A metadata entry exists but cannot be decoded
    #[error("Invalid metadata entry '{key}': {reason}")]
    InvalidMetadata { key: &'static str, reason: String },
}

/// Errors raised by the fixed-point codec and the bucket packing strategies
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// The value cannot be represented in the field's fixed-point domain
    #[error("Value {value} outside the fixed-point domain of {kind:?}")]
    ValueOutOfDomain { value: f32, kind: FieldKind },

    /// The scaled value lands on the reserved null sentinel
    #[error("Value {value} collides with the null sentinel of {kind:?}")]
    SentinelCollision { value: f32, kind: FieldKind },

    /// A bucket payload is tagged with a codec this library does not know
    #[error("Unknown codec tag: {0}")]
    UnknownTag(u8),

    /// A slot carries a different number of values than the record layout
    #[error("Field count mismatch: layout has {expected} fields, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// The number of slots handed to the registry does not match the bucket size
    #[error("Slot count mismatch: bucket holds {expected} slots, got {got}")]
    SlotCountMismatch { expected: usize, got: usize },

    /// The requested slot index lies past the end of the bucket
    #[error("Slot {slot} out of range (bucket holds {slots} slots)")]
    SlotOutOfRange { slot: usize, slots: usize },

    /// The payload is shorter than its codec tag promises
    #[error("Truncated bucket payload: need {needed} bytes, have {got}")]
    TruncatedPayload { needed: usize, got: usize },

    /// A slot references a dictionary entry past the end of the dictionary
    #[error("Dictionary index {index} out of range ({entries} entries)")]
    InvalidDictionaryIndex { index: usize, entries: usize },
}

/// Caller contract violations on the decode path.
///
/// These indicate a programmer error upstream: the position handed to a bucket
/// reader must lie inside the bucket's owning interval.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The position lies on a different chromosome than the bucket
    #[error("Chromosome mismatch: {position} against bucket {interval}")]
    ChromosomeMismatch { position: Position, interval: Interval },

    /// The position lies outside the bucket's coordinate window
    #[error("Position out of range: {position} against bucket {interval}")]
    OutOfRange { position: Position, interval: Interval },
}

/// Fatal errors raised during the offline build.
///
/// A failed build is safe to restart: the pipeline drops and recreates the
/// record region on the next run.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The source delivered a row outside the bucket window it was asked for
    #[error("Source row at position {position} outside requested window {interval}")]
    RowOutsideWindow { position: u32, interval: Interval },

    /// The relational source failed; the whole build run is aborted
    #[error("Source query failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BuildError {
    /// Wraps an arbitrary source-connector failure
    pub fn source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }
}

/// Errors raised while parsing genomic tokens
#[derive(thiserror::Error, Debug)]
pub enum ValueError {
    #[error("Invalid chromosome: {0}")]
    InvalidChromosome(String),

    #[error("Invalid assembly: {0}")]
    InvalidAssembly(String),

    #[error("Invalid interval: start {start} greater than end {end}")]
    InvalidInterval { start: u32, end: u32 },
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::coord::Chromosome;

    #[test]
    fn test_open_error_version_mismatch_display() {
        let error = OpenError::FormatVersionMismatch {
            found: 2,
            expected: 1,
        };
        let error_str = format!("{error}");
        assert!(error_str.contains('2'));
        assert!(error_str.contains('1'));
    }

    #[test]
    fn test_open_error_assembly_mismatch_display() {
        let error = OpenError::AssemblyMismatch {
            found: "GRCh38".to_string(),
            expected: Assembly::GRCh37,
        };
        let error_str = format!("{error}");
        assert!(error_str.contains("GRCh38"));
        assert!(error_str.contains("GRCh37"));
    }

    #[test]
    fn test_codec_error_unknown_tag_display() {
        let error = CodecError::UnknownTag(9);
        assert!(format!("{error}").contains('9'));
    }

    #[test]
    fn test_read_error_out_of_range_display() {
        let interval = Interval::new(Chromosome::X, 0, 199).unwrap();
        let error = ReadError::OutOfRange {
            position: Position {
                chromosome: Chromosome::X,
                value: 200,
            },
            interval,
        };
        let error_str = format!("{error}");
        assert!(error_str.contains("chrX:200"));
        assert!(error_str.contains("chrX:0-199"));
    }

    #[test]
    fn test_error_from_codec_error() {
        let error: Error = CodecError::UnknownTag(3).into();
        assert!(matches!(error, Error::CodecError(_)));
    }

    #[test]
    fn test_error_from_build_error() {
        let error: Error = BuildError::source(std::io::Error::other("connection lost")).into();
        assert!(matches!(error, Error::BuildError(BuildError::Source(_))));
        assert!(format!("{error}").contains("Source query failed"));
    }
}
