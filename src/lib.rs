mod batch;
mod build;
mod codec;
mod coord;
pub mod error;
mod fixed;
mod key;
mod layout;
mod meta;
mod store;

pub use batch::{BucketReader, BucketWriter};
pub use build::{BuildStats, ScoreRow, ScoreSource, StoreBuilder};
pub use codec::{Codec, Compression, TAG_EMPTY, TAG_ORDER_VALUES, TAG_ORDER_VALUES_WITH_DICTIONARY};
pub use coord::{Assembly, Chromosome, Interval, Position};
pub use error::{Error, Result};
pub use fixed::{FieldKind, SCALE};
pub use key::{bucket_interval, pack_interval, unpack_interval, KEY_SIZE};
pub use layout::{conservation_layout, FieldSpec, RecordLayout};
pub use meta::Metadata;
pub use store::{Record, Store, CF_INFO, CF_RECORD, FIELD_GERP_N, FIELD_GERP_RS};

/// On-disk format revision; stores written by another revision refuse to open
pub const FORMAT_VERSION: i16 = 1;

/// Positions per bucket window
pub const BUCKET_SIZE: u32 = 200;
