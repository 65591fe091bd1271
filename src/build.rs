//! Offline build pipeline: turns relational score rows into a packed store.
//!
//! The build is a single-threaded, single-pass job. Per chromosome it asks
//! the source for the populated coordinate range, walks bucket-aligned
//! windows across it, fills a [`BucketWriter`] from the window's rows, skips
//! buckets that would pack EMPTY and stages the rest in one write batch
//! committed once per chromosome. Rebuilding is idempotent: the record
//! region is dropped and recreated on every run.

use std::path::Path;

use rocksdb::{Options, WriteBatch, DB};
use tracing::{debug, info};

use crate::batch::BucketWriter;
use crate::codec::Codec;
use crate::coord::{Assembly, Chromosome, Interval, Position};
use crate::error::{BuildError, Result};
use crate::key::pack_interval;
use crate::layout::{conservation_layout, RecordLayout};
use crate::meta::Metadata;
use crate::store::{cf, CF_INFO, CF_RECORD};
use crate::{BUCKET_SIZE, FORMAT_VERSION};

/// One relational source row: a position plus its field values in layout order
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRow {
    pub position: u32,
    pub values: Vec<Option<f32>>,
}

/// The relational source feeding a build.
///
/// Implementations wrap the external score database; failures they surface
/// abort the whole build run ([`BuildError::source`] wraps connector errors).
pub trait ScoreSource {
    /// Minimum and maximum populated coordinate on a chromosome, or `None`
    /// when the chromosome carries no rows at all
    fn position_range(&mut self, chromosome: Chromosome) -> Result<Option<(u32, u32)>>;

    /// All rows whose coordinate falls inside `interval`, position-ascending
    fn fetch(&mut self, interval: &Interval) -> Result<Vec<ScoreRow>>;
}

/// Per-build bucket tallies, logged once at [`StoreBuilder::finish`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Buckets persisted via the flat ORDER_VALUES codec
    pub order_values: u64,
    /// Buckets persisted via the dictionary codec
    pub dictionary: u64,
    /// Empty buckets skipped without persisting
    pub skipped: u64,
}

impl BuildStats {
    #[must_use]
    pub fn written(&self) -> u64 {
        self.order_values + self.dictionary
    }
}

/// Writes a fresh score store, one chromosome at a time
pub struct StoreBuilder {
    db: DB,
    layout: RecordLayout,
    stats: BuildStats,
}

impl StoreBuilder {
    /// Creates (or recreates) the store at `path` and writes its metadata.
    ///
    /// A pre-existing record region is dropped first, so rerunning a failed
    /// build starts from a clean slate.
    pub fn create<P: AsRef<Path>>(path: P, assembly: Assembly) -> Result<Self> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let existing = DB::list_cf(&opts, path).unwrap_or_default();
        let mut names = existing.clone();
        for required in ["default", CF_INFO, CF_RECORD] {
            if !names.iter().any(|name| name == required) {
                names.push(required.to_string());
            }
        }

        let mut db = DB::open_cf(&opts, path, &names)?;
        if existing.iter().any(|name| name == CF_RECORD) {
            debug!(path = %path.display(), "dropping stale record region");
            db.drop_cf(CF_RECORD)?;
            db.create_cf(CF_RECORD, &Options::default())?;
        }

        Metadata::write(&db, cf(&db, CF_INFO)?, FORMAT_VERSION, assembly)?;
        info!(path = %path.display(), %assembly, "created score store");

        Ok(Self {
            db,
            layout: conservation_layout(),
            stats: BuildStats::default(),
        })
    }

    /// Builds every chromosome from `source`
    pub fn build<S: ScoreSource>(&mut self, source: &mut S) -> Result<()> {
        for chromosome in Chromosome::all() {
            self.build_chromosome(source, chromosome)?;
        }
        Ok(())
    }

    /// Builds one chromosome, committed as a single write batch
    pub fn build_chromosome<S: ScoreSource>(
        &mut self,
        source: &mut S,
        chromosome: Chromosome,
    ) -> Result<()> {
        let Some((min, max)) = source.position_range(chromosome)? else {
            debug!(%chromosome, "no source rows, skipping");
            return Ok(());
        };

        let layout = self.layout.clone();
        let mut batch = WriteBatch::default();
        let cf_record = cf(&self.db, CF_RECORD)?;

        for k in min / BUCKET_SIZE..=max / BUCKET_SIZE {
            let start = k * BUCKET_SIZE;
            let interval = Interval {
                chromosome,
                start,
                end: start + BUCKET_SIZE - 1,
            };

            let mut writer = BucketWriter::new(interval, &layout);
            for row in source.fetch(&interval)? {
                if row.position < interval.start || row.position > interval.end {
                    return Err(BuildError::RowOutsideWindow {
                        position: row.position,
                        interval,
                    }
                    .into());
                }
                writer.set(&Position::new(chromosome, row.position), &row.values)?;
            }

            if writer.is_empty() {
                self.stats.skipped += 1;
                continue;
            }

            let value = writer.build()?;
            match Codec::from_tag(value[0])? {
                Codec::OrderValues => self.stats.order_values += 1,
                Codec::OrderValuesWithDictionary => self.stats.dictionary += 1,
                Codec::Empty => {} // non-empty buckets never pack EMPTY
            }
            batch.put_cf(cf_record, pack_interval(&interval), &value);

            if start % 1_000_000 == 0 {
                debug!(%chromosome, position = start, "write bucket window");
            }
        }

        self.db.write(batch)?;
        debug!(%chromosome, "chromosome committed");
        Ok(())
    }

    #[must_use]
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Compacts the record region once and flushes; the store is ready to be
    /// opened read-only afterwards
    pub fn finish(self) -> Result<()> {
        self.db
            .compact_range_cf(cf(&self.db, CF_RECORD)?, None::<&[u8]>, None::<&[u8]>);
        self.db.flush()?;
        info!(
            written = self.stats.written(),
            order_values = self.stats.order_values,
            dictionary = self.stats.dictionary,
            skipped = self.stats.skipped,
            "store build complete"
        );
        Ok(())
    }
}
