use std::sync::Arc;

use chrono::{DateTime, Utc};
use hicache_core::models::{
    AnchorMode, CacheKey, CachedPosition, Chromosome, CoverageSpan, EpigeneticTrack, Gene,
    GroupKey, Interaction, Position3, Window,
};

use crate::errors::StoreError;

/// Read and cache-maintenance operations over the four record families the
/// core works with, plus the read-only annotation tables.
///
/// Implementations must make [`IntervalStore::insert_positions`] atomic per key
/// and must run every delete under their own transaction guarantees.
pub trait IntervalStore: Send + Sync {
    /// Short name used in log lines.
    fn backend_tag(&self) -> &'static str;

    /// All chromosomes, numbered ones first in numeric order.
    fn chromosomes(&self) -> Result<Vec<Chromosome>, StoreError>;

    fn chromosome(&self, chr: &str) -> Result<Option<Chromosome>, StoreError>;

    /// Coverage spans for one (cell line, chromosome), ordered by start.
    fn coverage(&self, cell_line: &str, chr: &str) -> Result<Vec<CoverageSpan>, StoreError>;

    /// Interactions whose anchors satisfy `mode` against `window`, in load order.
    fn interactions(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
        mode: AnchorMode,
    ) -> Result<Vec<Interaction>, StoreError>;

    /// Genes overlapping the window.
    fn genes_in_window(&self, chr: &str, window: &Window) -> Result<Vec<Gene>, StoreError>;

    /// Epigenetic track intervals overlapping the window.
    fn epigenetic_tracks(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
    ) -> Result<Vec<EpigeneticTrack>, StoreError>;

    /// Every cached row for an exact key match.
    fn cached_positions(&self, key: &CacheKey) -> Result<Vec<CachedPosition>, StoreError>;

    /// Insert one result set for `key` in a single transaction.
    fn insert_positions(
        &self,
        key: &CacheKey,
        positions: &[Position3],
        insert_time: DateTime<Utc>,
    ) -> Result<usize, StoreError>;

    /// Delete rows inserted strictly before `cutoff`.
    fn delete_positions_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;

    fn count_group(&self, group: &GroupKey) -> Result<usize, StoreError>;

    fn delete_group(&self, group: &GroupKey) -> Result<usize, StoreError>;

    /// Wipe the whole position table.
    fn delete_all_positions(&self) -> Result<usize, StoreError>;
}

/// Plain row inserts for reference data. Used by fixtures; bulk ingestion is
/// done by external scripts.
pub trait ReferenceLoader {
    fn insert_chromosomes(&self, rows: &[Chromosome]) -> Result<usize, StoreError>;
    fn insert_coverage(&self, rows: &[CoverageSpan]) -> Result<usize, StoreError>;
    fn insert_interactions(&self, rows: &[Interaction]) -> Result<usize, StoreError>;
    fn insert_genes(&self, rows: &[Gene]) -> Result<usize, StoreError>;
    fn insert_epigenetic_tracks(&self, rows: &[EpigeneticTrack]) -> Result<usize, StoreError>;
}

impl<S: IntervalStore + ?Sized> IntervalStore for Arc<S> {
    fn backend_tag(&self) -> &'static str {
        (**self).backend_tag()
    }

    fn chromosomes(&self) -> Result<Vec<Chromosome>, StoreError> {
        (**self).chromosomes()
    }

    fn chromosome(&self, chr: &str) -> Result<Option<Chromosome>, StoreError> {
        (**self).chromosome(chr)
    }

    fn coverage(&self, cell_line: &str, chr: &str) -> Result<Vec<CoverageSpan>, StoreError> {
        (**self).coverage(cell_line, chr)
    }

    fn interactions(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
        mode: AnchorMode,
    ) -> Result<Vec<Interaction>, StoreError> {
        (**self).interactions(cell_line, chr, window, mode)
    }

    fn genes_in_window(&self, chr: &str, window: &Window) -> Result<Vec<Gene>, StoreError> {
        (**self).genes_in_window(chr, window)
    }

    fn epigenetic_tracks(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
    ) -> Result<Vec<EpigeneticTrack>, StoreError> {
        (**self).epigenetic_tracks(cell_line, chr, window)
    }

    fn cached_positions(&self, key: &CacheKey) -> Result<Vec<CachedPosition>, StoreError> {
        (**self).cached_positions(key)
    }

    fn insert_positions(
        &self,
        key: &CacheKey,
        positions: &[Position3],
        insert_time: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        (**self).insert_positions(key, positions, insert_time)
    }

    fn delete_positions_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        (**self).delete_positions_before(cutoff)
    }

    fn count_group(&self, group: &GroupKey) -> Result<usize, StoreError> {
        (**self).count_group(group)
    }

    fn delete_group(&self, group: &GroupKey) -> Result<usize, StoreError> {
        (**self).delete_group(group)
    }

    fn delete_all_positions(&self) -> Result<usize, StoreError> {
        (**self).delete_all_positions()
    }
}
