//! In-process backend for tests and local experiments.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use hicache_core::models::chromosome::sort_naturally;
use hicache_core::models::{
    AnchorMode, CacheKey, CachedPosition, Chromosome, CoverageSpan, EpigeneticTrack, Gene,
    GroupKey, Interaction, Position3, Window,
};

use crate::backend::{IntervalStore, ReferenceLoader};
use crate::errors::StoreError;

#[derive(Default)]
struct Tables {
    chromosomes: Vec<Chromosome>,
    coverage: Vec<CoverageSpan>,
    interactions: Vec<Interaction>,
    positions: Vec<CachedPosition>,
    genes: Vec<Gene>,
    tracks: Vec<EpigeneticTrack>,
}

/// All tables behind one lock, so every write is atomic with respect to readers.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached position rows across every key.
    pub fn position_count(&self) -> usize {
        self.read().map(|t| t.positions.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl IntervalStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    fn chromosomes(&self) -> Result<Vec<Chromosome>, StoreError> {
        let mut chromosomes = self.read()?.chromosomes.clone();
        sort_naturally(&mut chromosomes);
        Ok(chromosomes)
    }

    fn chromosome(&self, chr: &str) -> Result<Option<Chromosome>, StoreError> {
        Ok(self.read()?.chromosomes.iter().find(|c| c.chr == chr).cloned())
    }

    fn coverage(&self, cell_line: &str, chr: &str) -> Result<Vec<CoverageSpan>, StoreError> {
        let mut spans: Vec<CoverageSpan> = self
            .read()?
            .coverage
            .iter()
            .filter(|s| s.cell_line == cell_line && s.chr == chr)
            .cloned()
            .collect();
        spans.sort_by_key(|s| (s.start, s.end));
        Ok(spans)
    }

    fn interactions(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
        mode: AnchorMode,
    ) -> Result<Vec<Interaction>, StoreError> {
        Ok(self
            .read()?
            .interactions
            .iter()
            .filter(|i| i.cell_line == cell_line && i.chr == chr && i.in_window(window, mode))
            .cloned()
            .collect())
    }

    fn genes_in_window(&self, chr: &str, window: &Window) -> Result<Vec<Gene>, StoreError> {
        let mut genes: Vec<Gene> = self
            .read()?
            .genes
            .iter()
            .filter(|g| {
                g.chr == chr && g.start_location <= window.end && g.end_location >= window.start
            })
            .cloned()
            .collect();
        genes.sort_by_key(|g| g.start_location);
        Ok(genes)
    }

    fn epigenetic_tracks(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
    ) -> Result<Vec<EpigeneticTrack>, StoreError> {
        let mut tracks: Vec<EpigeneticTrack> = self
            .read()?
            .tracks
            .iter()
            .filter(|t| {
                t.cell_line == cell_line
                    && t.chr == chr
                    && t.start <= window.end
                    && t.end >= window.start
            })
            .cloned()
            .collect();
        tracks.sort_by_key(|t| t.start);
        Ok(tracks)
    }

    fn cached_positions(&self, key: &CacheKey) -> Result<Vec<CachedPosition>, StoreError> {
        Ok(self
            .read()?
            .positions
            .iter()
            .filter(|p| key.matches(p))
            .cloned()
            .collect())
    }

    fn insert_positions(
        &self,
        key: &CacheKey,
        positions: &[Position3],
        insert_time: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        tables.positions.extend(
            positions
                .iter()
                .map(|p| CachedPosition::from_key(key, *p, insert_time)),
        );
        Ok(positions.len())
    }

    fn delete_positions_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let before = tables.positions.len();
        tables.positions.retain(|p| p.insert_time >= cutoff);
        Ok(before - tables.positions.len())
    }

    fn count_group(&self, group: &GroupKey) -> Result<usize, StoreError> {
        Ok(self
            .read()?
            .positions
            .iter()
            .filter(|p| group.matches(p))
            .count())
    }

    fn delete_group(&self, group: &GroupKey) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let before = tables.positions.len();
        tables.positions.retain(|p| !group.matches(p));
        Ok(before - tables.positions.len())
    }

    fn delete_all_positions(&self) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let n = tables.positions.len();
        tables.positions.clear();
        Ok(n)
    }
}

impl ReferenceLoader for MemoryStore {
    fn insert_chromosomes(&self, rows: &[Chromosome]) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        for row in rows {
            tables.chromosomes.retain(|c| c.chr != row.chr);
            tables.chromosomes.push(row.clone());
        }
        Ok(rows.len())
    }

    fn insert_coverage(&self, rows: &[CoverageSpan]) -> Result<usize, StoreError> {
        self.write()?.coverage.extend_from_slice(rows);
        Ok(rows.len())
    }

    fn insert_interactions(&self, rows: &[Interaction]) -> Result<usize, StoreError> {
        self.write()?.interactions.extend_from_slice(rows);
        Ok(rows.len())
    }

    fn insert_genes(&self, rows: &[Gene]) -> Result<usize, StoreError> {
        self.write()?.genes.extend_from_slice(rows);
        Ok(rows.len())
    }

    fn insert_epigenetic_tracks(&self, rows: &[EpigeneticTrack]) -> Result<usize, StoreError> {
        self.write()?.tracks.extend_from_slice(rows);
        Ok(rows.len())
    }
}
