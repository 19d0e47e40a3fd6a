//! Window queries over the store.

use hicache_core::models::{AnchorMode, Chromosome, CoverageSpan, Interaction, Window};
use hicache_store::{IntervalStore, StoreError};
use log::debug;

use crate::merge::{IntervalMerge, MergedCoverage};

///
/// Resolves a requested window against stored interactions and coverage.
///
/// Unknown chromosomes and cell lines yield empty results.
///
#[derive(Clone)]
pub struct RangeQueryEngine<S> {
    store: S,
    anchor_mode: AnchorMode,
}

impl<S: IntervalStore> RangeQueryEngine<S> {
    pub fn new(store: S) -> Self {
        RangeQueryEngine {
            store,
            anchor_mode: AnchorMode::default(),
        }
    }

    pub fn with_anchor_mode(mut self, anchor_mode: AnchorMode) -> Self {
        self.anchor_mode = anchor_mode;
        self
    }

    pub fn anchor_mode(&self) -> AnchorMode {
        self.anchor_mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Interactions on `chr` whose anchors fall in `window` (see [`AnchorMode`]).
    pub fn interactions(
        &self,
        cell_line: &str,
        chr: &str,
        window: &Window,
    ) -> Result<Vec<Interaction>, StoreError> {
        let rows = self
            .store
            .interactions(cell_line, chr, window, self.anchor_mode)?;
        debug!(
            "{} interactions for {} {}:{} ({:?})",
            rows.len(),
            cell_line,
            chr,
            window,
            self.anchor_mode
        );
        Ok(rows)
    }

    /// Coverage spans ordered by start.
    pub fn coverage(&self, cell_line: &str, chr: &str) -> Result<Vec<CoverageSpan>, StoreError> {
        self.store.coverage(cell_line, chr)
    }

    /// Coverage collapsed into maximal contiguous spans.
    pub fn merged_coverage(
        &self,
        cell_line: &str,
        chr: &str,
    ) -> Result<MergedCoverage, StoreError> {
        Ok(self.coverage(cell_line, chr)?.reduce())
    }

    pub fn chromosomes(&self) -> Result<Vec<Chromosome>, StoreError> {
        self.store.chromosomes()
    }

    pub fn chromosome(&self, chr: &str) -> Result<Option<Chromosome>, StoreError> {
        self.store.chromosome(chr)
    }
}
