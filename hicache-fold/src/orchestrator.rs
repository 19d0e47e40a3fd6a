//! The cache-or-compute state machine for structure requests.
//!
//! ```text
//! sweep -> cap check -> lock key -> CHECK_CACHE --hit--> return
//!                                      |
//!                                     miss -> PREPARE_INPUT -> INVOKE_SOLVER -> RE_CHECK_CACHE -> return
//! ```

use std::fs::{File, remove_file};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{TimeDelta, Utc};
use hicache_core::models::{CacheKey, CachedPosition, GroupKey, Window};
use hicache_ranges::RangeQueryEngine;
use hicache_ranges::significance::{
    FoldingEdge, filter_significant, to_folding_input, write_folding_input,
};
use hicache_store::{IntervalStore, StoreError};
use log::{debug, info, warn};
use serde::Serialize;

use super::coalesce::{KeyGuard, KeyedLocks};
use super::config::{EvictionPolicy, FoldConfig};
use super::consts::INPUT_FILE_EXT;
use super::errors::{FoldError, SolverError};
use super::solver::{SolverGateway, SolverRequest};

/// Where the returned positions came from.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldSource {
    /// Rows were already cached.
    Hit,
    /// The solver ran during this request and wrote rows.
    Computed,
    /// No (significant) interactions in the window; nothing to fold.
    NoData,
    /// The solver ran but wrote no rows for the key.
    SolverEmpty,
}

/// Result of a structure request. An empty `positions` is a valid outcome;
/// `source` tells the caller why.
#[derive(Debug, Clone, Serialize)]
pub struct FoldOutcome {
    pub key: CacheKey,
    pub source: FoldSource,
    pub positions: Vec<CachedPosition>,
}

impl FoldOutcome {
    pub fn cache_hit(&self) -> bool {
        self.source == FoldSource::Hit
    }
}

/// Solver input file, removed when dropped.
struct InputFile {
    path: PathBuf,
}

impl InputFile {
    fn write(path: PathBuf, edges: &[FoldingEdge]) -> Result<Self, FoldError> {
        // own the path first so a half-written file is still cleaned up
        let input = InputFile { path };
        File::create(&input.path)
            .and_then(|file| write_folding_input(edges, BufWriter::new(file)))
            .map_err(|source| FoldError::Input {
                path: input.path.clone(),
                source,
            })?;
        Ok(input)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InputFile {
    fn drop(&mut self) {
        match remove_file(&self.path) {
            Ok(()) => debug!("removed solver input {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Can't remove solver input {}: {}", self.path.display(), e),
        }
    }
}

/// Held by a solver run until it finishes. Fields drop in order: the input
/// file, then its path lock, then the key lock.
struct InFlight {
    _input: InputFile,
    _input_guard: KeyGuard,
    _key_guard: KeyGuard,
}

///
/// Coordinates cache lookup, eviction, solver invocation and result retrieval.
///
/// The store is an explicit handle shared with the solver (which writes into
/// it); nothing here is global state. Store calls run on tokio's blocking pool.
///
pub struct FoldingCacheOrchestrator<S, G> {
    store: Arc<S>,
    solver: Arc<G>,
    engine: RangeQueryEngine<Arc<S>>,
    config: FoldConfig,
    keys: KeyedLocks,
    inputs: KeyedLocks,
    solver_calls: AtomicU64,
}

impl<S, G> FoldingCacheOrchestrator<S, G>
where
    S: IntervalStore + 'static,
    G: SolverGateway + 'static,
{
    pub fn new(store: Arc<S>, solver: Arc<G>, config: FoldConfig) -> Self {
        let engine = RangeQueryEngine::new(Arc::clone(&store)).with_anchor_mode(config.anchor_mode);
        FoldingCacheOrchestrator {
            store,
            solver,
            engine,
            config,
            keys: KeyedLocks::new(),
            inputs: KeyedLocks::new(),
            solver_calls: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    pub fn engine(&self) -> &RangeQueryEngine<Arc<S>> {
        &self.engine
    }

    /// Number of solver runs started by this orchestrator.
    pub fn solver_invocations(&self) -> u64 {
        self.solver_calls.load(Ordering::SeqCst)
    }

    /// Return the cached structure for the key, computing it on a miss.
    pub async fn get_or_compute_structure(
        &self,
        cell_line: &str,
        chr: &str,
        window: Window,
        sample_id: u32,
    ) -> Result<FoldOutcome, FoldError> {
        let key = CacheKey::new(cell_line, chr, window, sample_id);

        self.sweep().await?;
        self.enforce_row_cap(key.group()).await?;

        // a key's rows are incomplete while its solver runs: read only under the key lock
        let key_guard = self.keys.acquire(&key.to_string()).await;
        if let Some(hit) = self.lookup(&key).await? {
            return Ok(hit);
        }

        self.compute(&key, key_guard).await
    }

    /// Delete cached rows older than the TTL. Returns the number removed.
    pub async fn sweep(&self) -> Result<usize, FoldError> {
        let cutoff = TimeDelta::from_std(self.config.cache_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl));
        let Some(cutoff) = cutoff else {
            return Ok(0);
        };

        let removed = self
            .with_store(move |store| store.delete_positions_before(cutoff))
            .await?;
        if removed > 0 {
            info!("swept {} cached positions older than {}", removed, cutoff);
        }
        Ok(removed)
    }

    /// Run one store call on the blocking pool.
    async fn with_store<T, F>(&self, call: F) -> Result<T, FoldError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let value = tokio::task::spawn_blocking(move || call(store.as_ref())).await??;
        Ok(value)
    }

    /// Evict when the group has more rows than the cap allows.
    async fn enforce_row_cap(&self, group: GroupKey) -> Result<(), FoldError> {
        let counted = group.clone();
        let count = self
            .with_store(move |store| store.count_group(&counted))
            .await?;
        if count <= self.config.group_row_cap {
            return Ok(());
        }

        match self.config.eviction {
            EvictionPolicy::Group => {
                let evicted = group.clone();
                let removed = self
                    .with_store(move |store| store.delete_group(&evicted))
                    .await?;
                info!(
                    "group {}:{}:{} held {} rows (cap {}), evicted {}",
                    group.cell_line,
                    group.chr,
                    group.sample_id,
                    count,
                    self.config.group_row_cap,
                    removed
                );
            }
            EvictionPolicy::Global => {
                let removed = self
                    .with_store(|store| store.delete_all_positions())
                    .await?;
                warn!(
                    "group {}:{}:{} held {} rows (cap {}), wiped the whole position table ({} rows)",
                    group.cell_line,
                    group.chr,
                    group.sample_id,
                    count,
                    self.config.group_row_cap,
                    removed
                );
            }
        }
        Ok(())
    }

    async fn cached_positions(&self, key: &CacheKey) -> Result<Vec<CachedPosition>, FoldError> {
        let key = key.clone();
        self.with_store(move |store| store.cached_positions(&key)).await
    }

    async fn lookup(&self, key: &CacheKey) -> Result<Option<FoldOutcome>, FoldError> {
        let positions = self.cached_positions(key).await?;
        if positions.is_empty() {
            debug!("cache miss for {}", key);
            return Ok(None);
        }

        debug!("cache hit for {} ({} rows)", key, positions.len());
        Ok(Some(FoldOutcome {
            key: key.clone(),
            source: FoldSource::Hit,
            positions,
        }))
    }

    async fn compute(&self, key: &CacheKey, key_guard: KeyGuard) -> Result<FoldOutcome, FoldError> {
        let engine = self.engine.clone();
        let (cell_line, chr, window) = (key.cell_line.clone(), key.chr.clone(), key.window);
        let interactions =
            tokio::task::spawn_blocking(move || engine.interactions(&cell_line, &chr, &window))
                .await??;
        let edges = to_folding_input(&filter_significant(&interactions, self.config.alpha));

        if edges.is_empty() {
            info!(
                "no significant interactions for {} ({} in window), nothing to fold",
                key,
                interactions.len()
            );
            return Ok(FoldOutcome {
                key: key.clone(),
                source: FoldSource::NoData,
                positions: Vec::new(),
            });
        }

        // requests differing only in sample id share the input path
        let stem = key.input_stem();
        let input_guard = self.inputs.acquire(&stem).await;
        let input = InputFile::write(
            self.config.work_dir.join(format!("{}{}", stem, INPUT_FILE_EXT)),
            &edges,
        )?;

        let request = SolverRequest {
            key: key.clone(),
            input_path: input.path().to_path_buf(),
            profile: self.config.profile,
        };
        info!(
            "running solver for {} with {} edges ({:?})",
            key,
            edges.len(),
            self.config.profile
        );
        let in_flight = InFlight {
            _input: input,
            _input_guard: input_guard,
            _key_guard: key_guard,
        };

        if let Err(e) = self.invoke(request, in_flight).await {
            warn!("solver failed for {}: {}", key, e);
            return Err(e.into());
        }

        let positions = self.cached_positions(key).await?;
        let source = if positions.is_empty() {
            warn!("solver wrote no positions for {}", key);
            FoldSource::SolverEmpty
        } else {
            info!("solver wrote {} positions for {}", positions.len(), key);
            FoldSource::Computed
        };

        Ok(FoldOutcome {
            key: key.clone(),
            source,
            positions,
        })
    }

    /// Run the solver on its own task, bounded by the configured timeout.
    ///
    /// The task owns the locks and the input file, so a caller that gives up
    /// early neither frees the key nor lifts the timeout.
    async fn invoke(&self, request: SolverRequest, in_flight: InFlight) -> Result<(), SolverError> {
        self.solver_calls.fetch_add(1, Ordering::SeqCst);

        let solver = Arc::clone(&self.solver);
        let limit = self.config.solver_timeout;
        let handle = tokio::spawn(async move {
            let result = match tokio::time::timeout(limit, solver.run(&request)).await {
                Ok(result) => result,
                Err(_) => Err(SolverError::Timeout(limit)),
            };
            drop(in_flight);
            result
        });

        handle
            .await
            .unwrap_or_else(|join_error| Err(SolverError::Aborted(join_error.to_string())))
    }
}
