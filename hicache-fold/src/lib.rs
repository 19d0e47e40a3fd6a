//! Cache-or-compute orchestration for 3D chromatin structures.
//!
//! A structure request is keyed by (cell line, chromosome, window, sample id).
//! [`FoldingCacheOrchestrator::get_or_compute_structure`] sweeps expired rows,
//! enforces the per-group row cap, returns cached positions on a hit, and on a
//! miss builds the solver input from significant interactions, runs the
//! external solver and re-reads the positions it wrote.
//!
//! Concurrent misses for one key collapse into a single solver run: the second
//! caller waits on a per-key lock and then finds the first caller's rows.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hicache_core::models::Window;
//! use hicache_fold::config::FoldConfig;
//! use hicache_fold::orchestrator::FoldingCacheOrchestrator;
//! use hicache_fold::solver::ProcessSolver;
//! use hicache_store::SqliteStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let db = std::path::Path::new("/data/hicache.sqlite");
//! let store = Arc::new(SqliteStore::open(db)?);
//! let solver = Arc::new(ProcessSolver::new("hicache-solver").with_db_path(db));
//! let orchestrator = FoldingCacheOrchestrator::new(store, solver, FoldConfig::builder().finish()?);
//!
//! let outcome = orchestrator
//!     .get_or_compute_structure("GM12878", "chr12", Window::new(1000, 5000)?, 1)
//!     .await?;
//! println!("{:?}: {} positions", outcome.source, outcome.positions.len());
//! # Ok(())
//! # }
//! ```

pub mod coalesce;
pub mod config;
pub mod consts;
pub mod errors;
pub mod orchestrator;
pub mod solver;
pub mod utils;

// re-exports
pub use self::config::{EvictionPolicy, FoldConfig, SolverProfile};
pub use self::errors::{FoldError, SolverError};
pub use self::orchestrator::{FoldOutcome, FoldSource, FoldingCacheOrchestrator};
pub use self::solver::{ProcessSolver, SolverGateway, SolverRequest};
