use std::io;
use std::path::PathBuf;
use std::time::Duration;

use hicache_store::StoreError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Can't start solver {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Solver exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("Solver did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Solver task aborted: {0}")]
    Aborted(String),
}

#[derive(Error, Debug)]
pub enum FoldError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("Store task failed: {0}")]
    Blocking(#[from] JoinError),

    #[error("Can't write solver input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
