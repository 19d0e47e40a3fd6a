//! Gateway to the external folding solver.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use hicache_core::models::CacheKey;
use log::debug;
use tokio::process::Command;

use super::config::SolverProfile;
use super::consts::{
    HICACHE_DB_ENV, SOLVER_CELL_LINE_ENV, SOLVER_CHR_ENV, SOLVER_END_ENV, SOLVER_SAMPLE_ID_ENV,
    SOLVER_START_ENV,
};
use super::errors::SolverError;

/// Everything a solver run needs to know.
#[derive(Debug, Clone)]
pub struct SolverRequest {
    pub key: CacheKey,
    pub input_path: PathBuf,
    pub profile: SolverProfile,
}

/// An opaque solver that, given an input file, writes cached positions for
/// `request.key` into the store as a side effect and then returns.
///
/// Implementations must stop their work when the returned future is dropped;
/// the orchestrator drops it on timeout.
#[async_trait]
pub trait SolverGateway: Send + Sync {
    async fn run(&self, request: &SolverRequest) -> Result<(), SolverError>;
}

///
/// Runs the solver as a subprocess:
/// `<program> <sample_count> <runs_per_sample> <download> <input_path>`
///
/// The cache key and database path travel as environment variables.
///
pub struct ProcessSolver {
    program: PathBuf,
    db_path: Option<PathBuf>,
}

impl ProcessSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ProcessSolver {
            program: program.into(),
            db_path: None,
        }
    }

    /// Database the solver should write into, exported as `HICACHE_DB`.
    pub fn with_db_path(mut self, db_path: &Path) -> Self {
        self.db_path = Some(db_path.to_path_buf());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, request: &SolverRequest) -> Command {
        let key = &request.key;
        let mut cmd = Command::new(&self.program);
        cmd.args(request.profile.args())
            .arg(&request.input_path)
            .env(SOLVER_CELL_LINE_ENV, &key.cell_line)
            .env(SOLVER_CHR_ENV, &key.chr)
            .env(SOLVER_START_ENV, key.window.start.to_string())
            .env(SOLVER_END_ENV, key.window.end.to_string())
            .env(SOLVER_SAMPLE_ID_ENV, key.sample_id.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(db_path) = &self.db_path {
            cmd.env(HICACHE_DB_ENV, db_path);
        }
        cmd
    }
}

#[async_trait]
impl SolverGateway for ProcessSolver {
    async fn run(&self, request: &SolverRequest) -> Result<(), SolverError> {
        debug!(
            "running {} for {} with {:?}",
            self.program.display(),
            request.key,
            request.profile
        );
        let output = self
            .command(request)
            .output()
            .await
            .map_err(|source| SolverError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SolverError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use hicache_core::models::Window;
    use rstest::*;

    #[fixture]
    fn request() -> SolverRequest {
        SolverRequest {
            key: CacheKey::new("GM12878", "chr12", Window::new(1000, 5000).unwrap(), 1),
            input_path: PathBuf::from("/nonexistent/GM12878.chr12.1000.5000.tsv"),
            profile: SolverProfile::PREVIEW,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_zero_exit_is_success(request: SolverRequest) {
        assert!(ProcessSolver::new("true").run(&request).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn test_non_zero_exit_is_failure(request: SolverRequest) {
        let result = ProcessSolver::new("false").run(&request).await;
        assert!(matches!(result, Err(SolverError::Failed { code: Some(1), .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_program(request: SolverRequest) {
        let result = ProcessSolver::new("/nonexistent/hicache-solver")
            .run(&request)
            .await;
        assert!(matches!(result, Err(SolverError::Spawn { .. })));
    }
}
