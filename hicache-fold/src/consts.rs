//! Environment variable names and defaults for the folding cache.

/// Path of the SQLite database shared with the solver.
///
/// ```bash
/// export HICACHE_DB=/data/hicache.sqlite
/// ```
pub const HICACHE_DB_ENV: &str = "HICACHE_DB";

/// Directory where solver input files are written.
pub const HICACHE_WORKDIR_ENV: &str = "HICACHE_WORKDIR";

/// Solver executable.
pub const HICACHE_SOLVER_ENV: &str = "HICACHE_SOLVER";

// Cache key handed to the solver process so it knows which rows to write.
pub const SOLVER_CELL_LINE_ENV: &str = "HICACHE_CELL_LINE";
pub const SOLVER_CHR_ENV: &str = "HICACHE_CHR";
pub const SOLVER_START_ENV: &str = "HICACHE_START";
pub const SOLVER_END_ENV: &str = "HICACHE_END";
pub const SOLVER_SAMPLE_ID_ENV: &str = "HICACHE_SAMPLE_ID";

/// Default root folder, under the home directory.
pub const DEFAULT_ROOT_FOLDER: &str = ".hicache";

pub const DEFAULT_WORK_SUBFOLDER: &str = "work";

pub const DEFAULT_DB_FILE: &str = "hicache.sqlite";

pub const DEFAULT_SOLVER: &str = "hicache-solver";

/// Extension of solver input files.
pub const INPUT_FILE_EXT: &str = ".tsv";

/// Cached positions older than this are swept, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Row count above which a (cell line, chromosome, sample id) group is evicted.
pub const DEFAULT_GROUP_ROW_CAP: usize = 100_000;

pub const DEFAULT_SOLVER_TIMEOUT_SECS: u64 = 600;
