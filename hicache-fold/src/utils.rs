use std::env;
use std::path::PathBuf;

use dirs::home_dir;

use super::consts::{
    DEFAULT_DB_FILE, DEFAULT_ROOT_FOLDER, DEFAULT_SOLVER, DEFAULT_WORK_SUBFOLDER,
    HICACHE_DB_ENV, HICACHE_SOLVER_ENV, HICACHE_WORKDIR_ENV,
};

/// Root folder `~/.hicache`, falling back to `/tmp` without a home directory.
pub fn get_default_root_folder() -> PathBuf {
    let home = env::var("HOME")
        .ok()
        .or_else(|| home_dir().map(|p| p.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "/tmp".to_string());

    let mut path = PathBuf::from(home);
    path.push(DEFAULT_ROOT_FOLDER);
    path
}

/// Solver input folder from `HICACHE_WORKDIR`, else `~/.hicache/work`.
pub fn get_default_work_dir() -> PathBuf {
    match env::var(HICACHE_WORKDIR_ENV) {
        Ok(val) => PathBuf::from(val),
        Err(_) => get_default_root_folder().join(DEFAULT_WORK_SUBFOLDER),
    }
}

/// Database path from `HICACHE_DB`, else `~/.hicache/hicache.sqlite`.
pub fn get_default_db_path() -> PathBuf {
    match env::var(HICACHE_DB_ENV) {
        Ok(val) => PathBuf::from(val),
        Err(_) => get_default_root_folder().join(DEFAULT_DB_FILE),
    }
}

/// Solver executable from `HICACHE_SOLVER`, else `hicache-solver` on `PATH`.
pub fn get_default_solver() -> PathBuf {
    env::var(HICACHE_SOLVER_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOLVER))
}

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(path: PathBuf) -> PathBuf {
    let raw = path.to_string_lossy().into_owned();
    let expanded = shellexpand::full(&raw)
        .unwrap_or_else(|_| raw.clone().into())
        .into_owned();
    PathBuf::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_expand_path_keeps_plain_paths() {
        let path = PathBuf::from("/var/lib/hicache/work");
        assert_eq!(expand_path(path.clone()), path);
    }

    #[rstest]
    fn test_default_root_is_hidden_folder() {
        assert!(get_default_root_folder().ends_with(DEFAULT_ROOT_FOLDER));
    }
}
