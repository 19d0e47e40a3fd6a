use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;

use hicache_fold::config::{FoldConfigBuilder, FoldConfigFile};
use hicache_fold::utils::{expand_path, get_default_db_path, get_default_solver};
use hicache_fold::FoldConfig;

/// Values resolved from flags, the optional config file and the environment,
/// in that order of precedence.
pub struct Settings {
    pub db: PathBuf,
    pub solver: PathBuf,
    pub file: FoldConfigFile,
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let file = match matches.get_one::<String>("config") {
            Some(path) => FoldConfigFile::from_path(&expand_path(PathBuf::from(path)))?,
            None => FoldConfigFile::default(),
        };

        let db = matches
            .get_one::<String>("db")
            .map(PathBuf::from)
            .or_else(|| file.db.clone())
            .unwrap_or_else(get_default_db_path);
        let solver = file.solver.clone().unwrap_or_else(get_default_solver);

        Ok(Settings {
            db: expand_path(db),
            solver: expand_path(solver),
            file,
        })
    }

    /// Builder pre-loaded with the config file's values.
    pub fn config_builder(&self) -> Result<FoldConfigBuilder> {
        self.file.apply(FoldConfig::builder())
    }
}
