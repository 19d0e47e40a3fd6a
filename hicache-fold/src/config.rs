//! Orchestrator configuration.

use std::fs::{create_dir_all, read_to_string};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use hicache_core::models::AnchorMode;
use hicache_ranges::DEFAULT_ALPHA;
use serde::Deserialize;

use super::consts::{DEFAULT_CACHE_TTL_SECS, DEFAULT_GROUP_ROW_CAP, DEFAULT_SOLVER_TIMEOUT_SECS};
use super::utils::{expand_path, get_default_work_dir};

/// What to delete when a group exceeds the row cap.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Only the offending (cell line, chromosome, sample id) group.
    #[default]
    Group,
    /// The whole position table.
    Global,
}

/// Run parameters passed to the solver as its three positional arguments.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SolverProfile {
    pub sample_count: u32,
    pub runs_per_sample: u32,
    pub download: bool,
}

impl SolverProfile {
    /// Interactive preview: few samples, nothing persisted for export.
    pub const PREVIEW: SolverProfile = SolverProfile {
        sample_count: 3,
        runs_per_sample: 1,
        download: false,
    };

    /// Full ensemble for download.
    pub const FULL_DOWNLOAD: SolverProfile = SolverProfile {
        sample_count: 50_000,
        runs_per_sample: 100,
        download: true,
    };

    pub fn by_name(name: &str) -> Option<SolverProfile> {
        match name.to_lowercase().as_str() {
            "preview" => Some(Self::PREVIEW),
            "full" | "download" => Some(Self::FULL_DOWNLOAD),
            _ => None,
        }
    }

    pub fn args(&self) -> [String; 3] {
        [
            self.sample_count.to_string(),
            self.runs_per_sample.to_string(),
            self.download.to_string(),
        ]
    }
}

impl Default for SolverProfile {
    fn default() -> Self {
        Self::PREVIEW
    }
}

/// Settings for [`crate::FoldingCacheOrchestrator`].
#[derive(Debug, Clone)]
pub struct FoldConfig {
    /// Age after which cached positions are swept.
    pub cache_ttl: Duration,
    /// Row cap per (cell line, chromosome, sample id) group.
    pub group_row_cap: usize,
    pub eviction: EvictionPolicy,
    /// Interactions with `fdr < alpha` feed the solver.
    pub alpha: f64,
    pub anchor_mode: AnchorMode,
    pub solver_timeout: Duration,
    pub profile: SolverProfile,
    /// Folder for solver input files.
    pub work_dir: PathBuf,
}

impl FoldConfig {
    pub fn builder() -> FoldConfigBuilder {
        FoldConfigBuilder::default()
    }
}

/// Builder for [`FoldConfig`]; unset fields take the crate defaults.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use hicache_fold::config::{FoldConfig, SolverProfile};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = FoldConfig::builder()
///     .with_profile(SolverProfile::FULL_DOWNLOAD)
///     .with_solver_timeout(Duration::from_secs(3600))
///     .finish()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct FoldConfigBuilder {
    cache_ttl: Option<Duration>,
    group_row_cap: Option<usize>,
    eviction: Option<EvictionPolicy>,
    alpha: Option<f64>,
    anchor_mode: Option<AnchorMode>,
    solver_timeout: Option<Duration>,
    profile: Option<SolverProfile>,
    work_dir: Option<PathBuf>,
}

impl FoldConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn with_group_row_cap(mut self, cap: usize) -> Self {
        self.group_row_cap = Some(cap);
        self
    }

    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = Some(eviction);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_anchor_mode(mut self, anchor_mode: AnchorMode) -> Self {
        self.anchor_mode = Some(anchor_mode);
        self
    }

    pub fn with_solver_timeout(mut self, timeout: Duration) -> Self {
        self.solver_timeout = Some(timeout);
        self
    }

    pub fn with_profile(mut self, profile: SolverProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = Some(path);
        self
    }

    /// Resolve defaults and create the work folder.
    pub fn finish(self) -> Result<FoldConfig> {
        let alpha = self.alpha.unwrap_or(DEFAULT_ALPHA);
        if !(0.0..=1.0).contains(&alpha) {
            return Err(anyhow!("alpha must be within [0, 1], got {}", alpha));
        }

        let work_dir = expand_path(self.work_dir.unwrap_or_else(get_default_work_dir));
        create_dir_all(&work_dir)
            .with_context(|| format!("Failed to create work folder {}", work_dir.display()))?;

        Ok(FoldConfig {
            cache_ttl: self
                .cache_ttl
                .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            group_row_cap: self.group_row_cap.unwrap_or(DEFAULT_GROUP_ROW_CAP),
            eviction: self.eviction.unwrap_or_default(),
            alpha,
            anchor_mode: self.anchor_mode.unwrap_or_default(),
            solver_timeout: self
                .solver_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_SOLVER_TIMEOUT_SECS)),
            profile: self.profile.unwrap_or_default(),
            work_dir,
        })
    }
}

/// On-disk configuration, TOML or YAML. Every field is optional.
///
/// ```toml
/// db = "~/hic/hicache.sqlite"
/// solver = "/opt/solver/run_folding"
/// cache_ttl_secs = 600
/// eviction = "group"
/// profile = "preview"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoldConfigFile {
    pub db: Option<PathBuf>,
    pub solver: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub cache_ttl_secs: Option<u64>,
    pub group_row_cap: Option<usize>,
    pub eviction: Option<EvictionPolicy>,
    pub alpha: Option<f64>,
    pub anchor_mode: Option<AnchorMode>,
    pub solver_timeout_secs: Option<u64>,
    pub profile: Option<String>,
}

impl FoldConfigFile {
    /// Parse by extension: `.yaml`/`.yml` as YAML, anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let parsed = if is_yaml {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?
        } else {
            toml::from_str(&raw).with_context(|| format!("Invalid TOML config {}", path.display()))?
        };
        Ok(parsed)
    }

    /// Overlay the file's values onto a builder.
    pub fn apply(&self, mut builder: FoldConfigBuilder) -> Result<FoldConfigBuilder> {
        if let Some(secs) = self.cache_ttl_secs {
            builder = builder.with_cache_ttl(Duration::from_secs(secs));
        }
        if let Some(cap) = self.group_row_cap {
            builder = builder.with_group_row_cap(cap);
        }
        if let Some(eviction) = self.eviction {
            builder = builder.with_eviction(eviction);
        }
        if let Some(alpha) = self.alpha {
            builder = builder.with_alpha(alpha);
        }
        if let Some(mode) = self.anchor_mode {
            builder = builder.with_anchor_mode(mode);
        }
        if let Some(secs) = self.solver_timeout_secs {
            builder = builder.with_solver_timeout(Duration::from_secs(secs));
        }
        if let Some(name) = &self.profile {
            let profile = SolverProfile::by_name(name)
                .ok_or_else(|| anyhow!("Unknown solver profile: {}", name))?;
            builder = builder.with_profile(profile);
        }
        if let Some(dir) = &self.work_dir {
            builder = builder.with_work_dir(dir.clone());
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    #[rstest]
    fn test_defaults() {
        let tempdir = tempfile::tempdir().unwrap();
        let config = FoldConfig::builder()
            .with_work_dir(tempdir.path().join("work"))
            .finish()
            .unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert_eq!(config.eviction, EvictionPolicy::Group);
        assert_eq!(config.profile, SolverProfile::PREVIEW);
        assert_eq!(config.anchor_mode, AnchorMode::Both);
        assert_eq!(config.alpha, 0.05);
        assert!(config.work_dir.is_dir());
    }

    #[rstest]
    fn test_rejects_bad_alpha() {
        let tempdir = tempfile::tempdir().unwrap();
        let result = FoldConfig::builder()
            .with_work_dir(tempdir.path().to_path_buf())
            .with_alpha(1.5)
            .finish();
        assert!(result.is_err());
    }

    #[rstest]
    #[case("preview", Some(["3", "1", "false"]))]
    #[case("full", Some(["50000", "100", "true"]))]
    #[case("fast", None)]
    fn test_profiles(#[case] name: &str, #[case] args: Option<[&str; 3]>) {
        let profile = SolverProfile::by_name(name);
        assert_eq!(profile.map(|p| p.args()), args.map(|a| a.map(String::from)));
    }

    #[rstest]
    #[case("hicache.toml", "cache_ttl_secs = 60\neviction = \"global\"\nprofile = \"full\"\nanchor_mode = \"either\"\n")]
    #[case("hicache.yaml", "cache_ttl_secs: 60\neviction: global\nprofile: full\nanchor_mode: either\n")]
    fn test_config_file(#[case] name: &str, #[case] body: &str) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();

        let file_config = FoldConfigFile::from_path(&path).unwrap();
        let config = file_config
            .apply(FoldConfig::builder().with_work_dir(tempdir.path().join("work")))
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.eviction, EvictionPolicy::Global);
        assert_eq!(config.profile, SolverProfile::FULL_DOWNLOAD);
        assert_eq!(config.anchor_mode, AnchorMode::Either);
    }
}
