use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use log::info;

use hicache_fold::utils::expand_path;
use hicache_fold::{FoldingCacheOrchestrator, ProcessSolver, SolverProfile};
use hicache_store::SqliteStore;

use crate::query::handlers::{required, window_from};
use crate::settings::Settings;

fn open_store(settings: &Settings) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&settings.db)
        .with_context(|| format!("Failed to open database {}", settings.db.display()))?;
    Ok(Arc::new(store))
}

pub async fn run_fold(matches: &ArgMatches, settings: Settings) -> Result<()> {
    let cell_line = required(matches, "cell-line")?;
    let chr = required(matches, "chr")?;
    let window = window_from(matches)?;
    let sample_id = *matches
        .get_one::<u32>("sample-id")
        .context("--sample-id is required")?;

    let mut builder = settings.config_builder()?;
    if let Some(name) = matches.get_one::<String>("profile") {
        let profile =
            SolverProfile::by_name(name).ok_or_else(|| anyhow!("Unknown profile: {}", name))?;
        builder = builder.with_profile(profile);
    }
    let config = builder.finish()?;

    let program = matches
        .get_one::<String>("solver")
        .map(|p| expand_path(PathBuf::from(p)))
        .unwrap_or_else(|| settings.solver.clone());
    let solver = Arc::new(ProcessSolver::new(program).with_db_path(&settings.db));

    let orchestrator = FoldingCacheOrchestrator::new(open_store(&settings)?, solver, config);
    let outcome = orchestrator
        .get_or_compute_structure(cell_line, chr, window, sample_id)
        .await?;
    info!(
        "{}: {:?} with {} positions",
        outcome.key,
        outcome.source,
        outcome.positions.len()
    );

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub async fn run_sweep(settings: Settings) -> Result<()> {
    let config = settings.config_builder()?.finish()?;
    let solver = Arc::new(ProcessSolver::new(settings.solver.clone()));
    let orchestrator = FoldingCacheOrchestrator::new(open_store(&settings)?, solver, config);
    let removed = orchestrator.sweep().await?;
    println!("Removed {} expired positions", removed);
    Ok(())
}
