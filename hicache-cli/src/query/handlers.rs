use anyhow::{Context, Result};
use clap::ArgMatches;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use hicache_core::models::{AnchorMode, Window};
use hicache_ranges::{RangeQueryEngine, filter_significant};
use hicache_store::SqliteStore;

use crate::settings::Settings;

#[derive(Tabled)]
struct SpanRow {
    #[tabled(rename = "Start")]
    start: u32,
    #[tabled(rename = "End")]
    end: u32,
}

fn open_engine(settings: &Settings) -> Result<RangeQueryEngine<SqliteStore>> {
    let store = SqliteStore::open(&settings.db)
        .with_context(|| format!("Failed to open database {}", settings.db.display()))?;
    Ok(RangeQueryEngine::new(store))
}

pub(crate) fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("--{} is required", name))
}

pub(crate) fn window_from(matches: &ArgMatches) -> Result<Window> {
    let start = *matches
        .get_one::<u32>("start")
        .context("--start is required")?;
    let end = *matches.get_one::<u32>("end").context("--end is required")?;
    Ok(Window::new(start, end)?)
}

pub fn run_chromosomes(settings: &Settings) -> Result<()> {
    let engine = open_engine(settings)?;
    let chromosomes = engine.chromosomes()?;
    println!("{}", serde_json::to_string_pretty(&chromosomes)?);
    Ok(())
}

pub fn run_coverage(matches: &ArgMatches, settings: &Settings) -> Result<()> {
    let cell_line = required(matches, "cell-line")?;
    let chr = required(matches, "chr")?;
    let engine = open_engine(settings)?;

    let mut bounds = None;
    let rows: Vec<SpanRow> = if matches.get_flag("merged") {
        let merged = engine.merged_coverage(cell_line, chr)?;
        bounds = merged.bounds;
        merged
            .spans
            .into_iter()
            .map(|(start, end)| SpanRow { start, end })
            .collect()
    } else {
        engine
            .coverage(cell_line, chr)?
            .iter()
            .map(|s| SpanRow {
                start: s.start,
                end: s.end,
            })
            .collect()
    };

    if rows.is_empty() {
        println!("Number of spans: 0");
    } else {
        let mut table = Table::new(&rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("Number of spans: {}", rows.len());
    }
    if let Some((start, end)) = bounds {
        println!("Bounds: {}-{}", start, end);
    }
    Ok(())
}

pub fn run_interactions(matches: &ArgMatches, settings: &Settings) -> Result<()> {
    let cell_line = required(matches, "cell-line")?;
    let chr = required(matches, "chr")?;
    let window = window_from(matches)?;
    let mode = if matches.get_flag("either") {
        AnchorMode::Either
    } else {
        settings.file.anchor_mode.unwrap_or_default()
    };

    let engine = open_engine(settings)?.with_anchor_mode(mode);
    let mut interactions = engine.interactions(cell_line, chr, &window)?;
    if let Some(alpha) = matches.get_one::<f64>("alpha") {
        interactions = filter_significant(&interactions, *alpha);
    }
    println!("{}", serde_json::to_string_pretty(&interactions)?);
    Ok(())
}
