mod fold;
mod query;
mod settings;

use anyhow::Result;
use clap::{Arg, Command};
use tracing_subscriber::EnvFilter;

use hicache_store::SqliteStore;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "hicache";
    pub const INIT_DB_CMD: &str = "init-db";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Hi-C interaction queries and cached 3D chromatin structures.")
        .subcommand_required(true)
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite database path (default: $HICACHE_DB or ~/.hicache/hicache.sqlite)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("TOML or YAML configuration file"),
        )
        .subcommand(Command::new(consts::INIT_DB_CMD).about("Create the database tables"))
        .subcommand(query::cli::create_chromosomes_cli())
        .subcommand(query::cli::create_coverage_cli())
        .subcommand(query::cli::create_interactions_cli())
        .subcommand(fold::cli::create_fold_cli())
        .subcommand(fold::cli::create_sweep_cli())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let app = build_parser();
    let matches = app.get_matches();
    let settings = settings::Settings::from_matches(&matches)?;

    match matches.subcommand() {
        Some((consts::INIT_DB_CMD, _)) => {
            let store = SqliteStore::open(&settings.db)?;
            store.init_schema()?;
            println!("{}", settings.db.display());
        }

        //
        // QUERIES
        //
        Some((query::cli::CHROMOSOMES_CMD, _)) => {
            query::handlers::run_chromosomes(&settings)?;
        }
        Some((query::cli::COVERAGE_CMD, matches)) => {
            query::handlers::run_coverage(matches, &settings)?;
        }
        Some((query::cli::INTERACTIONS_CMD, matches)) => {
            query::handlers::run_interactions(matches, &settings)?;
        }

        //
        // FOLDING CACHE
        //
        Some((fold::cli::FOLD_CMD, matches)) => {
            fold::handlers::run_fold(matches, settings).await?;
        }
        Some((fold::cli::SWEEP_CMD, _)) => {
            fold::handlers::run_sweep(settings).await?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_fold_args() {
        let matches = build_parser()
            .try_get_matches_from([
                "hicache", "--db", "/tmp/h.sqlite", "fold", "-c", "GM12878", "-r", "chr12",
                "-s", "1000", "-e", "5000", "-n", "1", "--profile", "full",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, fold::cli::FOLD_CMD);
        assert_eq!(sub.get_one::<u32>("start"), Some(&1000));
        assert_eq!(sub.get_one::<String>("db").map(String::as_str), Some("/tmp/h.sqlite"));
    }

    #[rstest]
    fn test_db_from_config_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let config = tempdir.path().join("hicache.toml");
        std::fs::write(&config, "db = \"/data/hic.sqlite\"\nprofile = \"full\"\n").unwrap();

        let matches = build_parser()
            .try_get_matches_from(["hicache", "--config", config.to_str().unwrap(), "sweep"])
            .unwrap();
        let settings = settings::Settings::from_matches(&matches).unwrap();
        assert_eq!(settings.db, std::path::PathBuf::from("/data/hic.sqlite"));

        // flags win over the file
        let matches = build_parser()
            .try_get_matches_from([
                "hicache", "--config", config.to_str().unwrap(), "--db", "/tmp/other.sqlite",
                "chromosomes",
            ])
            .unwrap();
        let settings = settings::Settings::from_matches(&matches).unwrap();
        assert_eq!(settings.db, std::path::PathBuf::from("/tmp/other.sqlite"));
    }
}
