use clap::{Arg, Command};

use crate::query::cli::{cell_line_arg, chr_arg, window_args};

pub const FOLD_CMD: &str = "fold";
pub const SWEEP_CMD: &str = "sweep";

pub fn create_fold_cli() -> Command {
    Command::new(FOLD_CMD)
        .about("Return cached 3D positions for a window, running the solver on a miss")
        .arg(cell_line_arg())
        .arg(chr_arg())
        .args(window_args())
        .arg(
            Arg::new("sample-id")
                .long("sample-id")
                .short('n')
                .required(true)
                .value_parser(clap::value_parser!(u32))
                .help("Structure sample id"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .value_parser(["preview", "full", "download"])
                .help("Solver profile (default: preview)"),
        )
        .arg(
            Arg::new("solver")
                .long("solver")
                .help("Solver executable (default: $HICACHE_SOLVER or hicache-solver)"),
        )
}

pub fn create_sweep_cli() -> Command {
    Command::new(SWEEP_CMD).about("Delete cached positions older than the TTL")
}
