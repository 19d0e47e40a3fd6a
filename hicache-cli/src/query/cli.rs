use clap::{Arg, ArgAction, Command, value_parser};

pub const CHROMOSOMES_CMD: &str = "chromosomes";
pub const COVERAGE_CMD: &str = "coverage";
pub const INTERACTIONS_CMD: &str = "interactions";

pub(crate) fn cell_line_arg() -> Arg {
    Arg::new("cell-line")
        .long("cell-line")
        .short('c')
        .required(true)
        .help("Cell line, e.g. GM12878")
}

pub(crate) fn chr_arg() -> Arg {
    Arg::new("chr")
        .long("chr")
        .short('r')
        .required(true)
        .help("Chromosome, e.g. chr12")
}

pub(crate) fn window_args() -> [Arg; 2] {
    [
        Arg::new("start")
            .long("start")
            .short('s')
            .required(true)
            .value_parser(value_parser!(u32))
            .help("Window start (bp, inclusive)"),
        Arg::new("end")
            .long("end")
            .short('e')
            .required(true)
            .value_parser(value_parser!(u32))
            .help("Window end (bp, inclusive)"),
    ]
}

pub fn create_chromosomes_cli() -> Command {
    Command::new(CHROMOSOMES_CMD).about("List chromosomes in natural order")
}

pub fn create_coverage_cli() -> Command {
    Command::new(COVERAGE_CMD)
        .about("Show the spans with interaction data for a cell line and chromosome")
        .arg(cell_line_arg())
        .arg(chr_arg())
        .arg(
            Arg::new("merged")
                .long("merged")
                .action(ArgAction::SetTrue)
                .help("Collapse overlapping spans"),
        )
}

pub fn create_interactions_cli() -> Command {
    Command::new(INTERACTIONS_CMD)
        .about("Print interactions whose anchors fall in a window, as JSON")
        .arg(cell_line_arg())
        .arg(chr_arg())
        .args(window_args())
        .arg(
            Arg::new("alpha")
                .long("alpha")
                .value_parser(value_parser!(f64))
                .help("Keep only interactions with fdr below this threshold"),
        )
        .arg(
            Arg::new("either")
                .long("either")
                .action(ArgAction::SetTrue)
                .help("Match when either anchor is in the window"),
        )
}
