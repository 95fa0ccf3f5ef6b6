use clap::Parser;
use env_logger::Env;
use shell_walk::cli::{read_input, run, CliOptions, OutputFormat};
use shell_walk::handlers::RenameRule;

#[derive(Parser)]
#[command(name = "shell-walk")]
#[command(about = "Walk, inspect and rewrite serialized shell syntax trees")]
#[command(version)]
struct Cli {
    /// Rename a variable everywhere it is named
    #[arg(long = "rename", value_name = "OLD=NEW")]
    rename: Option<RenameRule>,

    /// Print an indented outline of the tree to stderr
    #[arg(long = "outline")]
    outline: bool,

    /// Limit the outline to N levels below the root
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    /// Print node counts per kind to stderr
    #[arg(long = "stats")]
    stats: bool,

    /// Also walk the parts inside words for --stats
    #[arg(long = "words")]
    words: bool,

    /// Output format for the tree
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print a unified diff of input and output instead of the tree
    #[arg(long = "diff")]
    diff: bool,

    /// Log walker activity
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// JSON tree file to read
    #[arg()]
    tree_file: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    // Determine tree source: file or stdin
    if cli.tree_file.is_none() {
        use std::io::IsTerminal;
        if std::io::stdin().is_terminal() {
            eprintln!("Error: No tree provided. Give a tree file or pipe JSON via stdin.");
            std::process::exit(1);
        }
    }
    let input = match read_input(cli.tree_file.as_deref(), std::io::stdin().lock()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let options = CliOptions {
        rename: cli.rename,
        outline: cli.outline,
        max_depth: cli.max_depth,
        stats: cli.stats,
        words: cli.words,
        format: cli.format,
        diff: cli.diff,
    };

    let report = match run(&input, &options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(outline) = &report.outline {
        eprint!("{}", outline);
    }
    if let Some(stats) = &report.stats {
        eprint!("{}", stats);
    }
    match &report.diff {
        Some(diff) => print!("{}", diff),
        None => print!("{}", report.tree),
    }
}
