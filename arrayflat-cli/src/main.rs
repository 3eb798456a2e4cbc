use std::path::PathBuf;

use arrayflat::{ExistingEntries, Mode, ResourceTree, Settings, run};
use arrayflat_cli::{
    summary::{print_summary, write_report_json},
    validation::{parse_mode, validate_file_name, validate_input_dir},
};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// What to do: extract-base, extract-translations, relocate or backfill
    #[arg(value_parser = parse_mode)]
    mode: Mode,

    /// The res/ directory holding values/ and values-<lang>/
    #[arg(short, long)]
    input: PathBuf,

    /// Where rewritten documents go; mirrors the input layout
    #[arg(short, long, default_value = "./out")]
    output: PathBuf,

    /// Document holding the string-array declarations
    #[arg(long, default_value = "11-arrays.xml")]
    arrays_file: String,

    /// Document the arrays are moved to in relocate mode
    #[arg(long, default_value = "constants.xml")]
    constants_file: String,

    /// Extra values-* directory to skip during language discovery (repeatable)
    #[arg(long, value_name = "DIR")]
    exclude: Vec<String>,

    /// Append entries even when one with the same name already exists
    #[arg(long)]
    allow_duplicates: bool,

    /// Report what would be written without touching the output directory
    #[arg(long)]
    dry_run: bool,

    /// Also write the run report as JSON to this path
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let checks = validate_input_dir(&args.input)
        .and_then(|_| validate_file_name(&args.arrays_file))
        .and_then(|_| validate_file_name(&args.constants_file));
    if let Err(e) = checks {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!(mode = %args.mode, input = %args.input.display(), "starting");
    let tree = args
        .exclude
        .iter()
        .fold(ResourceTree::new(&args.input, &args.output), |tree, dir| {
            tree.with_excluded(dir.as_str())
        })
        .with_dry_run(args.dry_run);
    let settings = Settings {
        arrays_file: args.arrays_file,
        constants_file: args.constants_file,
        existing: if args.allow_duplicates {
            ExistingEntries::Duplicate
        } else {
            ExistingEntries::Skip
        },
    };

    let report = match run(args.mode, &tree, &settings) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_summary(&report, tree.is_dry_run());
    if let Some(path) = &args.report_json {
        if let Err(e) = write_report_json(&report, path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
