use std::path::PathBuf;

use clap::{Parser, Subcommand};
use suivi_tools::dates::DateParser;
use suivi_tools::normalize::NormalizeOptions;
use suivi_tools::pipeline;
use suivi_tools::roster::Roster;
use suivi_tools::status::StatusMapper;
use suivi_tools::{Result, ToolError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = init_logging() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Normalize(args) => execute_normalize(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_normalize(args: NormalizeArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| pipeline::default_output_path(&args.input));

    let options = NormalizeOptions {
        roster: load_roster(args.roster.as_ref())?,
        dates: args
            .reference_year
            .map(DateParser::with_reference_year)
            .unwrap_or_default(),
        statuses: args.canonical_status.then(StatusMapper::default),
    };

    let report = pipeline::normalize_file(&args.input, &output, &options)?;
    if let Some(report_path) = &args.report {
        pipeline::write_report(report_path, &report)?;
    }

    println!("{}", output.display());
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    let roster = load_roster(args.roster.as_ref())?;
    let summary = pipeline::inspect_file(&args.input, &roster)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let layout = if summary.normalized { "normalised" } else { "legacy" };
    println!("layout: {layout}");
    for sheet in &summary.sheets {
        println!("{:<24} {:>6} rows  {:?}", sheet.name, sheet.rows, sheet.kind);
    }
    Ok(())
}

fn load_roster(path: Option<&PathBuf>) -> Result<Roster> {
    match path {
        Some(path) => Roster::from_json_file(path),
        None => Ok(Roster::default()),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalise the designers' tracking workbook into four clean tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a tracking workbook into the normalised layout.
    Normalize(NormalizeArgs),
    /// List the sheets of a workbook and how they would be read.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct NormalizeArgs {
    /// Source tracking workbook (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Output workbook path. Defaults to `<input>_NORMALISE.xlsx`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON roster overriding the built-in designer list and initials.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Write per-sheet row counts to this JSON file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Year assumed for dates written as `DD/MM`. Defaults to the current year.
    #[arg(long)]
    reference_year: Option<i32>,

    /// Map free-text statuses onto the canonical status labels.
    #[arg(long)]
    canonical_status: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Workbook to inspect.
    #[arg(long)]
    input: PathBuf,

    /// JSON roster used to recognise designer sheets.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}
