//! countryclean CLI - survey country cleanup tool
//!
//! Reads a JSON export of survey records, reconciles each record's country
//! code and name, and writes the cleaned records next to the input.

mod document;

use clap::{Parser, Subcommand};
use colored::*;
use countryclean::{
    AliasTable, BatchCleaner, CleanOptions, CleanedBatch, CountryReference, CustomTable,
    Reconciler, ReconciliationStats, ReferenceSource,
};
use document::Document;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

/// Country code and name cleanup for survey exports
#[derive(Parser)]
#[command(
    name = "countryclean",
    version,
    about = "Canonicalize country codes and names in survey records",
    long_about = "countryclean - reconciles country codes and names in JSON survey exports.\n\n\
                  Usage:\n  \
                  countryclean <file>                 Clean to <file>.cleaned.json\n  \
                  countryclean clean <file> -o <out>  Clean to a specific file\n  \
                  countryclean lookup --name Burma    Reconcile a single value"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (for default cleaning)
    input: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use the built-in table of major countries instead of full locale data
    #[arg(long, global = true)]
    fallback_reference: bool,

    /// Load reference names from a JSON object of code -> name
    #[arg(long, global = true, value_name = "FILE")]
    reference: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a JSON file of records (default command)
    Clean(CleanArgs),

    /// Reconcile a single code/name pair
    Lookup {
        /// Raw country code
        #[arg(long)]
        code: Option<String>,

        /// Raw country name
        #[arg(long)]
        name: Option<String>,
    },

    /// List the reference table
    Reference {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct CleanArgs {
    /// Input file path
    input: PathBuf,

    /// Output file path (default: <input>.cleaned.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Key holding the record array when the input is an object
    #[arg(long, default_value = "chingus")]
    key: String,

    /// Field holding the country code
    #[arg(long, default_value = countryclean::record::DEFAULT_CODE_FIELD)]
    code_field: String,

    /// Field holding the country name
    #[arg(long, default_value = countryclean::record::DEFAULT_NAME_FIELD)]
    name_field: String,

    /// Clean in parallel chunks
    #[arg(long)]
    parallel: bool,

    /// Print statistics as JSON instead of the summary
    #[arg(long)]
    stats_json: bool,

    /// Print per-field null counts
    #[arg(long)]
    null_report: bool,

    /// Output compact JSON (no indentation)
    #[arg(long)]
    compact: bool,
}

impl CleanArgs {
    fn with_input(input: PathBuf) -> Self {
        Self {
            input,
            output: None,
            key: "chingus".to_string(),
            code_field: countryclean::record::DEFAULT_CODE_FIELD.to_string(),
            name_field: countryclean::record::DEFAULT_NAME_FIELD.to_string(),
            parallel: false,
            stats_json: false,
            null_report: false,
            compact: false,
        }
    }

    fn options(&self) -> countryclean::Result<CleanOptions> {
        let options = CleanOptions::new().with_fields(&self.code_field, &self.name_field)?;
        Ok(if self.parallel {
            options.parallel()
        } else {
            options
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "countryclean=info,warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let reference = load_reference(cli.fallback_reference, cli.reference.as_deref())?;
    let aliases = AliasTable::builtin();

    let command = match (cli.command, cli.input) {
        (Some(command), _) => command,
        (None, Some(input)) => Commands::Clean(CleanArgs::with_input(input)),
        (None, None) => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    match command {
        Commands::Clean(args) => run_clean(&args, &reference, &aliases)?,

        Commands::Lookup { code, name } => {
            let reconciler = Reconciler::new(&reference, &aliases);
            let resolution = name.as_deref().map(|n| reconciler.resolve_name(n));

            let mut stats = ReconciliationStats::new();
            let (code_out, name_out) =
                reconciler.reconcile(code.as_deref(), name.as_deref(), &mut stats);

            println!("{}: {}", "Code".bold(), code_out.as_deref().unwrap_or("null"));
            println!("{}: {}", "Name".bold(), name_out.as_deref().unwrap_or("null"));
            if let Some(resolution) = resolution {
                println!("{}: {:?}", "Name match".bold(), resolution.via);
            }
            print_corrections(&stats);
        }

        Commands::Reference { json } => {
            if json {
                let table: serde_json::Map<String, serde_json::Value> = reference
                    .iter()
                    .map(|(code, name)| (code.to_string(), name.into()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                println!(
                    "{} ({} codes, {} source)",
                    "Country Reference".cyan().bold(),
                    reference.len(),
                    reference.source()
                );
                println!("{}", "─".repeat(40));
                for (code, name) in reference.iter() {
                    println!("  {}  {}", code.bold(), name);
                }
            }
        }
    }

    Ok(())
}

fn load_reference(
    fallback: bool,
    custom: Option<&Path>,
) -> Result<CountryReference, Box<dyn std::error::Error>> {
    let reference = match custom {
        Some(path) => {
            let table = CustomTable::from_json_str(&fs::read_to_string(path)?)?;
            CountryReference::build_with(&table)
        }
        None if fallback => CountryReference::fallback(),
        None => CountryReference::build(),
    };

    if reference.source() == ReferenceSource::Fallback && !fallback {
        tracing::warn!(codes = reference.len(), "using fallback country reference");
    }
    Ok(reference)
}

fn run_clean(
    args: &CleanArgs,
    reference: &CountryReference,
    aliases: &AliasTable,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options()?;
    let pb = create_spinner("Reading records...");

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let document = Document::parse(&fs::read_to_string(&args.input)?, &args.key)?;
    tracing::info!(records = document.records.len(), input = %args.input.display(), "loaded records");

    pb.set_message(format!("Cleaning {} records...", document.records.len()));
    let batch = BatchCleaner::new(reference, aliases)
        .with_options(options)
        .clean_batch(&document.records);

    pb.set_message("Writing output...");
    let null_counts = args.null_report.then(|| batch.null_counts());
    let CleanedBatch { records, stats } = batch;
    let json = document.render(&records, args.compact)?;
    fs::write(&output, json)?;

    pb.finish_and_clear();

    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary(&stats, &output);
    }

    if let Some(counts) = null_counts {
        print_null_report(&counts, records.len());
    }

    Ok(())
}

/// `data.json` -> `data.cleaned.json`
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    input.with_file_name(format!("{}.cleaned.json", stem))
}

fn print_summary(stats: &ReconciliationStats, output: &Path) {
    println!("{}", "Country Cleaning Summary".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Total".bold(), stats.total);
    print_corrections(stats);
    println!("\n{} Cleaned data saved to {}", "✓".green().bold(), output.display());
}

fn print_corrections(stats: &ReconciliationStats) {
    let rows = [
        ("Inferred code from name", stats.code_inferred_from_name),
        ("Inferred name from code", stats.name_inferred_from_code),
        ("Corrected name to canonical", stats.name_corrected_to_canonical),
        ("Alias names resolved", stats.alias_name_resolved),
        ("3-letter -> 2-letter normalized", stats.three_letter_normalized),
        ("Invalid codes nullified", stats.invalid_code_nullified),
    ];
    for (label, count) in rows {
        if count > 0 {
            println!("{}: {}", label.bold(), count.to_string().yellow());
        } else {
            println!("{}: {}", label.bold(), count);
        }
    }
}

fn print_null_report(counts: &[(String, usize)], total: usize) {
    println!("\n{}", "Null Counts by Field".cyan().bold());
    println!("{}", "─".repeat(40));
    for (field, count) in counts {
        let percentage = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        println!("{}: {} ({:.2}%)", field.bold(), count, percentage);
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
