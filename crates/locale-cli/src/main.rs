//! Locale CLI
//!
//! Command-line tool for expanding translation files into locale variants
//! and validating that every translation file still parses.

use clap::{Args, Parser, Subcommand};
use locale_core::{
    validate_directories, BatchProcessor, BatchSummary, FileStats, ProjectConfig, VariationTable,
    CONFIG_FILE_NAME,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "locale-cli")]
#[command(about = "Translation variant expander and validator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// Project config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directories (replaces the configured list)
    #[arg(short, long)]
    dir: Vec<PathBuf>,

    /// Variation table file
    #[arg(long)]
    variations: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate missing locale variants in every translation file
    Expand {
        /// Expand only this file instead of the configured directories
        file: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,

        /// Do not copy new base fields onto existing variants
        #[arg(long)]
        no_backfill: bool,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that every translation file parses
    Validate {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the variation table
    ShowVariations {
        #[command(flatten)]
        overrides: Overrides,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a config file template
    InitConfig {
        /// Output path for the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Content directories to include
        #[arg(short, long)]
        dir: Vec<PathBuf>,

        /// Variation table file
        #[arg(long)]
        variations: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            let remedies = e.remedies();
            if !remedies.is_empty() {
                eprintln!();
                eprintln!("Suggestions:");
                for remedy in remedies {
                    eprintln!("  - {}", remedy);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "locale_core=debug,locale_cli=debug"
    } else {
        "locale_core=info,locale_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when the command ran but found problems
fn run(cli: Cli) -> locale_core::Result<bool> {
    match cli.command {
        Commands::Expand {
            file,
            overrides,
            no_backfill,
            dry_run,
        } => cmd_expand(file.as_deref(), &overrides, no_backfill, dry_run),
        Commands::Validate { overrides } => cmd_validate(&overrides),
        Commands::ShowVariations { overrides, json } => cmd_show_variations(&overrides, json),
        Commands::InitConfig {
            output,
            dir,
            variations,
        } => cmd_init_config(&output, dir, variations),
    }
}

/// Load the project config and apply command-line overrides
fn resolve_config(overrides: &Overrides) -> locale_core::Result<ProjectConfig> {
    let mut config = match &overrides.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::load_or_default(CONFIG_FILE_NAME)?,
    };

    if !overrides.dir.is_empty() {
        config.directories = overrides.dir.clone();
    }
    if let Some(variations) = &overrides.variations {
        config.variations = variations.clone();
    }

    debug!("using config {:?}", config);
    Ok(config)
}

fn cmd_expand(
    file: Option<&Path>,
    overrides: &Overrides,
    no_backfill: bool,
    dry_run: bool,
) -> locale_core::Result<bool> {
    let mut config = resolve_config(overrides)?;
    if no_backfill {
        config.backfill = false;
    }

    let table = VariationTable::load(&config.variations)?;
    info!(
        "loaded {} variation families from {}",
        table.families().len(),
        config.variations.display()
    );

    let processor = BatchProcessor::new(&table)
        .with_options(config.expand_options())
        .with_filter(config.filter())
        .dry_run(dry_run);

    let summary = match file {
        Some(path) => BatchSummary {
            files: vec![processor.process_file(path)?],
        },
        None => processor.process_directories(&config.directories)?,
    };

    print_summary(&summary, dry_run);
    Ok(true)
}

fn print_summary(summary: &BatchSummary, dry_run: bool) {
    if dry_run {
        println!("Dry run, no files written.");
    }
    println!("Processed {} file(s):", summary.file_count());
    for stats in &summary.files {
        println!("  {}", format_stats(stats));
    }
    println!();
    println!(
        "Total: {} -> {} records (+{}), {} field(s) back-filled, {} file(s) written",
        summary.total_original(),
        summary.total_expanded(),
        summary.total_added(),
        summary.total_backfilled(),
        summary.files_written()
    );
}

fn format_stats(stats: &FileStats) -> String {
    let mut line = format!(
        "{}: {} -> {} (+{})",
        stats.file.display(),
        stats.original_count,
        stats.expanded_count,
        stats.added_count
    );
    if stats.backfilled_count > 0 {
        line.push_str(&format!(", {} field(s) back-filled", stats.backfilled_count));
    }
    line
}

fn cmd_validate(overrides: &Overrides) -> locale_core::Result<bool> {
    let config = resolve_config(overrides)?;
    let report = validate_directories(&config.directories, &config.filter())?;

    for result in &report.results {
        let status = if result.valid { "ok" } else { "INVALID" };
        println!("  [{}] {}", status, result.file.display());
    }
    println!();

    if report.is_valid() {
        println!("All {} file(s) are valid.", report.results.len());
        return Ok(true);
    }

    println!(
        "{} of {} file(s) are invalid:",
        report.invalid_count(),
        report.results.len()
    );
    for result in report.invalid() {
        println!();
        println!("{}", result.file.display());
        if let Some(error) = &result.error {
            println!("{}", error);
        }
    }
    Ok(false)
}

fn cmd_show_variations(overrides: &Overrides, json: bool) -> locale_core::Result<bool> {
    let config = resolve_config(overrides)?;
    let table = VariationTable::load(&config.variations)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(true);
    }

    println!("Families ({}):", table.families().len());
    for family in table.families() {
        println!("  {}: {}", family.name, family.variants.join(", "));
    }
    Ok(true)
}

fn cmd_init_config(
    output: &Path,
    dirs: Vec<PathBuf>,
    variations: Option<PathBuf>,
) -> locale_core::Result<bool> {
    let mut config = ProjectConfig::default();
    if !dirs.is_empty() {
        config.directories = dirs;
    }
    if let Some(variations) = variations {
        config.variations = variations;
    }

    config.save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to configure your content directories, then run:");
    println!("  locale-cli expand --config {}", output.display());

    Ok(true)
}
