//! Disposable-income engine command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate one household described in a JSON file
//! revdisp evaluate --household household.json --year 2024
//!
//! # Print 20 generated households
//! revdisp generate --count 20 --seed 7
//!
//! # Record reference results for 1000 generated households
//! revdisp record --count 1000 --year 2024 --output reference.json
//!
//! # Compare the engine against a recording
//! revdisp compare --reference reference.json
//! ```

mod config;
mod logging;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use revdisp_core::{
    BatchReport, CaseSpace, DifferentialValidator, DisposableIncomeResult, Household, Orchestrator,
    ParameterStore, TestCaseGenerator,
};
use revdisp_data::{ParameterTableLoader, RecordedOracle, Recording, builtin_store};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "revdisp")]
#[command(version, about = "Quebec and federal disposable income engine", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of parameter table CSV files (built-in tables when omitted)
    #[arg(short, long, global = true)]
    tables: Option<PathBuf>,

    /// Log level or filter directive, overridden by RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one household
    Evaluate {
        /// JSON file describing the household
        #[arg(long)]
        household: PathBuf,

        /// Tax year
        #[arg(short, long)]
        year: Option<i32>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print generated households as JSON
    Generate {
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Evaluate generated households and save the results as a recording
    Record {
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(short, long)]
        year: Option<i32>,

        /// Recording file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compare the engine against a recording
    Compare {
        /// Recording file to replay
        #[arg(short, long)]
        reference: PathBuf,

        /// Tax year (defaults to the recording's year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "configuration resolved");

    let engine = build_engine(config.tables.as_deref())?;

    match cli.command {
        Command::Evaluate {
            household,
            year,
            json,
        } => evaluate(&engine, &household, year.unwrap_or(config.year), json),
        Command::Generate { count, seed } => generate(
            seed.unwrap_or(config.seed),
            count.unwrap_or(config.count),
        ),
        Command::Record {
            count,
            seed,
            year,
            output,
        } => record(
            &engine,
            seed.unwrap_or(config.seed),
            count.unwrap_or(config.count),
            year.unwrap_or(config.year),
            &output,
        ),
        Command::Compare { reference, year } => compare(&engine, &reference, year, config.tolerance),
    }
}

/// Loads the configuration file and applies the global flags on top.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(tables) = &cli.tables {
        config.tables = Some(tables.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn build_engine(tables: Option<&Path>) -> Result<Orchestrator> {
    let store = match tables {
        Some(dir) => {
            let source = ParameterTableLoader::load_dir(dir)
                .with_context(|| format!("Failed to load parameter tables from {}", dir.display()))?;
            ParameterStore::new(source)
        }
        None => builtin_store().context("Failed to load built-in parameter tables")?,
    };

    let engine = Orchestrator::with_standard_programs(Arc::new(store))?;
    let years = engine.supported_years();
    for year in &years {
        engine
            .check_year(*year)
            .with_context(|| format!("Parameter tables for {year} are incomplete"))?;
    }
    info!(?years, programs = engine.evaluation_order().len(), "engine ready");
    Ok(engine)
}

// --- Commands ---

fn evaluate(
    engine: &Orchestrator,
    path: &Path,
    year: i32,
    json: bool,
) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open household: {}", path.display()))?;
    let household: Household = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse household: {}", path.display()))?;

    let result = engine.evaluate(&household, year)?;

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &result)?;
        writeln!(stdout)?;
    } else {
        write_summary(&mut stdout, &result)?;
    }
    Ok(())
}

fn generate(
    seed: u64,
    count: usize,
) -> Result<()> {
    let generator = TestCaseGenerator::new(seed, CaseSpace::default())?;
    let households: Vec<Household> = generator.generate(count).collect();

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &households)?;
    writeln!(stdout)?;
    Ok(())
}

fn record(
    engine: &Orchestrator,
    seed: u64,
    count: usize,
    year: i32,
    output: &Path,
) -> Result<()> {
    let generator = TestCaseGenerator::new(seed, CaseSpace::default())?;
    let households: Vec<Household> = generator.generate(count).collect();

    let recording = Recording::record(engine, &households, year)?;
    recording
        .save(output)
        .with_context(|| format!("Failed to write recording: {}", output.display()))?;

    println!("Recorded {} households for {year} to {}", recording.cases.len(), output.display());
    Ok(())
}

fn compare(
    engine: &Orchestrator,
    reference: &Path,
    year: Option<i32>,
    tolerance: Decimal,
) -> Result<()> {
    let recording = Recording::load(reference)
        .with_context(|| format!("Failed to read recording: {}", reference.display()))?;
    let year = year.unwrap_or(recording.year);
    let households = recording.households();
    let oracle = RecordedOracle::new(recording)?;

    let validator = DifferentialValidator::new(engine, &oracle).with_tolerance(tolerance);
    let batch = validator.compare_batch(&households, year, None);

    let mut stdout = io::stdout().lock();
    write_batch(&mut stdout, &batch)?;

    if !batch.is_clean() {
        bail!(
            "{} of {} households disagree with the reference",
            households.len() - batch.passed(),
            households.len()
        );
    }
    Ok(())
}

// --- Output ---

fn write_summary<W: Write>(
    out: &mut W,
    result: &DisposableIncomeResult,
) -> io::Result<()> {
    writeln!(out, "Household {} ({})", result.household, result.year)?;
    writeln!(out, "{:<32} {:>12} {:>12} {:>12}", "program", "adult 1", "adult 2", "total")?;
    for program_result in result.programs.values() {
        writeln!(
            out,
            "{:<32} {:>12} {:>12} {:>12}",
            program_result.program.as_str(),
            program_result.split.adult1,
            program_result.split.adult2,
            program_result.total
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{:<32} {:>12}", "gross income", result.gross_income)?;
    writeln!(out, "{:<32} {:>12}", "quebec net", result.quebec.net())?;
    writeln!(out, "{:<32} {:>12}", "federal net", result.federal.net())?;
    writeln!(out, "{:<32} {:>12}", "contributions", result.contributions)?;
    writeln!(out, "{:<32} {:>12}", "disposable income", result.disposable_income)
}

fn write_batch<W: Write>(
    out: &mut W,
    batch: &BatchReport,
) -> io::Result<()> {
    for report in batch.failures() {
        writeln!(out, "{} ({})", report.household, report.year)?;
        for mismatch in &report.mismatches {
            writeln!(
                out,
                "  {:<28} engine {:>12}  reference {:>12}  diff {:>10}",
                mismatch.field, mismatch.engine, mismatch.oracle, mismatch.difference
            )?;
        }
    }
    for err in &batch.errors {
        writeln!(out, "error: {err}")?;
    }

    writeln!(
        out,
        "{} passed, {} with mismatches ({} fields), {} errors{}",
        batch.passed(),
        batch.failures().count(),
        batch.mismatch_count(),
        batch.errors.len(),
        if batch.cancelled { ", cancelled" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use revdisp_core::{Adult, HouseholdType};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config_file_values() {
        let cli = Cli::parse_from([
            "revdisp",
            "--tables",
            "custom",
            "--log-level",
            "debug",
            "generate",
            "--count",
            "3",
        ]);

        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.tables, Some(PathBuf::from("custom")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.seed, AppConfig::default().seed);
    }

    #[test]
    fn summary_lists_programs_and_totals() {
        let engine = build_engine(None).unwrap();
        let household = Household::new(HouseholdType::Single, Adult::worker(30, dec!(30000)), None)
            .with_id("single-30k");
        let result = engine.evaluate(&household, 2024).unwrap();

        let mut out = Vec::new();
        write_summary(&mut out, &result).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Household single-30k (2024)"));
        assert!(text.contains("quebec_income_tax"));
        assert!(text.contains(&format!("{:<32} {:>12}", "disposable income", result.disposable_income)));
    }

    #[test]
    fn batch_summary_counts_outcomes() {
        let batch = BatchReport::default();

        let mut out = Vec::new();
        write_batch(&mut out, &batch).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 passed, 0 with mismatches (0 fields), 0 errors\n"
        );
    }
}
