//! SDAM CLI binary.
//!
//! Runs the collection pipeline stage by stage or end to end.

mod logging;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use sdam::schema::{
    CODE_COLUMNS, CORP_NAME, FINANCE_TABLE, NCAV_TABLE, PRICE_ANNOTATED_TABLE, SCREEN_TABLE,
};
use sdam::{Pipeline, PriceAnnotator, SdamConfig};
use sdam_data::FetchTally;
use sdam_data::dart::{DocType, FiscalPeriod};
use sdam_indicators::{available_indicators, build_indicator, screen_ncav};
use sdam_output::{export_table, import_table};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;

/// Environment variable consulted when no key is configured.
const API_KEY_ENV: &str = "DART_API_KEY";

#[derive(Parser)]
#[command(name = "sdam")]
#[command(about = "SDAM: DART statements and Naver prices joined into an NCAV table", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./config.yaml, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Open DART API key, overriding the configuration
    #[arg(long, global = true)]
    key: Option<String>,

    /// Directory receiving tables and reports
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Write DEBUG logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct PeriodArgs {
    /// Business year
    #[arg(long)]
    year: i32,

    /// Fiscal quarter (1-4)
    #[arg(long, default_value = "1")]
    quarter: u8,

    /// Statement document (CFS or IS)
    #[arg(long, default_value = "CFS")]
    doc_type: DocType,
}

impl PeriodArgs {
    fn period(self) -> sdam_data::Result<FiscalPeriod> {
        FiscalPeriod::new(self.year, self.quarter)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Collect statements and share counts into the finance table
    Collect {
        #[command(flatten)]
        period: PeriodArgs,

        /// Output file (default: <output-dir>/finance_table.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Append current prices to a finance table
    Annotate {
        /// Input table (default: <output-dir>/finance_table.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (default: <output-dir>/price_annotated_table.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compute indicators on a price-annotated table
    Indicate {
        /// Input table (default: <output-dir>/price_annotated_table.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (default: <output-dir>/ncav_table.csv)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Indicators to apply, comma separated
        #[arg(long, value_delimiter = ',', default_value = "ncav")]
        indicators: Vec<String>,
    },

    /// Rank companies trading below their NCAV
    Screen {
        /// Input table (default: <output-dir>/ncav_table.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (default: <output-dir>/ncav_screen.csv)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Minimum NCAV_SHARE kept
        #[arg(long)]
        min_ratio: Option<f64>,

        /// Keep at most this many companies
        #[arg(long)]
        top: Option<usize>,
    },

    /// Run collect, annotate and indicate in one go
    Run {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show the DART directory entry of a company
    Lookup {
        /// Company name as registered with DART
        name: String,
    },

    /// List available indicators
    Indicators,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    if matches!(cli.command, Commands::Indicators) {
        list_indicators();
        return Ok(());
    }

    let config = load_config(&cli)?;
    match cli.command {
        Commands::Collect { period, output } => {
            collect(config, period, output).await?;
        }
        Commands::Annotate { input, output } => {
            annotate(&config, input, output).await?;
        }
        Commands::Indicate {
            input,
            output,
            indicators,
        } => {
            indicate(&config, input, output, &indicators)?;
        }
        Commands::Screen {
            input,
            output,
            min_ratio,
            top,
        } => {
            screen(&config, input, output, min_ratio, top)?;
        }
        Commands::Run { period } => {
            let pipeline = Pipeline::new(config)?;
            let report = pipeline.run(period.period()?, period.doc_type).await?;
            println!("{}", report.to_ascii_table());
        }
        Commands::Lookup { name } => {
            lookup(&config, &name).await?;
        }
        Commands::Indicators => list_indicators(),
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<SdamConfig, Box<dyn std::error::Error>> {
    let mut config = SdamConfig::discover(cli.config.as_deref())?;
    if let Some(key) = &cli.key {
        config = config.with_api_key(key.clone());
    } else if config.dart.api_key.is_empty()
        && let Ok(key) = std::env::var(API_KEY_ENV)
    {
        config = config.with_api_key(key);
    }
    if let Some(dir) = &cli.output_dir {
        config = config.with_output_dir(dir.clone());
    }
    Ok(config)
}

fn progress_bar(len: usize, message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

fn print_tally(stage: &str, tally: FetchTally) {
    println!(
        "  {:<12} found {:>5}  no data {:>5}  failed {:>5}",
        stage, tally.found, tally.no_data, tally.failed
    );
}

fn read_table(path: &Path) -> Result<DataFrame, Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("Input table not found: {}", path.display()).into());
    }
    let mut text_columns = vec![CORP_NAME];
    text_columns.extend(CODE_COLUMNS);
    Ok(import_table(path, &text_columns)?)
}

async fn collect(
    config: SdamConfig,
    period: PeriodArgs,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let fiscal_period = period.period()?;
    let pipeline = Pipeline::new(config)?;
    let registry = pipeline.registry().await?;
    println!("Resolved {} listed companies", registry.len());

    let pb = progress_bar(registry.len(), "Collecting statements...")?;
    let collected = match pipeline
        .collect(&registry, fiscal_period, period.doc_type, Some(&pb))
        .await
    {
        Ok(collected) => {
            pb.finish_with_message(format!("Collected {} companies", collected.table.height()));
            collected
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let path = output.unwrap_or_else(|| pipeline.config().output_path(FINANCE_TABLE));
    let mut table = collected.table;
    export_table(&mut table, &path)?;

    println!("\n{} {}:", fiscal_period, period.doc_type);
    print_tally("statements", collected.statements);
    print_tally("shares", collected.shares);
    println!("Wrote {}", path.display());
    Ok(())
}

async fn annotate(
    config: &SdamConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = input.unwrap_or_else(|| config.output_path(FINANCE_TABLE));
    let table = read_table(&input)?;
    let scraper = config.price_scraper()?;

    let pb = progress_bar(table.height(), "Fetching prices...")?;
    let annotated = PriceAnnotator::new(&scraper)
        .with_concurrency(config.concurrency)
        .with_progress(&pb)
        .annotate(table)
        .await;
    let annotated = match annotated {
        Ok(annotated) => {
            pb.finish_with_message(format!("Priced {} companies", annotated.prices.found));
            annotated
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let path = output.unwrap_or_else(|| config.output_path(PRICE_ANNOTATED_TABLE));
    let mut table = annotated.table;
    export_table(&mut table, &path)?;

    print_tally("prices", annotated.prices);
    println!("Wrote {}", path.display());
    Ok(())
}

fn indicate(
    config: &SdamConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    indicators: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let input = input.unwrap_or_else(|| config.output_path(PRICE_ANNOTATED_TABLE));
    let mut table = read_table(&input)?;

    for name in indicators {
        let indicator = build_indicator(name, config.indicators.enterprise_value)?;
        table = indicator.apply(table)?;
        println!("Applied {}", indicator.name());
    }

    let path = output.unwrap_or_else(|| config.output_path(NCAV_TABLE));
    export_table(&mut table, &path)?;
    info!(rows = table.height(), path = %path.display(), "indicators written");
    println!("Wrote {}", path.display());
    Ok(())
}

fn screen(
    config: &SdamConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    min_ratio: Option<f64>,
    top: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = input.unwrap_or_else(|| config.output_path(NCAV_TABLE));
    let table = read_table(&input)?;

    let mut settings = config.indicators.screen;
    if let Some(min_ratio) = min_ratio {
        settings.min_ratio = min_ratio;
    }
    if top.is_some() {
        settings.top = top;
    }

    let mut screened = screen_ncav(&table, settings)?;
    println!(
        "{} of {} companies at NCAV_SHARE >= {}",
        screened.height(),
        table.height(),
        settings.min_ratio
    );
    println!("{}", screened);

    let path = output.unwrap_or_else(|| config.output_path(SCREEN_TABLE));
    export_table(&mut screened, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn lookup(config: &SdamConfig, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = config.dart_client()?;
    let directory = client.fetch_corp_directory().await?;
    let entry = directory.require_by_name(name)?;

    println!("{}", entry.corp_name);
    println!("  DART code:  {}", entry.corp_code);
    if entry.is_listed() {
        println!("  Stock code: {}", entry.stock_code);
    } else {
        println!("  Stock code: (unlisted)");
    }
    println!("  Modified:   {}", entry.modify_date);
    Ok(())
}

fn list_indicators() {
    println!("Available indicators:");
    println!("=====================\n");

    for info in available_indicators() {
        println!("{:<18} {}", info.name, info.description);
        println!("{:<18} requires: {}", "", info.required_columns.join(", "));
        println!("{:<18} produces: {}", "", info.output_columns.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_collect() {
        let cli = Cli::try_parse_from([
            "sdam", "collect", "--year", "2022", "--quarter", "3", "--doc-type", "is",
        ])
        .unwrap();
        let Commands::Collect { period, output } = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(period.year, 2022);
        assert_eq!(period.doc_type, DocType::Is);
        assert!(output.is_none());
        assert_eq!(period.period().unwrap().to_string(), "2022Q3");
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sdam", "run", "--year", "2021", "--key", "abc", "--output-dir", "out",
        ])
        .unwrap();
        assert_eq!(cli.key.as_deref(), Some("abc"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_parse_indicator_list() {
        let cli =
            Cli::try_parse_from(["sdam", "indicate", "--indicators", "ncav,enterprise_value"])
                .unwrap();
        let Commands::Indicate { indicators, .. } = cli.command else {
            panic!("expected indicate");
        };
        assert_eq!(indicators, vec!["ncav", "enterprise_value"]);
    }

    #[test]
    fn test_rejects_unknown_doc_type() {
        assert!(Cli::try_parse_from(["sdam", "collect", "--year", "2022", "--doc-type", "XYZ"]).is_err());
    }
}
