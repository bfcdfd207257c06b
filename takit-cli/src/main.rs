//! takit CLI — compute technical-analysis indicators over OHLCV data.
//!
//! Commands:
//! - `ta` — compute indicators and print (or write) the output table
//! - `list` — show registered indicators, aliases and default lengths

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use takit_core::comparison::{ComparisonHarness, CsvReference, NaiveReference};
use takit_core::config::TakitConfig;
use takit_core::data::{fetch_data, DataSource, Interval};
use takit_core::{
    analyze, filter_trigger_rows, registry_lookup, AnalyzeOptions, Frame, IndicatorRegistry,
    IndicatorSpec,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "takit.toml";

#[derive(Parser)]
#[command(
    name = "takit",
    about = "takit — technical-analysis indicators over OHLCV data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators and print the output table.
    Ta(TaArgs),
    /// List registered indicators.
    List,
}

#[derive(clap::Args)]
struct TaArgs {
    /// Indicator names or aliases (e.g. rsi bb ma_cross). Defaults to the
    /// `[[indicator]]` entries of the config file.
    indicators: Vec<String>,

    /// Data source: csv or synthetic.
    #[arg(long)]
    source: Option<DataSource>,

    /// Ticker symbol. Defaults to BTCUSDT.
    #[arg(long)]
    ticker: Option<String>,

    /// Bar interval: 1m, 5m, 15m, 1h, 4h, 1d, 1w. Defaults to 1d.
    #[arg(long)]
    interval: Option<Interval>,

    /// Start date (YYYY-MM-DD). Defaults to 30 days ago.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to yesterday.
    #[arg(long)]
    end: Option<String>,

    /// Rows to print from the end; 0 prints everything. Defaults to 30.
    #[arg(long)]
    tail: Option<usize>,

    /// Composite indicators report only the bars where their state changed.
    #[arg(long, default_value_t = false)]
    only_trigger_rows: bool,

    /// Keep only the rows where this column changed value.
    #[arg(long)]
    trigger_column: Option<String>,

    /// Length applied to every indicator that takes one.
    #[arg(long)]
    length: Option<usize>,

    /// Append reference-implementation columns for comparison.
    #[arg(long, default_value_t = false)]
    compare: bool,

    /// CSV of reference columns exported by another tool (implies --compare).
    #[arg(long)]
    reference_csv: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the output to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to a TOML config file. Defaults to ./takit.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `{TICKER}_{interval}.csv` files.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ta(args) => run_ta(args),
        Commands::List => run_list(),
    }
}

fn load_config(path: Option<&Path>) -> Result<TakitConfig> {
    match path {
        Some(path) => TakitConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            debug!(path = DEFAULT_CONFIG, "using default config file");
            Ok(TakitConfig::from_file(Path::new(DEFAULT_CONFIG))?)
        }
        None => Ok(TakitConfig::default()),
    }
}

fn parse_date(raw: Option<&str>, flag: &str, default: NaiveDate) -> Result<NaiveDate> {
    raw.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("{flag} must be YYYY-MM-DD"))
        .map(|d| d.unwrap_or(default))
}

/// One spec per requested name, canonicalized through the registry.
fn build_specs(args: &TaArgs, config: &TakitConfig) -> Result<Vec<IndicatorSpec>> {
    let requested: Vec<IndicatorSpec> = if args.indicators.is_empty() {
        config.indicators.clone()
    } else {
        args.indicators.iter().map(IndicatorSpec::new).collect()
    };
    if requested.is_empty() {
        bail!("no indicators requested; name some (see `takit list`) or add [[indicator]] entries to the config");
    }

    requested
        .into_iter()
        .map(|mut spec| -> Result<IndicatorSpec> {
            let indicator = registry_lookup(&spec.name)?;
            spec.name = indicator.name().to_string();

            if spec.length.is_none() && indicator.default_length().is_some() {
                let names = std::iter::once(indicator.name()).chain(indicator.aliases().iter().copied());
                spec.length = args.length.or_else(|| config.length_for(names));
            } else if args.length.is_some() && indicator.default_length().is_none() {
                debug!(indicator = indicator.name(), "--length ignored, indicator takes no length");
            }

            if spec.name == "bb" {
                for key in ["include_width", "include_percentage"] {
                    spec.options.entry(key.to_string()).or_insert(true.into());
                }
            }
            Ok(spec)
        })
        .collect()
}

fn comparison_harness(args: &TaArgs) -> Result<Option<ComparisonHarness>> {
    if !args.compare && args.reference_csv.is_none() {
        return Ok(None);
    }
    let mut harness = ComparisonHarness::new().with_source(Box::new(NaiveReference));
    if let Some(path) = &args.reference_csv {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "reference".to_string());
        let reference = CsvReference::load(label, path)?;
        harness = harness.with_source(Box::new(reference));
    }
    Ok(Some(harness))
}

fn run_ta(args: TaArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let source = args.source.unwrap_or(config.data.source);
    let ticker = args.ticker.clone().unwrap_or_else(|| config.data.ticker.clone());
    let interval = args.interval.unwrap_or(config.data.interval);
    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data.data_dir.clone());
    let tail = args.tail.unwrap_or(config.output.tail);

    let today = chrono::Local::now().date_naive();
    let start = parse_date(args.start.as_deref(), "--start", today - chrono::Duration::days(30))?;
    let end = parse_date(args.end.as_deref(), "--end", today - chrono::Duration::days(1))?;

    let specs = build_specs(&args, &config)?;
    let table = fetch_data(source, &data_dir, &ticker, interval, start, end)
        .with_context(|| format!("loading {ticker} {interval} bars"))?;

    let options = AnalyzeOptions {
        only_trigger_rows: args.only_trigger_rows,
        ..AnalyzeOptions::default()
    };
    let mut frame = analyze(&table, &specs, &options)?;

    if let Some(harness) = comparison_harness(&args)? {
        for spec in &specs {
            let length = registry_lookup(&spec.name)?.resolve_length(spec)?;
            let added = harness.append(&mut frame, &table, &spec.name, length)?;
            if added.is_empty() {
                warn!(indicator = %spec.name, "no reference implementation to compare against");
            }
        }
    }

    if let Some(column) = &args.trigger_column {
        frame = filter_trigger_rows(&frame, column)?;
    }
    if tail > 0 {
        frame = frame.tail(tail);
    }
    info!(rows = frame.len(), columns = frame.columns().len(), "analysis complete");

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_frame(&frame, args.format, std::io::BufWriter::new(file))?;
            info!(path = %path.display(), "output written");
        }
        None => write_frame(&frame, args.format, std::io::stdout().lock())?,
    }
    Ok(())
}

fn write_frame<W: Write>(frame: &Frame, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Table => writeln!(out, "{frame}")?,
        OutputFormat::Csv => frame.write_csv(&mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, frame)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_list() -> Result<()> {
    let registry = IndicatorRegistry::default();
    println!("{:<14} {:<8} {:<40} Options", "Name", "Length", "Aliases");
    println!("{}", "-".repeat(90));
    for indicator in registry.iter() {
        let length = indicator
            .default_length()
            .map_or_else(|| "-".to_string(), |l| l.to_string());
        println!(
            "{:<14} {:<8} {:<40} {}",
            indicator.name(),
            length,
            indicator.aliases().join(", "),
            indicator.options().join(", ")
        );
    }
    Ok(())
}
