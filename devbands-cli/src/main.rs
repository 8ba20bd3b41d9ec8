//! DevBands CLI — evaluate deviation bands over bar files and generate synthetic bars.
//!
//! Commands:
//! - `run` — stream each input file through its own engine and write one
//!   evaluation file per input; a JSON summary per input goes to stdout
//! - `synth` — write deterministic synthetic bars for a symbol

mod output;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use devbands_core::data::{self, generate_synthetic_bars, SyntheticSpec};
use devbands_core::engine::{run_series, RunSummary};
use devbands_core::{EngineConfig, Instrument, SignalPolicy, VolumeKind};

use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "devbands",
    about = "DevBands CLI — rolling VWAP deviation bands and band signals"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate bands and signals over one or more bar files (.csv, .jsonl).
    Run {
        /// Bar files; the file stem is used as the symbol.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Path to a TOML engine config. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Look-back period; the window holds period + 1 bars.
        #[arg(long)]
        period: Option<usize>,

        /// Volume used as the weight.
        #[arg(long, value_enum)]
        volume_kind: Option<VolumeKindArg>,

        /// Signal rules applied on top of the bands.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Instrument tick size (marker placement).
        #[arg(long, default_value_t = 0.25)]
        tick_size: f64,

        /// Ticks between a marker and the bar's high or low.
        #[arg(long)]
        tick_offset: Option<f64>,

        /// Output directory for evaluation files.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Write deterministic synthetic bars for a symbol.
    Synth {
        symbol: String,

        #[arg(long, default_value_t = 390)]
        bars: usize,

        /// Attach a volume profile to every bar (JSON Lines output only).
        #[arg(long, default_value_t = false)]
        profile: bool,

        /// First bar timestamp (YYYY-MM-DDTHH:MM:SS).
        #[arg(long)]
        start: Option<String>,

        #[arg(long, default_value_t = 1)]
        interval_minutes: i64,

        #[arg(long, default_value_t = 100.0)]
        start_price: f64,

        #[arg(long, default_value_t = 0.25)]
        tick_size: f64,

        /// Destination file; the extension picks the format.
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VolumeKindArg {
    Total,
    Bid,
    Ask,
}

impl From<VolumeKindArg> for VolumeKind {
    fn from(arg: VolumeKindArg) -> Self {
        match arg {
            VolumeKindArg::Total => VolumeKind::Total,
            VolumeKindArg::Bid => VolumeKind::Bid,
            VolumeKindArg::Ask => VolumeKind::Ask,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    None,
    SimpleBreakout,
    TrendReversion,
}

impl From<PolicyArg> for SignalPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::None => SignalPolicy::None,
            PolicyArg::SimpleBreakout => SignalPolicy::SimpleBreakout,
            PolicyArg::TrendReversion => SignalPolicy::TrendReversion,
        }
    }
}

/// Flag values that override the config file.
#[derive(Debug, Default)]
struct Overrides {
    period: Option<usize>,
    volume_kind: Option<VolumeKindArg>,
    policy: Option<PolicyArg>,
    tick_offset: Option<f64>,
}

/// One stdout line per input.
#[derive(Serialize)]
struct InputReport<'a> {
    input: &'a Path,
    output: PathBuf,
    #[serde(flatten)]
    summary: RunSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            inputs,
            config,
            period,
            volume_kind,
            policy,
            tick_size,
            tick_offset,
            output_dir,
            format,
        } => {
            let overrides = Overrides {
                period,
                volume_kind,
                policy,
                tick_offset,
            };
            let config = resolve_config(config.as_deref(), overrides)?;
            run_cmd(&inputs, &config, tick_size, &output_dir, format)
        }
        Commands::Synth {
            symbol,
            bars,
            profile,
            start,
            interval_minutes,
            start_price,
            tick_size,
            output,
        } => {
            let mut spec = SyntheticSpec {
                bars,
                interval_minutes,
                start_price,
                tick_size,
                with_profile: profile,
                ..SyntheticSpec::default()
            };
            if let Some(start) = start.as_deref() {
                spec.start = NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M:%S")
                    .with_context(|| format!("invalid --start '{start}'"))?;
            }
            synth_cmd(&symbol, &spec, &output)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(period) = overrides.period {
        config = config.with_period(period);
    }
    if let Some(kind) = overrides.volume_kind {
        config = config.with_volume_kind(kind.into());
    }
    if let Some(policy) = overrides.policy {
        config = config.with_signal_policy(policy.into());
    }
    if let Some(tick_offset) = overrides.tick_offset {
        config = config.with_tick_offset(tick_offset);
    }
    config.validate().context("invalid engine configuration")?;
    Ok(config)
}

fn run_cmd(
    inputs: &[PathBuf],
    config: &EngineConfig,
    tick_size: f64,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    let outputs = plan_outputs(inputs, output_dir, format)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    info!(
        inputs = inputs.len(),
        fingerprint = %config.fingerprint(),
        "evaluating inputs"
    );

    let results: Vec<Result<InputReport>> = inputs
        .par_iter()
        .zip(outputs)
        .map(|(input, output)| evaluate_file(input, config, tick_size, output, format))
        .collect();

    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(report) => println!("{}", serde_json::to_string(&report)?),
            Err(err) => {
                failures += 1;
                eprintln!("Error for {}: {err:#}", input.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} input(s) failed", inputs.len());
    }
    Ok(())
}

fn symbol_for(input: &Path) -> Result<String> {
    match input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => bail!("cannot derive a symbol from {}", input.display()),
    }
}

/// Output file for each input, `<dir>/<stem>.bands.<ext>`.
///
/// Inputs run in parallel, so two inputs resolving to the same output
/// (same stem in different directories, or `ES.csv` next to `ES.jsonl`)
/// are rejected before anything is written.
fn plan_outputs(inputs: &[PathBuf], output_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
    let mut outputs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let symbol = symbol_for(input)?;
        let output = output_dir.join(format!("{symbol}.bands.{}", format.extension()));
        if let Some(first) = claimed.insert(output.clone(), input) {
            bail!(
                "{} and {} would both write {}; rename one input",
                first.display(),
                input.display(),
                output.display()
            );
        }
        outputs.push(output);
    }
    Ok(outputs)
}

fn evaluate_file<'a>(
    input: &'a Path,
    config: &EngineConfig,
    tick_size: f64,
    output: PathBuf,
    format: OutputFormat,
) -> Result<InputReport<'a>> {
    let symbol = symbol_for(input)?;
    let instrument = Instrument::new(symbol.as_str(), tick_size)?;
    let bars = data::load_bars(input)
        .with_context(|| format!("failed to load bars from {}", input.display()))?;
    if bars.is_empty() {
        warn!(input = %input.display(), "no bars in input");
    }

    let run = run_series(&bars, config, &instrument)
        .with_context(|| format!("evaluation failed for {}", input.display()))?;

    output::write_evaluations(&output, &run.evaluations, config.signal_policy, format)?;

    Ok(InputReport {
        input,
        output,
        summary: run.summary,
    })
}

fn synth_cmd(symbol: &str, spec: &SyntheticSpec, output: &Path) -> Result<()> {
    let bars = generate_synthetic_bars(symbol, spec);
    data::write_bars(output, &bars)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote {} bars for {symbol} to {}", bars.len(), output.display());
    Ok(())
}
