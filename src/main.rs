//! Route Miner CLI - route-miner command

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use route_miner::{
    BuildInfo, InferenceConfig, InferenceMetrics, MetricsConfig, RenderOptions, RouteMiner,
    TelemetryConfig, init_tracing,
};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{error, info};

/// Route Miner - infer route templates from raw URLs
#[derive(Parser)]
#[command(name = "route-miner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer route patterns from URL files, one URL per line
    Infer {
        /// Input files (reads stdin when none are given)
        files: Vec<PathBuf>,

        /// Distinct children a path position needs before it collapses
        #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        threshold: Option<usize>,

        /// Keep patterns seen more often than this out of structural optimization
        #[arg(long)]
        frequency_cutoff: Option<u64>,

        /// Regular expression marking a segment value as dynamic (repeatable)
        #[arg(long = "feature", value_name = "REGEX")]
        features: Vec<String>,

        /// Enable the numeric and percent-encoded feature presets
        #[arg(long)]
        default_features: bool,

        /// Snapshot to start from
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,

        /// Write the resulting snapshot here
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Render only this origin
        #[arg(long)]
        origin: Option<String>,

        /// Render only dynamic patterns
        #[arg(long)]
        dynamic_only: bool,

        /// Samples listed under each dynamic pattern
        #[arg(long, default_value = "3")]
        max_samples: usize,

        /// Print Prometheus metrics after the report
        #[arg(long)]
        metrics: bool,
    },
    /// Print build information as JSON
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(&TelemetryConfig::from_env()) {
        eprintln!("Failed to initialize logging: {err}");
    }

    match cli.command {
        Commands::Infer {
            files,
            threshold,
            frequency_cutoff,
            features,
            default_features,
            snapshot,
            output,
            origin,
            dynamic_only,
            max_samples,
            metrics,
        } => {
            // Flags override the environment
            let mut config = InferenceConfig::from_env();
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }
            if frequency_cutoff.is_some() {
                config.frequency_cutoff = frequency_cutoff;
            }
            config.dynamic_features.extend(features);
            config.default_features |= default_features;

            let mut miner =
                RouteMiner::from_config(&config).context("Invalid inference configuration")?;

            let metrics_enabled = metrics || MetricsConfig::from_env().enabled;
            if metrics_enabled {
                miner = miner.with_metrics(InferenceMetrics::new()?);
            }

            if let Some(path) = &snapshot {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
                miner
                    .load_snapshot(&json)
                    .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            }

            let input = read_input(&files)?;
            let summary = match miner.update(input.lines()) {
                Ok(summary) => summary,
                Err(err) if err.is_fatal() => {
                    error!(error = %err, "Inference failed on an internal invariant");
                    return Err(err.into());
                }
                Err(err) => return Err(err).context("Rejected input batch"),
            };
            info!(
                accepted = summary.accepted,
                buckets = summary.buckets_updated,
                "Inference complete"
            );

            let options = RenderOptions {
                origin,
                dynamic_only,
                max_samples,
            };
            print!("{}", miner.render(&options));

            if let Some(path) = &output {
                fs::write(path, miner.to_json()?)
                    .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
                info!(path = %path.display(), "Wrote snapshot");
            }

            if let Some(metrics) = miner.metrics() {
                print!("{}", metrics.render()?);
            }
        }
        Commands::Version => {
            println!("{}", serde_json::to_string_pretty(&BuildInfo::current())?);
        }
    }

    Ok(())
}

/// Concatenate the given files, or read stdin when there are none
fn read_input(files: &[PathBuf]) -> Result<String> {
    if files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }

    let mut input = String::new();
    for path in files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        input.push_str(&content);
        if !content.ends_with('\n') {
            input.push('\n');
        }
    }
    Ok(input)
}
