//! Driftbench CLI - build drift streams and score change-point detectors.
//!
//! # Usage
//!
//! ```bash
//! # Summarize the default random RBF stream
//! driftbench generate --dataset rbf
//!
//! # Smaller LED stream, every sample written as a JSON line
//! driftbench generate --dataset led --num-concepts 10 --n-per-concept 500 --samples led.jsonl
//!
//! # Start from a JSON config and override the seed
//! driftbench generate --dataset rbf --config rbf.json --seed 3 --json
//!
//! # Score a detector's reports
//! driftbench score --true-cps 99,200,400 --reported 100,150,200 --tolerance 10
//! ```

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{DatasetKind, StreamOverrides};
use driftbench_core::config::{LedStreamConfig, RbfStreamConfig, DEFAULT_BETA, DEFAULT_TOLERANCE};
use driftbench_core::evaluation::{ChangePointReport, ScoringConfig};
use driftbench_core::generators::{gradual_led, gradual_rbf};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Drift stream benchmark CLI.
///
/// Builds synthetic streams with known gradual change points and scores the
/// change points a detector reported on them.
#[derive(Parser)]
#[command(name = "driftbench", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build a preset stream and print its change points
    Generate(GenerateArgs),
    /// Score reported change points against true ones
    Score(ScoreArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Stream preset
    #[arg(long, value_enum, default_value = "rbf")]
    dataset: DatasetKind,

    /// JSON file with preset settings (missing keys keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    num_concepts: Option<usize>,

    #[arg(long)]
    n_per_concept: Option<usize>,

    /// Nominal transition length in samples
    #[arg(long)]
    drift_length: Option<usize>,

    /// Scale transitions with the size of the neighbouring concepts
    #[arg(long, overrides_with = "no_stretch")]
    stretch: bool,

    /// Use the same transition length everywhere
    #[arg(long)]
    no_stretch: bool,

    /// Seed of the transition draws
    #[arg(long)]
    seed: Option<u64>,

    /// Write every sample as a JSON line to this file
    #[arg(long)]
    samples: Option<PathBuf>,

    /// Output the summary as JSON
    #[arg(long)]
    json: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> StreamOverrides {
        let stretch = match (self.stretch, self.no_stretch) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        StreamOverrides {
            num_concepts: self.num_concepts,
            n_per_concept: self.n_per_concept,
            drift_length: self.drift_length,
            stretch,
            seed: self.seed,
        }
    }
}

#[derive(Args)]
struct ScoreArgs {
    /// True change points, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    true_cps: Vec<usize>,

    /// Reported change points, comma separated
    #[arg(long, value_delimiter = ',')]
    reported: Vec<usize>,

    /// A report closer than this many samples to a true change point is a hit
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: usize,

    /// Weight of recall in the F-beta score
    #[arg(long, default_value_t = DEFAULT_BETA)]
    beta: f64,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let text = match &cli.command {
        Command::Generate(args) => run_generate(args)?,
        Command::Score(args) => run_score(args)?,
    };
    println!("{}", text);

    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<String> {
    let overrides = args.overrides();
    let stream = match args.dataset {
        DatasetKind::Rbf => {
            let mut preset: RbfStreamConfig = config::load_config(args.config.as_deref())?;
            overrides.apply(&mut preset);
            gradual_rbf(&preset).context("Failed to build RBF stream")?
        }
        DatasetKind::Led => {
            let mut preset: LedStreamConfig = config::load_config(args.config.as_deref())?;
            overrides.apply(&mut preset);
            gradual_led(&preset).context("Failed to build LED stream")?
        }
    };

    if let Some(path) = &args.samples {
        let file = File::create(path)
            .with_context(|| format!("Failed to create samples file: {}", path.display()))?;
        let written = output::write_samples(&stream, BufWriter::new(file))?;
        info!(samples = written, path = %path.display(), "wrote stream samples");
    }

    let summary = output::StreamSummary::new(args.dataset.name(), &stream);
    Ok(if args.json {
        output::format_stream_json(&summary)
    } else {
        output::format_stream_human(&summary)
    })
}

fn run_score(args: &ScoreArgs) -> Result<String> {
    let config = ScoringConfig::new(args.tolerance, args.beta)?;

    let mut true_cps = args.true_cps.clone();
    let mut reported = args.reported.clone();
    true_cps.sort_unstable();
    reported.sort_unstable();

    let report = ChangePointReport::compute(&true_cps, &reported, &config);
    let score = output::ScoreOutput {
        true_change_points: true_cps,
        reported,
        tolerance: config.tolerance,
        beta: config.beta,
        report,
    };
    Ok(if args.json {
        output::format_score_json(&score)
    } else {
        output::format_score_human(&score)
    })
}
