//! Crop recommendation from the command line
//!
//! Run with: cargo run --bin recommend -- --n 90 --p 42 --k 43 --rainfall 202.9
//!
//! Settings start from the environment (`CROP_MODEL_PATH`, `ECONOMICS_PATH`,
//! `TOP_K`, `STRICT_TOP_K`); flags given on the command line win.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crop_advisor_rust::formatters::{JsonFormatter, MarkdownFormatter};
use crop_advisor_rust::{AdvisorConfig, CropAdvisor, RawInputs, ShortfallPolicy};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

/// Recommend crops for one set of soil and weather readings
///
/// Omitted measurements take the interactive form defaults.
#[derive(Parser, Debug)]
#[command(name = "recommend")]
#[command(version)]
struct Args {
    /// Nitrogen
    #[arg(long)]
    n: Option<f64>,

    /// Phosphorus
    #[arg(long)]
    p: Option<f64>,

    /// Potassium
    #[arg(long)]
    k: Option<f64>,

    /// Soil pH
    #[arg(long)]
    ph: Option<f64>,

    /// Seasonal rainfall (mm)
    #[arg(long)]
    rainfall: Option<f64>,

    /// Temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Relative humidity (%)
    #[arg(long)]
    humidity: Option<f64>,

    /// Fitted forest model (JSON) [env: CROP_MODEL_PATH]
    #[arg(long)]
    model: Option<PathBuf>,

    /// Economics table (CSV) [env: ECONOMICS_PATH]
    #[arg(long)]
    economics: Option<PathBuf>,

    /// Number of crops to recommend [env: TOP_K]
    #[arg(long)]
    top_k: Option<usize>,

    /// Fail instead of returning fewer crops when the model knows too few classes [env: STRICT_TOP_K]
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
}

impl Args {
    /// Apply command-line overrides on top of an environment-derived config
    fn apply_to(&self, mut config: AdvisorConfig) -> AdvisorConfig {
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(economics) = &self.economics {
            config.economics_path = economics.clone();
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k.max(1);
        }
        if self.strict {
            config.shortfall_policy = ShortfallPolicy::Strict;
        }
        config
    }

    fn inputs(&self) -> RawInputs {
        let defaults = RawInputs::default();
        RawInputs {
            n: self.n.unwrap_or(defaults.n),
            p: self.p.unwrap_or(defaults.p),
            k: self.k.unwrap_or(defaults.k),
            ph: self.ph.unwrap_or(defaults.ph),
            rainfall: self.rainfall.unwrap_or(defaults.rainfall),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            humidity: self.humidity.unwrap_or(defaults.humidity),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor_rust=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.apply_to(AdvisorConfig::from_env());

    let advisor = CropAdvisor::from_config(&config)
        .with_context(|| format!("Failed to load model {:?}", config.model_path))?;

    let recommendation = advisor.recommend(&args.inputs())?;

    let output = match args.format {
        OutputFormat::Markdown => MarkdownFormatter::format(&recommendation),
        OutputFormat::Json => JsonFormatter::format(&recommendation)?,
    };
    println!("{}", output);

    Ok(())
}
