//! trimctx CLI - Main entry point

mod cli;
mod output;
mod scorer;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trimctx_core::ConfigLoader;
use trimctx_foundation::{ScorerKind, TrimConfig};

/// trimctx - shrink text by masking its least informative parts
#[derive(Parser, Debug)]
#[command(name = "trimctx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file (stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Fraction of units to mask, from 0.0 to 1.0
    #[arg(short, long)]
    ratio: Option<f64>,

    /// Unit granularity (phrase, sentence, token)
    #[arg(short, long)]
    level: Option<String>,

    /// Surprisal scorer
    #[arg(long, value_enum)]
    scorer: Option<ScorerArg>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Model used by the openai scorer
    #[arg(long)]
    model: Option<String>,

    /// API key for the openai scorer (overrides env and config)
    #[arg(long)]
    api_key: Option<String>,

    /// Keep the first N words of every masked sentence
    #[arg(long, value_name = "N")]
    keep_leading_words: Option<usize>,

    /// Extra settings file, applied after the default ones
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Print masking statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScorerArg {
    Heuristic,
    Openai,
}

impl From<ScorerArg> for ScorerKind {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::Heuristic => ScorerKind::Heuristic,
            ScorerArg::Openai => ScorerKind::OpenAi,
        }
    }
}

impl Args {
    /// Command-line flags override every settings file
    fn apply_to(&self, config: &mut TrimConfig) {
        if let Some(ratio) = self.ratio {
            config.reducer.reduce_ratio = Some(ratio);
        }
        if let Some(count) = self.keep_leading_words {
            config.reducer.keep_leading_words = Some(true);
            config.reducer.num_lead_words = Some(count);
        }
        if let Some(kind) = self.scorer {
            config.scorer.kind = Some(kind.into());
        }
        if let Some(base_url) = &self.base_url {
            config.scorer.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model {
            config.scorer.model = Some(model.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.scorer.api_key = Some(api_key.clone());
        }
    }

    fn run_options(&self) -> cli::RunOptions {
        cli::RunOptions {
            input: self.input.clone(),
            level: self.level.clone(),
            json: self.json,
            stats: self.stats,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the reduced text
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let loader = ConfigLoader::new(&working_dir);
    let mut config = loader.load_all();
    if let Some(path) = &args.config {
        config.merge(loader.load_from(path)?);
    }
    args.apply_to(&mut config);

    cli::run(&config, &args.run_options()).await
}
