use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use magpie::config::Config;
use magpie::embedding::onnx::OnnxEmbedder;
use magpie::scorer::Scorer;

/// Magpie: zero-shot topic scoring for tweets.
///
/// Embeds a fixed set of topic prompts once, then scores any sentence by
/// how close its embedding lands to each prompt's.
#[derive(Parser)]
#[command(name = "magpie", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Score a single sentence against every topic
    Score {
        /// The sentence to score
        sentence: String,
    },

    /// Score every sample in the samples file
    Batch {
        /// Path to the samples file (overrides MAGPIE_SAMPLES_PATH)
        #[arg(long)]
        samples: Option<std::path::PathBuf>,

        /// Number of top topics to show per sample (default: 3)
        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// List the fixed topic vocabulary and its prompts
    Topics,

    /// Show configuration and whether the model is downloaded
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("magpie=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DownloadModel => {
            let config = Config::load()?;

            println!("Downloading the embedding model...");
            println!("  Destination: {}", config.model_dir.display());

            magpie::embedding::download::download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `magpie score \"some sentence\"` or `magpie batch`.");
        }

        Commands::Score { sentence } => {
            let config = Config::load()?;
            config.require_model()?;

            let scorer = build_scorer(&config)?;
            let scores = scorer.score(&sentence)?;

            magpie::output::terminal::display_scores(&sentence, &scores);
        }

        Commands::Batch { samples, top } => {
            let config = Config::load()?;
            config.require_model()?;

            let samples_path = samples.unwrap_or_else(|| config.samples_path.clone());
            let texts = magpie::samples::read_samples(&samples_path)?;

            if texts.is_empty() {
                println!("Samples file {} is empty.", samples_path.display());
                return Ok(());
            }

            println!("Scoring {} samples from {}...", texts.len(), samples_path.display());

            let scorer = build_scorer(&config)?;

            println!();
            for (i, text) in texts.iter().enumerate() {
                let scores = scorer.score(text)?;
                magpie::output::terminal::display_batch_line(i, text, &scores, top);
            }

            println!("\n{}", format!("Scored {} samples.", texts.len()).bold());
        }

        Commands::Topics => {
            magpie::output::terminal::display_topics();
        }

        Commands::Status => {
            let config = Config::load()?;
            let model_present =
                magpie::embedding::download::model_files_present(&config.model_dir);

            println!("\n{}", "=== Magpie status ===".bold());
            println!("  Model dir:    {}", config.model_dir.display());
            println!(
                "  Model files:  {}",
                if model_present {
                    "present".green().to_string()
                } else {
                    "missing (run `magpie download-model`)".yellow().to_string()
                }
            );
            println!("  Samples file: {}", config.samples_path.display());
            println!(
                "  Samples:      {}",
                if config.samples_path.exists() {
                    "present".green().to_string()
                } else {
                    "missing".yellow().to_string()
                }
            );
            println!();
        }
    }

    Ok(())
}

/// Load the ONNX embedder and build a scorer over it.
///
/// Embeds all twelve topic prompts up front — the one-time construction
/// cost the scoring calls then amortize.
fn build_scorer(config: &Config) -> Result<Scorer> {
    info!("Loading embedding model from {}", config.model_dir.display());
    let embedder = OnnxEmbedder::load(&config.model_dir)?;
    let scorer = Scorer::new(Box::new(embedder))?;
    Ok(scorer)
}
