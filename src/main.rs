use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use peermatch::artifacts::ArtifactStore;
use peermatch::config::Config;
use peermatch::embedding::EmbeddingProvider;
use peermatch::embedding::local::LocalEmbeddingProvider;
use peermatch::embedding::openai::OpenAIEmbeddingProvider;
use peermatch::engine::{EngineOptions, Recommendations, RecommendationEngine};
use peermatch::logging;
use peermatch::rerank::{RerankResult, Tier};

#[derive(Parser)]
#[command(name = "peermatch", version, about = "Hybrid-retrieval peer-reviewer recommendation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend reviewers for a manuscript
    Recommend {
        /// Path to the manuscript text file
        file: PathBuf,

        /// Number of reviewers in the final list (overrides config)
        #[arg(long)]
        top_k: Option<usize>,

        /// Emit the full result as JSON on stdout instead of the report
        #[arg(long)]
        json: bool,
    },
}

/// Create the embedding provider based on configuration.
///
/// A provider failure is not fatal here — the engine can still run
/// lexical-only — so the caller decides how hard to fail.
async fn create_embedding_provider(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.embedding.provider.as_str() {
        "openai" => {
            let api_key = config.embedding.openai_api_key.clone()
                .ok_or_else(|| anyhow::anyhow!(
                    "OpenAI API key required when provider is 'openai'. \
                     Set PEERMATCH_EMBEDDING__OPENAI_API_KEY or embedding.openai_api_key in peermatch.toml"
                ))?;
            Ok(Arc::new(OpenAIEmbeddingProvider::new(api_key)?))
        }
        "local" | _ => {
            Ok(Arc::new(LocalEmbeddingProvider::new(&config.embedding.cache_dir).await?))
        }
    }
}

fn tier_results<'a>(results: &'a [RerankResult], tier: Tier) -> Vec<&'a RerankResult> {
    results.iter().filter(|r| r.tier == tier).collect()
}

/// Human-readable tiered report on stdout.
fn print_report(recommendations: &Recommendations) {
    println!("Reviewer recommendations ({} mode)", recommendations.mode);
    println!("{}", "=".repeat(72));

    for tier in [Tier::HighlyRecommended, Tier::Recommended, Tier::Consider] {
        let group = tier_results(&recommendations.results, tier);
        if group.is_empty() {
            continue;
        }
        println!("\n{}", tier);
        println!("{}", "-".repeat(72));
        for r in group {
            println!(
                "{:>3}. {:<28} score {:>6.2}  papers {:>3}  match {:>5.1}%",
                r.rank, r.author, r.score, r.num_papers, r.avg_similarity_pct
            );
            let latest = r
                .latest_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "     {:<28} recent {:>2}   latest {}",
                r.institution, r.recent_papers, latest
            );
        }
    }

    if recommendations.results.is_empty() {
        println!("\nNo candidate reviewers found.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args
    let cli = Cli::parse();

    // 2. Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Config error (using defaults): {}", e);
        Config::default()
    });

    // 3. Initialize logging FIRST (before any other output)
    // Logging goes to stderr only — stdout is reserved for the report/JSON.
    logging::init_logging(&config);

    match cli.command {
        Commands::Recommend { file, top_k, json } => {
            let manuscript = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                file = %file.display(),
                "peermatch starting"
            );

            // 4. Load read-only artifacts once
            let store = ArtifactStore::load(Path::new(&config.artifacts_dir))?;

            // 5. Embedding provider — optional when the lexical index can
            //    carry the run alone
            let embedder = if store.semantic.is_some() {
                match create_embedding_provider(&config).await {
                    Ok(provider) => {
                        tracing::info!(
                            model = provider.model_name(),
                            dimension = provider.dimension(),
                            "Embedding provider initialized"
                        );
                        Some(provider)
                    }
                    Err(e) if store.lexical.is_some() => {
                        tracing::warn!(error = %e, "Embedding provider unavailable — running lexical-only");
                        None
                    }
                    Err(e) => return Err(e),
                }
            } else {
                None
            };

            // 6. Build the engine and run the pipeline
            let mut options = EngineOptions::from(&config);
            if let Some(top_k) = top_k {
                options.top_k = top_k;
            }
            let engine = RecommendationEngine::new(store, embedder, options)?;
            let recommendations = engine.recommend(&manuscript).await?;

            // 7. Emit
            if json {
                println!("{}", serde_json::to_string_pretty(&recommendations)?);
            } else {
                print_report(&recommendations);
            }
        }
    }

    Ok(())
}
