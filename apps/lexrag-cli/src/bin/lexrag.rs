//! lexrag - ask grounded questions against a labor-law corpus
//!
//! ```bash
//! lexrag ask "كم عدد أيام الإجازة السنوية للعامل؟"
//! lexrag ask --json --no-related "How is overtime paid?"
//! lexrag search "annual leave"
//! lexrag status
//! lexrag direction "مرحبا"
//! ```
//!
//! Configuration comes from `config.toml`, `config.<RUST_ENV>.toml`, `APP_*`
//! variables and `INFERENCE_API_KEY`. Logs go to stderr; set `RUST_LOG` to
//! change the level.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lexrag_core::config::Config;
use lexrag_core::lang::detect_direction;
use lexrag_core::types::Answer;
use lexrag_index::Corpus;
use lexrag_pipeline::QueryPipeline;

#[derive(Parser)]
#[command(name = "lexrag")]
#[command(about = "Grounded question answering over a statute corpus")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question with citations
    Ask {
        question: String,

        /// Print the answer as JSON
        #[arg(long)]
        json: bool,

        /// Skip follow-up question suggestions
        #[arg(long)]
        no_related: bool,
    },

    /// Show the reranked articles for a question without generating
    Search { question: String },

    /// Show corpus artifact counts
    Status,

    /// Detect text direction (rtl/ltr)
    Direction { text: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Direction { text } => {
            println!("{}", detect_direction(&text).html_dir());
        }

        Commands::Status => {
            let config = Config::load()?;
            let settings = config.settings()?;
            let corpus = Corpus::load(&settings.corpus).context("failed to load corpus artifacts")?;
            println!("environment: {}", config.env_name());
            println!("fragments:   {}", corpus.fragment_count());
            println!("vectors:     {}", corpus.vector_count());
            println!("dimension:   {}", corpus.dim());
            if corpus.fragment_count() != corpus.vector_count() {
                println!("warning: fragment and vector counts differ");
            }
        }

        Commands::Search { question } => {
            let pipeline = load_pipeline()?;
            let ranked = pipeline.retrieve(&question)?;
            if ranked.is_empty() {
                println!("No matching articles.");
            }
            for (i, hit) in ranked.iter().enumerate() {
                println!("#{} [Article {}] (score: {:.4})", i + 1, hit.fragment_id, hit.relevance_score);
                let preview: String = hit.content.chars().take(300).collect();
                println!("{}{}\n", preview, if hit.content.chars().count() > 300 { "..." } else { "" });
            }
        }

        Commands::Ask { question, json, no_related } => {
            let pipeline = load_pipeline()?;
            let answer = if no_related {
                Answer { answer: pipeline.run_query(&question)?, related_questions: Vec::new() }
            } else {
                pipeline.answer(&question)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else if answer.is_empty() {
                println!("No answer available: the corpus has no usable context for this question.");
            } else {
                println!("{}", answer.answer.trim());
                if !answer.related_questions.is_empty() {
                    println!("\nRelated questions:");
                    for q in &answer.related_questions {
                        println!("  - {q}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_pipeline() -> Result<QueryPipeline> {
    let config = Config::load()?;
    let settings = config.settings()?;
    info!(env = config.env_name(), "configuration loaded");
    QueryPipeline::from_settings(&settings).context("failed to start query pipeline")
}
