//! Lumen: vision-health research search and simulated eye-test analysis.
//! Entry point for the `lumen` binary.

mod app;
mod output;

use clap::{Parser, Subcommand};
use lumen_analysis::TestType;
use lumen_config::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Vision-health research search")]
struct Cli {
    /// Path to lumen.toml (defaults to LUMEN_CONFIG, then ./lumen.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Relevance-ranked search across all providers plus the web fallback
    Search { query: Vec<String> },
    /// Newest-first paper search across all providers
    Papers { query: Vec<String> },
    /// Toggle a bookmark on an article id
    Bookmark { id: String },
    /// List bookmarked article ids
    Bookmarks,
    /// Show recent searches
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Run a simulated analysis (visual_acuity, color_vision, amsler_grid,
    /// contrast_sensitivity, retinal_scan, eye_strain)
    Analyze { test_type: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lumen=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        eprintln!("Something went wrong: {e}. Please try again.");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => Config::load(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    info!(
        sources = ?config.research.sources,
        store = %config.store.path,
        "Configuration loaded"
    );
    let app = App::new(config).await?;

    match cli.command {
        Command::Search { query } => {
            let outcome = app.search(&query.join(" ")).await;
            if cli.json { output::print_json(&outcome.items)?; } else { output::print_results(&outcome); }
        }
        Command::Papers { query } => {
            let outcome = app.papers(&query.join(" ")).await;
            if cli.json { output::print_json(&outcome.items)?; } else { output::print_papers(&outcome); }
        }
        Command::Bookmark { id } => {
            let state = if app.toggle_bookmark(&id).await { "bookmarked" } else { "removed" };
            println!("{id}: {state}");
        }
        Command::Bookmarks => {
            let (ids, known) = app.bookmarks().await;
            if cli.json {
                output::print_json(&serde_json::json!({ "ids": ids, "articles": known }))?;
            } else if ids.is_empty() {
                println!("No bookmarks yet.");
            } else {
                for (i, paper) in known.iter().enumerate() {
                    output::print_paper(i + 1, paper);
                }
                let unresolved: Vec<&String> =
                    ids.iter().filter(|id| !known.iter().any(|p| &p.id == *id)).collect();
                for id in unresolved {
                    println!("  - {id}");
                }
            }
        }
        Command::History { clear } => {
            if clear {
                app.clear_history().await;
                println!("Search history cleared.");
            } else {
                let entries = app.history().await;
                if cli.json {
                    output::print_json(&entries)?;
                } else {
                    for (i, q) in entries.iter().enumerate() {
                        println!("{:>2}. {q}", i + 1);
                    }
                }
            }
        }
        Command::Analyze { test_type } => {
            let test_type = TestType::from_name(&test_type)
                .ok_or_else(|| anyhow::anyhow!("unknown test type '{test_type}'"))?;

            let mut progress = app.analyzer().subscribe();
            let show_progress = !cli.json;
            let printer = tokio::spawn(async move {
                while let Ok(ev) = progress.recv().await {
                    if show_progress {
                        eprintln!("[{}/{}] {}", ev.stage, ev.total_stages, ev.label);
                    }
                }
            });

            let result = app.analyze(test_type).await;
            printer.abort();

            if cli.json { output::print_json(&result)?; } else { output::print_diagnostic(&result); }
        }
    }

    Ok(())
}
