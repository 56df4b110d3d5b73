use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use okrdown::config::Config;
use okrdown::models::{MutationOutcome, ObjectiveRef};
use okrdown::{api, tree_render, OkrStore};

#[derive(Parser)]
#[command(name = "okrdown")]
#[command(about = "Objectives and key results tracked in a markdown document")]
struct Cli {
    /// OKR document to serve and edit (overrides OKRDOWN_DOCUMENT)
    #[arg(short, long, global = true)]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides OKRDOWN_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the objectives as a tree
    Show {
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Add one to a key result and save the document
    Increment {
        /// Objective position (0-based) or name
        objective: String,
        /// Key result id within the objective
        key_result: String,
    },
    /// Validate the document and report the first problem
    Check,
}

/// Initialize tracing with output to stderr so command output stays clean on stdout
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "okrdown=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(store: OkrStore, port: u16) -> anyhow::Result<()> {
    tracing::info!(
        "Starting okrdown server on port {} for {}",
        port,
        store.path().display()
    );

    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("okrdown server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;
    if let Some(document) = cli.document {
        config.document = document;
    }

    let store = OkrStore::open(&config.document, config.store_config())
        .with_context(|| format!("open {}", config.document.display()))?;

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(store, port.unwrap_or(config.port)).await?;
        }
        Some(Commands::Show { json }) => {
            let objectives = store.load_objectives()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&objectives)?);
            } else {
                print!("{}", tree_render::render_tree(&objectives));
            }
        }
        Some(Commands::Increment {
            objective,
            key_result,
        }) => {
            let objective = ObjectiveRef::parse(&objective)?;
            let update = store.increment_key_result(&objective, &key_result)?;
            let kr = &update.key_result;
            match update.outcome {
                MutationOutcome::Updated => {
                    println!("[{}] {} {}/{}", kr.id, kr.name, kr.current, kr.target)
                }
                MutationOutcome::AlreadyComplete => println!(
                    "[{}] {} is already complete ({}/{}), nothing changed",
                    kr.id, kr.name, kr.current, kr.target
                ),
            }
        }
        Some(Commands::Check) => {
            let objectives = store.load_objectives()?;
            let key_results: usize = objectives.iter().map(|o| o.key_results.len()).sum();
            println!(
                "{}: {} objectives, {} key results",
                config.document.display(),
                objectives.len(),
                key_results
            );
        }
        None => {
            serve(store, config.port).await?;
        }
    }

    Ok(())
}
