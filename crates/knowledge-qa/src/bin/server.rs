//! Knowledge Q&A server binary
//!
//! Run with: cargo run -p knowledge-qa --bin knowledge-qa-server -- --config qa.toml

use clap::Parser;
use knowledge_qa::{config::QaConfig, server::QaServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "knowledge-qa-server",
    version,
    about = "Document Q&A service with source-cited answers"
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config and QA_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides config and QA_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                     Knowledge Q&A API                     ║
║         Ask questions, get answers with sources           ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = QaConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Database: {}", config.storage.database_path.display());
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!(
        "  - Chunk size: {} words ({} overlap)",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Vocabulary cap: {} terms", config.vectorizer.max_features);
    tracing::info!("  - Top-K: {}", config.retrieval.top_k);

    let server = QaServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /upload          - Upload a .txt document");
    println!("  POST   /ask             - Ask a question");
    println!("  GET    /documents       - List documents");
    println!("  DELETE /documents/:id   - Delete a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
