//! Command-line entry point: `docchat ingest <pdf>` and `docchat chat`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docchat::{
    ChatSession, Credentials, GeminiChat, GeminiEmbedder, IngestionPipeline, RagConfig,
    VectorizeClient,
};

#[derive(Parser)]
#[command(name = "docchat", version, about = "Chat with a PDF over a remote vector index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, chunk, embed, and upsert a PDF into the vector index
    Ingest {
        /// Path to the PDF file
        pdf: PathBuf,
    },
    /// Start an interactive chat against the ingested documents
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let credentials = Credentials::from_env()?;
    let config = RagConfig::default();

    let embedder = Arc::new(GeminiEmbedder::new(credentials.gemini_api_key.clone())?);
    let index = Arc::new(VectorizeClient::new(
        credentials.cloudflare_api_token.clone(),
        credentials.cloudflare_account_id.clone(),
        credentials.index_name.clone(),
    ));

    match cli.command {
        Commands::Ingest { pdf } => {
            let pipeline = IngestionPipeline::builder()
                .config(config)
                .embedder(embedder)
                .index(index)
                .build()?;

            let report = pipeline.ingest(&pdf).await?;
            match report.mutation_id {
                Some(mutation_id) => println!(
                    "Queued {} chunks for insertion. Mutation ID: {mutation_id}",
                    report.chunk_count
                ),
                None => println!("Document produced no text; nothing was inserted."),
            }
        }
        Commands::Chat => {
            let llm = Arc::new(GeminiChat::new(credentials.gemini_api_key.clone())?);
            let session = ChatSession::new(embedder, index, llm, config.top_k);
            session.run().await?;
        }
    }

    Ok(())
}
