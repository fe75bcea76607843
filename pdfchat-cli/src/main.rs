//! Interactive chat over a single ingested PDF.
//!
//! Ingests the given PDF into an in-memory vector index using a local
//! Ollama instance for embeddings, then answers questions in a read-eval
//! loop until the user types `q`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pdfchat_rag::{
    AnswerComposer, IngestionPipeline, InMemoryVectorIndex, OllamaChatProvider,
    OllamaEmbeddingProvider, PdfLoader, RagConfig, RecursiveChunker, Retriever,
};

#[derive(Parser, Debug)]
#[command(name = "pdfchat", about = "Chat with a PDF over a local Ollama instance")]
struct Args {
    /// PDF file to ingest, resolved under the data directory
    file: PathBuf,

    /// Directory PDF files are resolved under
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Ollama embedding model
    #[arg(long, default_value = "nomic-embed-text")]
    embedding_model: String,

    /// Embedding dimensionality of the embedding model
    #[arg(long, default_value_t = 768)]
    embedding_dimensions: usize,

    /// Ollama chat model
    #[arg(long, default_value = "llama3.2:1b")]
    chat_model: String,

    /// Ollama API base URL
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Maximum chunk size in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[arg(long, default_value_t = 300)]
    chunk_overlap: usize,

    /// Number of chunks retrieved per question
    #[arg(long, default_value_t = 10)]
    top_k: usize,
}

/// A lone `q`, in any case, ends the session.
fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("q")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = RagConfig::builder()
        .chunk_size(args.chunk_size)
        .chunk_overlap(args.chunk_overlap)
        .top_k(args.top_k)
        .build()?;

    let embedder = Arc::new(
        OllamaEmbeddingProvider::new()
            .with_base_url(&args.ollama_url)
            .with_model(&args.embedding_model, args.embedding_dimensions),
    );
    let chat = Arc::new(
        OllamaChatProvider::new().with_base_url(&args.ollama_url).with_model(&args.chat_model),
    );
    let index = Arc::new(InMemoryVectorIndex::new());

    let pipeline = IngestionPipeline::builder()
        .loader(Arc::new(PdfLoader::new(&args.data_dir)))
        .chunker(Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?))
        .embedding_provider(embedder.clone())
        .index(index.clone())
        .build()?;

    // Ingestion must succeed before any chat turn is possible.
    let report = pipeline
        .ingest(&args.file)
        .await
        .with_context(|| format!("failed to ingest {}", args.file.display()))?;
    println!("Ingested {} chunks from {}", report.chunk_count, args.file.display());

    let retriever = Retriever::new(embedder, index);
    let composer = AnswerComposer::new(retriever, chat, &config);

    let mut editor = DefaultEditor::new()?;
    println!("Start the chat! To quit, type 'q'.");
    loop {
        match editor.readline("You: ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if is_quit(question) {
                    break;
                }
                editor.add_history_entry(question).ok();

                // A failed turn is reported and the session continues.
                match composer.answer(question).await {
                    Ok(answer) => println!("Assistant: {answer}\n"),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
