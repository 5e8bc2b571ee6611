//! Ingest command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::output::{IngestStats, get_formatter};
use crate::error::IngestError;
use crate::models::{Config, Credentials, OutputFormat};
use crate::providers::ModelLoader;
use crate::services::{
    LocalVectorStore, chunk_documents, discover_pdfs, load_documents,
};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Directory containing PDF files to ingest
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,

    /// Directory the vector index is persisted to
    #[arg(long)]
    pub index_dir: Option<PathBuf>,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Chunk overlap in characters
    #[arg(long)]
    pub chunk_overlap: Option<u32>,
}

pub async fn handle_ingest(args: IngestArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = &args.docs_dir {
        config.ingestion.docs_dir = dir.to_string_lossy().to_string();
    }
    if let Some(dir) = &args.index_dir {
        config.ingestion.index_dir = dir.to_string_lossy().to_string();
    }
    if let Some(size) = args.chunk_size {
        config.ingestion.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        config.ingestion.chunk_overlap = overlap;
    }

    let formatter = get_formatter(format);
    let start_time = Instant::now();

    // Embeddings are Google-only, so guard before doing any work.
    let credentials = Credentials::from_env();
    if credentials.google.is_none() {
        eprintln!(
            "\n{} GOOGLE_API_KEY or GEMINI_API_KEY is required for embeddings.",
            style("❌ Error:").red()
        );
        eprintln!("Set it in your .env file or export it:");
        eprintln!("  export GEMINI_API_KEY=your_api_key_here\n");
        anyhow::bail!("missing embedding credential");
    }

    let docs_dir = PathBuf::from(&config.ingestion.docs_dir);
    let files = match discover_pdfs(&docs_dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("\n{} {}", style("❌ Error:").red(), e);
            match &e {
                IngestError::DirectoryNotFound(_) => {
                    eprintln!("Create it and add PDF files:");
                    eprintln!("  mkdir -p {}", docs_dir.display());
                    eprintln!("  # then copy your PDFs into it\n");
                }
                IngestError::NoPdfsFound(_) => {
                    eprintln!("Add PDF files to ingest.\n");
                }
                _ => {}
            }
            return Err(e.into());
        }
    };

    println!("\n📚 Found {} PDF files to ingest:\n", files.len());
    for file in &files {
        println!(
            "  - {}",
            file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        );
    }
    println!();

    println!("🔧 Loading Google embeddings model...");
    let loader = ModelLoader::new(credentials, config.clone())
        .context("failed to validate credentials")?;
    let embeddings = loader
        .load_embeddings()
        .context("failed to load embeddings model")?;
    println!("{} Embeddings model loaded ({})\n", style("✅").green(), embeddings.model_name());

    println!("📖 Loading PDFs...");
    let (documents, skipped) = load_documents(&files)?;
    if verbose {
        for skip in &skipped {
            println!("  ✗ {}: {}", skip.path.display(), skip.reason);
        }
    }
    println!(
        "{} Loaded {} total pages\n",
        style("✅").green(),
        documents.len()
    );

    println!(
        "✂️  Splitting into chunks (size={}, overlap={})...",
        config.ingestion.chunk_size, config.ingestion.chunk_overlap
    );
    let mut chunks = chunk_documents(&documents, &config.ingestion);
    println!("{} Created {} chunks\n", style("✅").green(), chunks.len());

    println!("🔨 Building vector index (this may take a while)...");
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let batch_size = config.embedding.batch_size.max(1) as usize;
    for batch in chunks.chunks_mut(batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let vectors = embeddings
            .embed_batch(texts)
            .await
            .context("failed to generate embeddings")?;
        for (chunk, vector) in batch.iter_mut().zip(vectors.into_iter()) {
            chunk.embedding = vector;
        }
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();

    let index_dir = Path::new(&config.ingestion.index_dir);
    let (mut store, appended) = LocalVectorStore::open_or_create(index_dir)?;
    if appended {
        println!("  Found existing index, adding new documents...");
    } else {
        println!("  Creating new index...");
    }
    let chunks_created = chunks.len() as u64;
    store.add_chunks(chunks).context("failed to update index")?;
    store.save().context("failed to save index")?;
    println!(
        "{} Index saved to: {}\n",
        style("✅").green(),
        index_dir.display()
    );

    let stats = IngestStats {
        docs_dir: config.ingestion.docs_dir.clone(),
        pdfs_found: files.len() as u64,
        pdfs_loaded: (files.len() - skipped.len()) as u64,
        pdfs_skipped: skipped.len() as u64,
        pages_loaded: documents.len() as u64,
        chunks_created,
        index_chunks_total: store.len() as u64,
        index_path: config.ingestion.index_dir.clone(),
        appended,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    print!("{}", formatter.format_ingest_stats(&stats));

    Ok(())
}
