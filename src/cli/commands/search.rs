//! Search command implementation.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::output::get_formatter;
use crate::error::SearchError;
use crate::models::{Config, Credentials, OutputFormat, SearchResults};
use crate::providers::ModelLoader;
use crate::services::LocalVectorStore;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Natural language query
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "5")]
    pub limit: usize,

    /// Minimum similarity score (0.0-1.0)
    #[arg(long)]
    pub min_score: Option<f32>,

    /// Directory the vector index is persisted to
    #[arg(long)]
    pub index_dir: Option<PathBuf>,
}

pub async fn handle_search(args: SearchArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = &args.index_dir {
        config.ingestion.index_dir = dir.to_string_lossy().to_string();
    }
    let formatter = get_formatter(format);

    if args.query.trim().is_empty() {
        return Err(SearchError::InvalidQuery("query must not be empty".to_string()).into());
    }

    let index_dir = PathBuf::from(&config.ingestion.index_dir);
    if !LocalVectorStore::exists(&index_dir) {
        let err = SearchError::IndexNotFound(index_dir.display().to_string());
        eprintln!("{}", formatter.format_error(&err.to_string()));
        return Err(err.into());
    }

    let loader = ModelLoader::new(Credentials::from_env(), config.clone())
        .map_err(|e| SearchError::Model(e.into()))?;
    let embeddings = loader.load_embeddings().map_err(SearchError::Model)?;

    if verbose {
        println!("Embedding query with {}...", embeddings.model_name());
    }

    let start_time = Instant::now();
    let query_vector = embeddings
        .embed_query(&args.query)
        .await
        .map_err(SearchError::Embedding)?;

    let store = LocalVectorStore::load(Path::new(&config.ingestion.index_dir))
        .map_err(SearchError::VectorStore)?;
    let hits = store.search(&query_vector, args.limit, args.min_score);

    let results = SearchResults {
        query: args.query,
        total: hits.len(),
        duration_ms: start_time.elapsed().as_millis() as u64,
        hits,
    };
    print!("{}", formatter.format_search_results(&results));

    Ok(())
}
