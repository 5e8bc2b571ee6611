//! Status command implementation.

use anyhow::Result;
use std::path::Path;

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{Config, Credentials, OutputFormat};
use crate::providers::ModelLoader;
use crate::services::LocalVectorStore;

pub async fn handle_status(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let credentials = Credentials::from_env();

    // Status reports on the loader rather than failing with it.
    let (llm_provider, llm_model) =
        match ModelLoader::new(credentials.clone(), config.clone()) {
            Ok(loader) => match loader.load_llm() {
                Ok(client) => (
                    Some(client.provider().to_string()),
                    Some(client.model_name().to_string()),
                ),
                Err(_) => (None, None),
            },
            Err(_) => (None, None),
        };

    let index_dir = Path::new(&config.ingestion.index_dir);
    let index_exists = LocalVectorStore::exists(index_dir);
    let (index_chunks, index_dimension) = if index_exists {
        match LocalVectorStore::load(index_dir) {
            Ok(store) => (store.len() as u64, store.dimension()),
            Err(_) => (0, None),
        }
    } else {
        (0, None)
    };

    let status = StatusInfo {
        google_credential: credentials.google.is_some(),
        openai_credential: credentials.openai.is_some(),
        groq_credential: credentials.groq.is_some(),
        embedding_model: config.embedding.model_name.clone(),
        llm_provider,
        llm_model,
        index_path: config.ingestion.index_dir.clone(),
        index_exists,
        index_chunks,
        index_dimension,
    };

    print!("{}", formatter.format_status(&status));

    if credentials.is_empty() {
        eprintln!();
        eprintln!(
            "Hint: no provider credentials found. Set at least one of \
             GOOGLE_API_KEY (or GEMINI_API_KEY), OPENAI_API_KEY, GROQ_API_KEY."
        );
    }

    Ok(())
}
