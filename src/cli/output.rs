use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::models::{OutputFormat, SearchResults};

pub trait Formatter {
    fn format_ingest_stats(&self, stats: &IngestStats) -> String;
    fn format_search_results(&self, results: &SearchResults) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

/// Final summary of one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub docs_dir: String,
    pub pdfs_found: u64,
    pub pdfs_loaded: u64,
    pub pdfs_skipped: u64,
    pub pages_loaded: u64,
    pub chunks_created: u64,
    pub index_chunks_total: u64,
    pub index_path: String,
    pub appended: bool,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub google_credential: bool,
    pub openai_credential: bool,
    pub groq_credential: bool,
    pub embedding_model: String,
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
    pub index_path: String,
    pub index_exists: bool,
    pub index_chunks: u64,
    pub index_dimension: Option<usize>,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let mut output = String::new();
        let line = "=".repeat(60);
        writeln!(output, "{}", line).unwrap();
        writeln!(output, "✨ RAG Ingestion Complete!").unwrap();
        writeln!(output, "{}", line).unwrap();
        writeln!(output, "📁 Source directory:  {}", stats.docs_dir).unwrap();
        writeln!(output, "📄 PDFs processed:    {}", stats.pdfs_loaded).unwrap();
        if stats.pdfs_skipped > 0 {
            writeln!(output, "⚠️  PDFs skipped:      {}", stats.pdfs_skipped).unwrap();
        }
        writeln!(output, "📃 Total pages:       {}", stats.pages_loaded).unwrap();
        writeln!(output, "🧩 Chunks created:    {}", stats.chunks_created).unwrap();
        writeln!(output, "💾 Index saved to:    {}", stats.index_path).unwrap();
        writeln!(
            output,
            "   Index now holds {} chunks ({})",
            stats.index_chunks_total,
            if stats.appended {
                "appended to existing index"
            } else {
                "new index"
            }
        )
        .unwrap();
        writeln!(output, "   Took {}ms", stats.duration_ms).unwrap();
        writeln!(output, "{}", line).unwrap();
        output
    }

    fn format_search_results(&self, results: &SearchResults) -> String {
        if results.is_empty() {
            return format!("No results found for: {}\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "Search results for: \"{}\"", results.query).unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.total, results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.hits.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}]", i + 1, hit.score).unwrap();
            writeln!(
                output,
                "   Source: {} (page {})",
                hit.source_file, hit.page
            )
            .unwrap();
            writeln!(output, "   ---").unwrap();

            let preview: String = hit.content.chars().take(200).collect();
            let preview = if hit.content.chars().count() > 200 {
                format!("{}...", preview)
            } else {
                preview
            };
            for line in preview.lines() {
                writeln!(output, "   {}", line).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mark = |present: bool| if present { "✅" } else { "❌" };

        let mut output = String::new();
        writeln!(output, "Credentials:").unwrap();
        writeln!(
            output,
            "  {} GOOGLE_API_KEY / GEMINI_API_KEY",
            mark(status.google_credential)
        )
        .unwrap();
        writeln!(output, "  {} OPENAI_API_KEY", mark(status.openai_credential)).unwrap();
        writeln!(output, "  {} GROQ_API_KEY", mark(status.groq_credential)).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "Models:").unwrap();
        writeln!(output, "  Embedding model: {}", status.embedding_model).unwrap();
        match (&status.llm_provider, &status.llm_model) {
            (Some(provider), Some(model)) => {
                writeln!(output, "  LLM: {} ({})", model, provider).unwrap();
            }
            _ => {
                writeln!(output, "  LLM: none available").unwrap();
            }
        }
        writeln!(output).unwrap();

        writeln!(output, "Index: {}", status.index_path).unwrap();
        if status.index_exists {
            writeln!(
                output,
                "  {} chunks{}",
                status.index_chunks,
                status
                    .index_dimension
                    .map(|d| format!(", dimension {}", d))
                    .unwrap_or_default()
            )
            .unwrap();
        } else {
            writeln!(output, "  not created yet (run: ragkit ingest)").unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ Error: {}", error)
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        serde_json::to_string_pretty(stats).unwrap_or_default()
    }

    fn format_search_results(&self, results: &SearchResults) -> String {
        serde_json::to_string_pretty(results).unwrap_or_default()
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        serde_json::to_string_pretty(status).unwrap_or_default()
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({ "message": message }).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({ "error": error }).to_string()
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
