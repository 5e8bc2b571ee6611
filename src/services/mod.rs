mod chunker;
mod ingest;
mod pdf;
mod vector_store;

pub use chunker::TextChunker;
pub use ingest::{SkippedPdf, chunk_documents, discover_pdfs, load_documents};
pub use pdf::load_pdf_pages;
pub use vector_store::{INDEX_FILE_NAME, LocalVectorStore};
