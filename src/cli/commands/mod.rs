mod ingest;
mod search;
mod status;

pub use ingest::{IngestArgs, handle_ingest};
pub use search::{SearchArgs, handle_search};
pub use status::handle_status;
