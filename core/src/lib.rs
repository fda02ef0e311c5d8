//! In-memory full-text search with TF-IDF ranking, plus/minus query words and
//! an optional parallel ranking path.

pub mod concurrent;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod log_duration;
pub mod process;
pub mod query;
pub mod ranking;
pub mod server;
pub mod terms;
pub mod tokenizer;

pub use concurrent::ConcurrentMap;
pub use config::SearchConfig;
pub use document::{DocId, Document, DocumentStatus};
pub use error::{ErrorKind, QueryError, Result, SearchError};
pub use index::InvertedIndex;
pub use process::{process_queries, process_queries_joined};
pub use ranking::ExecutionPolicy;
pub use server::SearchServer;
pub use terms::{TermId, TermPool};
pub use tokenizer::StopWords;
