//! Corpus ingestion: text extraction and offline indexing

pub mod indexer;
mod parser;

pub use indexer::{CorpusIndexer, IndexEvent, IndexReport, SkippedDocument};
pub use parser::FileParser;
