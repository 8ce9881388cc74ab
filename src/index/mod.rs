//! Text index collaborator boundary.
//!
//! The engine is a read-only consumer of a positional text index. This
//! module defines the contract it consumes (term enumeration per field,
//! position postings per term, frequency-derived weights, document count)
//! and two implementations: an adapter over a Tantivy index and an
//! in-memory index for tests and small corpora.

mod memory;
mod tantivy;

pub use self::memory::{MemoryTextIndex, TermWeighting};
pub use self::tantivy::TantivyTextIndex;

use std::path::PathBuf;
use thiserror::Error;

/// Per-term statistics used by the term filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermStats {
    /// The term text.
    pub text: String,
    /// Number of documents the term occurs in.
    pub doc_frequency: u64,
    /// Total number of occurrences across the collection.
    pub collection_frequency: u64,
}

/// One document's occurrences of a term.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Opaque document identifier, unique within the index.
    pub document: u64,
    /// Token positions of the term within the document field, ascending.
    pub positions: Vec<u32>,
    /// Local (per-posting) weight supplied by the index.
    pub local_weight: f32,
}

/// Errors raised when the text index cannot be read.
///
/// All of these are fatal for the run: no partial vector store is exposed.
#[derive(Error, Debug)]
pub enum IndexAccessError {
    #[error(
        "Failed to open text index at '{path}': {cause}\nSuggestion: Check the path and that the index was built by a compatible version"
    )]
    Open { path: PathBuf, cause: String },

    #[error(
        "Field '{field}' is not present in the index schema\nSuggestion: Check the configured content fields against the index"
    )]
    UnknownField { field: String },

    #[error(
        "Field '{field}' was indexed without positions\nSuggestion: Rebuild the index with positional postings enabled for this field"
    )]
    MissingPositions { field: String },

    #[error("Failed to read the term dictionary for field '{field}': {cause}")]
    TermDictionary { field: String, cause: String },

    #[error("Failed to read postings for term '{term}': {cause}")]
    Postings { term: String, cause: String },
}

/// Read-only view of a positional text index.
///
/// Implementations must be safely shareable across parallel readers; the
/// engine never writes through this trait.
pub trait TextIndex: Sync {
    /// Total number of documents in the index.
    fn document_count(&self) -> u64;

    /// Every term of `field` with its frequencies, in a deterministic
    /// (lexicographic) order.
    fn field_terms(&self, field: &str) -> Result<Vec<TermStats>, IndexAccessError>;

    /// Position postings of `term` in `field`, one entry per document.
    ///
    /// Unknown terms yield an empty list, not an error.
    fn postings(&self, field: &str, term: &str) -> Result<Vec<Posting>, IndexAccessError>;

    /// Frequency-derived scalar weight applied to contributions from
    /// `term`. Implementations choose the weighting scheme; `1.0` means
    /// unweighted.
    fn global_weight(&self, field: &str, term: &str) -> f32;
}
