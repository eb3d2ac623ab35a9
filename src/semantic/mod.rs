//! Embedding and similarity-search infrastructure.
//!
//! - `embeddings`: wraps fastembed behind the `Embedder` seam
//! - `index`: per-category embedding table with cosine similarity search

pub mod embeddings;
mod index;

pub use embeddings::{Embedder, EmbeddingError, EmbeddingModel};
pub use index::{CategoryMatch, IndexError, KnowledgeIndex};

/// Default embedding model. Small, and plenty for a corpus of tens of items.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
