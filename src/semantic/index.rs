//! Per-category embedding table with cosine similarity search.
//!
//! Holds the precomputed embedding of every knowledge-base text plus the
//! fallback utterances. Built once at startup; read-only afterwards, so it is
//! shared across request handlers without locking.

use crate::knowledge::{Category, KnowledgeBase};
use crate::semantic::embeddings::{Embedder, EmbeddingError};

/// A reference text paired with its embedding.
#[derive(Debug, Clone)]
struct IndexEntry {
    text: String,
    embedding: Vec<f32>,
}

/// Best match produced by a similarity search.
#[derive(Debug, Clone)]
pub struct CategoryMatch {
    pub category: Category,
    pub text: String,
    /// Cosine similarity in [-1, 1]; higher is better.
    pub score: f32,
}

/// Errors that can occur while building or searching the index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Cannot store or search with zero-norm vector")]
    ZeroNormVector,

    #[error("Embedder returned {got} vectors for {expected} texts")]
    CountMismatch { expected: usize, got: usize },

    #[error("Index contains no fallback utterances")]
    NoFallbacks,

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Precomputed embeddings for the whole knowledge base, grouped per category
/// in canonical scan order.
pub struct KnowledgeIndex {
    categories: Vec<(Category, Vec<IndexEntry>)>,
    fallbacks: Vec<IndexEntry>,
    dimensions: usize,
}

impl KnowledgeIndex {
    /// Embed every category's texts plus the fallback utterances.
    ///
    /// Each category is encoded in a single batch call, and vectors are
    /// paired with their source texts in insertion order so ties resolve to
    /// the first item.
    pub fn build(kb: &KnowledgeBase, embedder: &dyn Embedder) -> Result<Self, IndexError> {
        let mut dimensions = 0;
        let mut categories = Vec::with_capacity(Category::ALL.len());

        for (category, texts) in kb.categories() {
            let embeddings = embedder.embed_batch(texts)?;
            categories.push((category, Self::pair_entries(texts, embeddings, &mut dimensions)?));
        }

        let fallback_embeddings = embedder.embed_batch(kb.fallbacks())?;
        let fallbacks = Self::pair_entries(kb.fallbacks(), fallback_embeddings, &mut dimensions)?;

        Ok(Self {
            categories,
            fallbacks,
            dimensions,
        })
    }

    /// Expected embedding dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of knowledge items in the index.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, entries)| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scan every in-scope category and return the single best match.
    ///
    /// Takes the maximum per category, then across categories. Strict `>`
    /// comparison: the first category in scan order and the first item by
    /// insertion order win ties.
    pub fn search(
        &self,
        query: &[f32],
        scope: Option<Category>,
    ) -> Result<Option<CategoryMatch>, IndexError> {
        let query_norm = self.check_query(query)?;

        let mut best: Option<CategoryMatch> = None;
        for (category, entries) in &self.categories {
            if scope.is_some_and(|c| c != *category) {
                continue;
            }

            for entry in entries {
                let score = cosine_similarity(query, &entry.embedding, query_norm);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(CategoryMatch {
                        category: *category,
                        text: entry.text.clone(),
                        score,
                    });
                }
            }
        }

        Ok(best)
    }

    /// Best fallback utterance by cosine similarity.
    ///
    /// No threshold gate: the best of the fixed list is returned even when
    /// the absolute score is low, since there is nothing better to fall back
    /// to.
    pub fn best_fallback(&self, query: &[f32]) -> Result<&str, IndexError> {
        let query_norm = self.check_query(query)?;

        let mut best: Option<(&str, f32)> = None;
        for entry in &self.fallbacks {
            let score = cosine_similarity(query, &entry.embedding, query_norm);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((&entry.text, score));
            }
        }

        best.map(|(text, _)| text).ok_or(IndexError::NoFallbacks)
    }

    fn check_query(&self, query: &[f32]) -> Result<f32, IndexError> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let norm = l2_norm(query);
        if norm < f32::EPSILON {
            return Err(IndexError::ZeroNormVector);
        }

        Ok(norm)
    }

    fn pair_entries(
        texts: &[String],
        embeddings: Vec<Vec<f32>>,
        dimensions: &mut usize,
    ) -> Result<Vec<IndexEntry>, IndexError> {
        if embeddings.len() != texts.len() {
            return Err(IndexError::CountMismatch {
                expected: texts.len(),
                got: embeddings.len(),
            });
        }

        texts
            .iter()
            .zip(embeddings)
            .map(|(text, embedding)| {
                if *dimensions == 0 {
                    *dimensions = embedding.len();
                } else if embedding.len() != *dimensions {
                    return Err(IndexError::DimensionMismatch {
                        expected: *dimensions,
                        got: embedding.len(),
                    });
                }

                if l2_norm(&embedding) < f32::EPSILON {
                    return Err(IndexError::ZeroNormVector);
                }

                Ok(IndexEntry {
                    text: text.clone(),
                    embedding,
                })
            })
            .collect()
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity between two vectors.
/// Assumes query_norm is precomputed for efficiency.
fn cosine_similarity(query: &[f32], target: &[f32], query_norm: f32) -> f32 {
    let target_norm = l2_norm(target);
    if target_norm < f32::EPSILON {
        return 0.0;
    }

    let dot_product: f32 = query.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    dot_product / (query_norm * target_norm)
}
