mod chat;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::chat::{ChatEngine, SelectionPolicy};
use crate::knowledge::KnowledgeBase;
use crate::semantic::{Embedder, EmbeddingError};

/// Deterministic embedder for tests. Every text maps to a fixed vector:
/// overridden texts get their assigned vector, everything else the default.
pub struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    /// Single-text embed calls, so tests can assert the model was never
    /// touched on short-circuit paths. Batch calls from index building are
    /// not counted.
    embed_calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            default,
            embed_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        self.vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

impl Embedder for StubEmbedder {
    fn name(&self) -> &str {
        "stub"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.lookup(text)).collect())
    }
}

/// Engine wired to a stub embedder and the builtin knowledge base.
pub fn create_engine(embedder: Arc<StubEmbedder>) -> ChatEngine {
    ChatEngine::new(embedder, KnowledgeBase::builtin(), SelectionPolicy::default())
        .expect("failed to build engine")
}
