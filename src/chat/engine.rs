//! Pipeline orchestration and response selection policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chat::classify;
use crate::config::{self, RetrievalConfig};
use crate::knowledge::{self, Category, KnowledgeBase};
use crate::semantic::{Embedder, EmbeddingError, IndexError, KnowledgeIndex};

/// One turn of inbound chat history.
///
/// Part of the request contract but never read by the matching logic:
/// requests are stateless and matching looks at the current message only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Score thresholds steering response selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPolicy {
    /// A match at or below this score is not trusted.
    pub accept_threshold: f32,

    /// Trend matches below this score answer with the full trends digest
    /// instead of the single best text. Stricter than `accept_threshold` on
    /// purpose: trend queries favor breadth over a moderately confident
    /// single pick.
    pub trends_digest_threshold: f32,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            accept_threshold: config::DEFAULT_ACCEPT_THRESHOLD,
            trends_digest_threshold: config::DEFAULT_TRENDS_DIGEST_THRESHOLD,
        }
    }
}

impl From<&RetrievalConfig> for SelectionPolicy {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            accept_threshold: config.accept_threshold,
            trends_digest_threshold: config.trends_digest_threshold,
        }
    }
}

/// Errors surfaced by the pipeline. Never retried: the input is already
/// validated text, so a failed computation would fail the same way again.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// The retrieval pipeline: greeting short-circuit, keyword routing, cosine
/// search over the knowledge index, threshold-based selection and fallback.
///
/// Everything inside is read-only after construction, so an
/// `Arc<ChatEngine>` is shared freely across concurrent request handlers.
pub struct ChatEngine {
    embedder: Arc<dyn Embedder>,
    index: KnowledgeIndex,
    kb: KnowledgeBase,
    policy: SelectionPolicy,
}

impl ChatEngine {
    /// Wire up the pipeline. Embeds the whole knowledge base, so this is the
    /// expensive part of startup; queries are served only once it returns.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        kb: KnowledgeBase,
        policy: SelectionPolicy,
    ) -> Result<Self, ChatError> {
        let index = KnowledgeIndex::build(&kb, embedder.as_ref())?;
        log::info!(
            "knowledge index built: {} items, {} dimensions",
            index.len(),
            index.dimensions()
        );

        Ok(Self {
            embedder,
            index,
            kb,
            policy,
        })
    }

    /// Model identifier reported in response metadata.
    pub fn model_name(&self) -> &str {
        self.embedder.name()
    }

    /// Whether the engine can serve queries: model loaded, index built.
    pub fn is_ready(&self) -> bool {
        !self.index.is_empty()
    }

    /// Answer a free-text message.
    ///
    /// `history` is accepted but deliberately unused; one request's history
    /// never affects another's answer.
    pub fn generate_response(
        &self,
        message: &str,
        _history: &[ChatTurn],
    ) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(knowledge::EMPTY_PROMPT.to_string());
        }

        let message_lower = message.to_lowercase();
        if classify::is_greeting(&message_lower) {
            return Ok(knowledge::GREETING.to_string());
        }

        let category = classify::classify(&message_lower);

        // The query is embedded exactly once; the same vector drives both the
        // knowledge search and fallback selection.
        let query = self.embedder.embed(message)?;
        let best = self.index.search(&query, category)?;

        if let Some(matched) = &best {
            if matched.score > self.policy.accept_threshold {
                if category == Some(Category::Trends)
                    && matched.score < self.policy.trends_digest_threshold
                {
                    return Ok(self.kb.trends_digest());
                }
                return Ok(matched.text.clone());
            }
            log::debug!(
                "best match in {} scored {:.3}, below acceptance",
                matched.category,
                matched.score
            );
        }

        // A literal style-name mention is trusted more than a weak embedding
        // score, but only when no category was classified.
        if category.is_none() {
            if let Some(description) = self.kb.style_matching(&message_lower) {
                return Ok(description.to_string());
            }
        }

        Ok(self.index.best_fallback(&query)?.to_string())
    }
}
