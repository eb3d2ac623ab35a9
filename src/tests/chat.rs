//! Integration tests for the full retrieval pipeline, driven through
//! `ChatEngine::generate_response` with a deterministic stub embedder.
//!
//! Every knowledge text embeds to the same default vector unless a test
//! overrides it, so scores (and therefore the selection policy branches) are
//! fully controlled per test.

use std::sync::Arc;

use crate::chat::ChatTurn;
use crate::knowledge::{Category, KnowledgeBase, EMPTY_PROMPT, GREETING};
use crate::tests::{create_engine, StubEmbedder};

fn default_vector() -> Vec<f32> {
    vec![1.0, 0.0, 0.0, 0.0]
}

#[test]
fn greeting_short_circuits_before_embedding() {
    let embedder = Arc::new(StubEmbedder::new(default_vector()));
    let engine = create_engine(embedder.clone());

    let response = engine.generate_response("Hello there!", &[]).unwrap();
    assert_eq!(response, GREETING);
    assert_eq!(embedder.embed_calls(), 0);
}

#[test]
fn greeting_wins_over_category_keywords() {
    let embedder = Arc::new(StubEmbedder::new(default_vector()));
    let engine = create_engine(embedder.clone());

    // Contains a trend keyword too; the greeting check runs first.
    let response = engine.generate_response("hey, any trends?", &[]).unwrap();
    assert_eq!(response, GREETING);
    assert_eq!(embedder.embed_calls(), 0);
}

#[test]
fn empty_message_never_touches_the_model() {
    let embedder = Arc::new(StubEmbedder::new(default_vector()));
    let engine = create_engine(embedder.clone());

    for message in ["", "   ", "\n\t "] {
        let response = engine.generate_response(message, &[]).unwrap();
        assert_eq!(response, EMPTY_PROMPT);
    }
    assert_eq!(embedder.embed_calls(), 0);
}

#[test]
fn confident_match_is_returned_verbatim() {
    let kb = KnowledgeBase::builtin();
    let target = kb.texts(Category::Accessories)[1].clone();

    // No category keyword in the query, so every category is scanned; only
    // the target accessory text lines up with the query vector.
    let query = "tell me about timeless watches";
    let embedder = Arc::new(
        StubEmbedder::new(default_vector())
            .with_vector(query, vec![0.0, 1.0, 0.0, 0.0])
            .with_vector(&target, vec![0.0, 1.0, 0.0, 0.0]),
    );
    let engine = create_engine(embedder.clone());

    let response = engine.generate_response(query, &[]).unwrap();
    assert_eq!(response, target);
    assert_eq!(embedder.embed_calls(), 1);
}

#[test]
fn moderate_trend_match_answers_with_the_digest() {
    // cos(query, default) = 0.4: above acceptance (0.3) but below the
    // stricter trends threshold (0.5).
    let query = "any new trends?";
    let query_vector = vec![0.4, 0.84_f32.sqrt(), 0.0, 0.0];
    let embedder =
        Arc::new(StubEmbedder::new(default_vector()).with_vector(query, query_vector));
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert_eq!(response, KnowledgeBase::builtin().trends_digest());
}

#[test]
fn strong_trend_match_returns_the_single_best_text() {
    // cos(query, default) = 0.8, clearing the digest threshold. All trend
    // texts tie, so the first one wins.
    let query = "latest oversized blazer trend";
    let embedder = Arc::new(
        StubEmbedder::new(default_vector()).with_vector(query, vec![0.8, 0.6, 0.0, 0.0]),
    );
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert_eq!(response, KnowledgeBase::builtin().texts(Category::Trends)[0]);
}

#[test]
fn other_categories_keep_the_single_threshold() {
    // Same 0.4 score as the digest test, but routed to colors: no digest
    // policy there, so the best match comes back verbatim.
    let query = "best colors for me?";
    let query_vector = vec![0.4, 0.84_f32.sqrt(), 0.0, 0.0];
    let embedder =
        Arc::new(StubEmbedder::new(default_vector()).with_vector(query, query_vector));
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert_eq!(response, KnowledgeBase::builtin().texts(Category::Colors)[0]);
}

#[test]
fn scoped_search_only_sees_the_classified_category() {
    let kb = KnowledgeBase::builtin();
    let outfit = kb.texts(Category::Outfits)[0].clone();

    // The query vector matches an outfits text perfectly, but "colors"
    // routes the search to the colors category, where everything scores
    // zero, so the style/fallback path is taken instead of the outfit text.
    let query = "colors?";
    let embedder = Arc::new(
        StubEmbedder::new(default_vector())
            .with_vector(query, vec![0.0, 1.0, 0.0, 0.0])
            .with_vector(&outfit, vec![0.0, 1.0, 0.0, 0.0]),
    );
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert_ne!(response, outfit);
    assert!(KnowledgeBase::builtin()
        .fallbacks()
        .iter()
        .any(|fallback| *fallback == response));
}

#[test]
fn literal_style_name_beats_a_weak_match() {
    // Orthogonal query vector: every score is 0, below acceptance. The word
    // "casual" appears verbatim, so its description is returned.
    let query = "something casual please";
    let embedder = Arc::new(
        StubEmbedder::new(default_vector()).with_vector(query, vec![0.0, 0.0, 0.0, 1.0]),
    );
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert!(response.starts_with("Casual style"));
}

#[test]
fn style_lookup_is_skipped_when_a_category_was_classified() {
    // "wear" routes to outfits; even though "casual" appears verbatim and the
    // match is weak, a classified category goes straight to fallback.
    let query = "casual wear zz";
    let embedder = Arc::new(
        StubEmbedder::new(default_vector()).with_vector(query, vec![0.0, 0.0, 0.0, 1.0]),
    );
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert!(KnowledgeBase::builtin()
        .fallbacks()
        .iter()
        .any(|fallback| *fallback == response));
}

#[test]
fn gibberish_falls_back_to_the_closest_utterance() {
    let kb = KnowledgeBase::builtin();
    let target = kb.fallbacks()[2].clone();

    let query = "asdkjasd";
    let embedder = Arc::new(
        StubEmbedder::new(default_vector())
            .with_vector(query, vec![0.0, 0.0, 0.0, 1.0])
            .with_vector(&target, vec![0.0, 0.0, 0.6, 0.8]),
    );
    let engine = create_engine(embedder);

    let response = engine.generate_response(query, &[]).unwrap();
    assert_eq!(response, target);
}

#[test]
fn chat_history_never_affects_the_answer() {
    let embedder = Arc::new(StubEmbedder::new(default_vector()));
    let engine = create_engine(embedder);

    let history = vec![
        ChatTurn {
            role: "user".to_string(),
            content: "hello".to_string(),
        },
        ChatTurn {
            role: "assistant".to_string(),
            content: GREETING.to_string(),
        },
    ];

    let query = "what accessories do I need";
    let with_history = engine.generate_response(query, &history).unwrap();
    let without_history = engine.generate_response(query, &[]).unwrap();
    assert_eq!(with_history, without_history);
}

#[test]
fn engine_reports_ready_after_build() {
    let embedder = Arc::new(StubEmbedder::new(default_vector()));
    let engine = create_engine(embedder);

    assert!(engine.is_ready());
    assert_eq!(engine.model_name(), "stub");
}

/// End-to-end with the real model. Run with: cargo test -- --ignored
#[test]
#[ignore = "requires model download"]
fn real_model_answers_a_color_question() {
    use crate::chat::{ChatEngine, SelectionPolicy};
    use crate::semantic::EmbeddingModel;

    let temp_dir = std::env::temp_dir().join("modiste-chat-e2e");
    let model = EmbeddingModel::new("all-MiniLM-L6-v2", temp_dir.clone(), None).unwrap();
    let engine = ChatEngine::new(
        Arc::new(model),
        KnowledgeBase::builtin(),
        SelectionPolicy::default(),
    )
    .unwrap();

    // "trending" routes this to trends; either the digest or a single trend
    // text is acceptable depending on the score.
    let response = engine
        .generate_response("What colors are trending?", &[])
        .unwrap();
    assert!(!response.is_empty());

    let kb = KnowledgeBase::builtin();
    let is_trend_answer = response == kb.trends_digest()
        || kb.texts(Category::Trends).iter().any(|t| *t == response);
    assert!(is_trend_answer, "unexpected response: {response}");

    let _ = std::fs::remove_dir_all(&temp_dir);
}
