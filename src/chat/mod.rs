//! Query pipeline: greeting short-circuit, keyword category routing,
//! similarity search and response selection.

pub mod classify;
mod engine;

pub use engine::{ChatEngine, ChatError, ChatTurn, SelectionPolicy};
