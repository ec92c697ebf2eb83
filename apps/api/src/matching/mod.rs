//! Resume ↔ job description matching engine.
//!
//! Vocabularies are built once and shared read-only; extraction and scoring
//! are synchronous pure functions over them. `handlers` is the only async,
//! HTTP-facing part.

pub mod batch;
pub mod experience;
pub mod handlers;
pub mod role_gap;
pub mod scorer;
pub mod skill_extractor;
pub mod vocabulary;
