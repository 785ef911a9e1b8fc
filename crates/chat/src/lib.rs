//! Multilingual scripture chat pipeline.
//!
//! detect → normalize → translate to pivot → retrieve → assemble context →
//! generate grounded answer → translate back → attach sources.

pub mod engine;
pub mod formatter;
pub mod generator;
pub mod language;
pub mod model;
pub mod normalizer;
pub mod translation;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::ChatEngine;
pub use formatter::{ChatReply, ResponseFormatter, Sources};
pub use generator::{GroundedAnswerGenerator, NOT_ANSWERED};
pub use language::{Language, LanguageDetector, WhatlangDetector};
pub use model::GenerationModel;
pub use normalizer::normalize;
pub use translation::TranslationBridge;
pub use validation::{validate_message, MAX_MESSAGE_CHARS, MIN_MESSAGE_CHARS};
