//! # phonodrift
//!
//! **Sound change for generated languages**
//!
//! phonodrift evolves a language snapshot by applying diachronic sound change
//! rules to everything that stores phonemes: the lexicon, affixes, particles,
//! derivations and compounds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phonodrift::{DriftResult, Engine, Language, SpeechPart, StressType};
//!
//! fn main() -> DriftResult<()> {
//!     let engine = Engine::new();
//!     let language = Language::new(StressType::Initial)
//!         .with_word(engine.word("aba", SpeechPart::Noun, "stone")?);
//!
//!     let rule = engine.parse_rule("a -> i / _")?;
//!     let outcome = engine.apply(&language, &rule);
//!     for message in &outcome.messages {
//!         println!("{}", message);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Rules
//! A rule reads `TARGET -> SUBSTITUTION / PRECEDING _ FOLLOWING`. Matchers
//! select slots by phoneme, type, feature or stress; substitutions replace,
//! modify, delete or insert phonemes. Rules can be composed, mirrored and
//! trimmed without applying them.
//!
//! ### Application
//! Applying a rule to a language rewrites every stored form. A change that
//! would leave a word without valid syllables is reverted for that word, and
//! a rule that changes nothing or breaks a paradigm is rejected as a whole.
//!
//! ### Sandhi
//! Rules that look across an affix boundary are folded into the affixes and
//! kept as live rules applied to every built word form.
//!
//! ### Selection
//! Drivers pick which rule happens next, either uniformly or following
//! tendencies that persist across generations.

pub mod applicability;
pub mod application;
pub mod ast;
pub mod engine;
pub mod error;
pub mod language;
pub mod outcome;
pub mod parser;
pub mod phoneme;
pub mod rule;
pub mod selection;
pub mod settings;

pub use ast::Span;
pub use engine::Engine;
pub use error::DriftError;
pub use language::affix::{Affix, Position, SingleChange, TemplateChange};
pub use language::paradigm::{CategoryApplicator, ChangeParadigm, WordForm};
pub use language::syllable::SyllableTemplate;
pub use language::word::{SpeechPart, Word};
pub use language::{Language, Lexis, StressType};
pub use outcome::Outcome;
pub use phoneme::{Feature, FeatureChange, Phoneme, PhonemeInventory, PhonemeType, Prosody};
pub use rule::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
pub use selection::{TendencyDriver, UniformDriver};
pub use settings::ChangeSettings;

/// Result type for phonodrift operations
pub type DriftResult<T> = Result<T, DriftError>;

#[cfg(test)]
mod tests;
