//! Propagating a rule through everything that stores phonemes
//!
//! [`sequence`] rewrites raw slot streams, [`word`] rebuilds a word around the
//! rewritten phonemes, [`affix`] folds the rule into affix templates,
//! [`paradigm`] maps the rule over lexicon and paradigms, and [`language`]
//! decides whether the whole change is accepted.

pub mod affix;
pub mod language;
pub mod paradigm;
pub mod sequence;
pub mod word;

use crate::language::StressType;
use crate::phoneme::PhonemeInventory;
use crate::settings::ChangeSettings;

/// Everything rule application needs besides the rule and the data
#[derive(Debug, Clone, Copy)]
pub struct ApplicationContext<'a> {
    pub catalog: &'a PhonemeInventory,
    pub settings: &'a ChangeSettings,
    pub stress: StressType,
}

impl<'a> ApplicationContext<'a> {
    pub fn new(
        catalog: &'a PhonemeInventory,
        settings: &'a ChangeSettings,
        stress: StressType,
    ) -> Self {
        Self {
            catalog,
            settings,
            stress,
        }
    }
}

pub use language::apply_to_language;
pub use sequence::{apply_first_matching, apply_to_sequence};
pub use word::{apply_to_word, WordChange};
