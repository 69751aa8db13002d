//! The language snapshot a rule is applied to
//!
//! Everything here is plain data. The engine never mutates a [`Language`];
//! every change produces a new snapshot.

pub mod affix;
pub mod derivation;
pub mod paradigm;
pub mod syllable;
pub mod word;

use crate::phoneme::{Phoneme, PhonemeInventory, Prosody};
use affix::Position;
use derivation::{Compound, Derivation, DerivationParadigm};
use paradigm::{ChangeParadigm, SpeechPartChangeParadigm};
use serde::Serialize;
use syllable::Syllable;
use word::Word;

/// Where stress falls in a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StressType {
    Unstressed,
    Initial,
    Penultimate,
    Final,
    /// Stored per morpheme rather than derived from syllable count
    Lexical,
}

impl StressType {
    pub fn is_predictable(&self) -> bool {
        !matches!(self, StressType::Lexical)
    }

    pub fn has_stress(&self) -> bool {
        !matches!(self, StressType::Unstressed)
    }

    /// Recompute predictable stress; lexical stress is left alone
    pub fn place(&self, syllables: &mut [Syllable]) {
        let count = syllables.len();
        let stressed = match self {
            StressType::Lexical => return,
            StressType::Unstressed => None,
            StressType::Initial => Some(0),
            StressType::Penultimate => Some(count.saturating_sub(2)),
            StressType::Final => Some(count.saturating_sub(1)),
        };
        for (i, syllable) in syllables.iter_mut().enumerate() {
            if Some(i) == stressed {
                syllable.prosody.insert(Prosody::Stress);
            } else {
                syllable.prosody.remove(&Prosody::Stress);
            }
        }
    }
}

/// The stored words of a language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lexis {
    pub words: Vec<Word>,
}

impl Lexis {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn by_gloss(&self, gloss: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.gloss == gloss)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub lexis: Lexis,
    /// Phonemes the language actually uses, in order of first appearance
    pub phonemes: PhonemeInventory,
    pub stress: StressType,
    pub derivation_paradigm: DerivationParadigm,
    pub change_paradigm: ChangeParadigm,
}

impl Language {
    pub fn new(stress: StressType) -> Self {
        Self {
            lexis: Lexis::default(),
            phonemes: PhonemeInventory::default(),
            stress,
            derivation_paradigm: DerivationParadigm::default(),
            change_paradigm: ChangeParadigm::default(),
        }
    }

    /// Add a word, placing predictable stress
    pub fn with_word(mut self, word: Word) -> Self {
        self.lexis.words.push(word.with_stress(self.stress));
        self.with_recomputed_inventory()
    }

    pub fn with_paradigm(mut self, paradigm: SpeechPartChangeParadigm) -> Self {
        self.change_paradigm = self.change_paradigm.with_paradigm(paradigm);
        self.with_recomputed_inventory()
    }

    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derivation_paradigm = self.derivation_paradigm.with_derivation(derivation);
        self.with_recomputed_inventory()
    }

    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.derivation_paradigm = self.derivation_paradigm.with_compound(compound);
        self.with_recomputed_inventory()
    }

    pub fn has_prefixes(&self) -> bool {
        self.change_paradigm.has_affix_at(Position::Beginning)
    }

    pub fn has_suffixes(&self) -> bool {
        self.change_paradigm.has_affix_at(Position::End)
    }

    /// Every phoneme stored anywhere in the language
    pub fn stored_phonemes(&self) -> Vec<&Phoneme> {
        let mut phonemes: Vec<&Phoneme> = self.lexis.iter().flat_map(|w| w.phonemes.iter()).collect();
        for applicator in self.change_paradigm.applicators() {
            for affix in applicator.affixes() {
                phonemes.extend(affix.phonemes());
            }
            for word in applicator.words() {
                phonemes.extend(word.phonemes.iter());
            }
        }
        phonemes.extend(self.derivation_paradigm.phonemes());
        for rule in &self.change_paradigm.sandhi_rules {
            phonemes.extend(rule.substitutions().iter().filter_map(|s| s.produced()));
        }
        phonemes
    }

    /// Keep the old inventory order, drop unused phonemes, append new ones
    pub fn with_recomputed_inventory(mut self) -> Self {
        let stored = self.stored_phonemes();
        let mut inventory = PhonemeInventory::new(
            self.phonemes
                .iter()
                .filter(|p| stored.contains(p))
                .cloned(),
        );
        for phoneme in stored {
            inventory.insert(phoneme.clone());
        }
        self.phonemes = inventory;
        self
    }
}
