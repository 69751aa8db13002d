//! Word formation: derivations and compounds

use super::affix::Affix;
use super::syllable::Syllable;
use super::word::{Morpheme, SpeechPart, Word};
use crate::application::word::Rebuilt;
use crate::application::ApplicationContext;
use crate::phoneme::Phoneme;
use serde::Serialize;
use std::collections::BTreeSet;

/// Builds a new word of `to` from a word of `from`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Derivation {
    pub affix: Affix,
    pub from: SpeechPart,
    pub to: SpeechPart,
    pub meaning: String,
}

impl Derivation {
    pub fn new(
        affix: Affix,
        from: SpeechPart,
        to: SpeechPart,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            affix,
            from,
            to,
            meaning: meaning.into(),
        }
    }

    /// The derived word; `None` for the wrong speech part or a failing affix
    pub fn derive(&self, word: &Word, ctx: &ApplicationContext) -> Option<Word> {
        if word.speech_part != self.from {
            return None;
        }
        let mut derived = self.affix.apply(word, ctx)?;
        derived.speech_part = self.to;
        derived.gloss = format!("{} ({})", word.gloss, self.meaning);
        Some(derived)
    }
}

/// Joins two words with an infix between them
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Compound {
    pub infix: Vec<Phoneme>,
    pub meaning: String,
}

impl Compound {
    pub fn new(infix: Vec<Phoneme>, meaning: impl Into<String>) -> Self {
        Self {
            infix,
            meaning: meaning.into(),
        }
    }

    /// `first + infix + second`, headed by `second`
    pub fn join(&self, first: &Word, second: &Word, ctx: &ApplicationContext) -> Option<Word> {
        let mut phonemes = first.phonemes.clone();
        phonemes.extend(self.infix.iter().cloned());
        phonemes.extend(second.phonemes.iter().cloned());

        let prosody = (0..first.phonemes.len())
            .map(|i| first.prosody_at(i))
            .chain(self.infix.iter().map(|_| BTreeSet::new()))
            .chain((0..second.phonemes.len()).map(|i| second.prosody_at(i)))
            .collect();

        let mut morphemes = first.morphemes.clone();
        if !self.infix.is_empty() {
            morphemes.push(Morpheme::affix(self.infix.len()));
        }
        morphemes.extend(second.morphemes.iter().cloned());

        let rebuilt = Rebuilt {
            phonemes,
            prosody,
            morphemes,
        };
        let (syllables, template): (Vec<Syllable>, _) =
            rebuilt.syllabify_or_reanalyze(first.template, ctx.settings.max_extra_slots)?;
        let mut joined = rebuilt.into_word(second, syllables, template, ctx.stress);
        joined.gloss = format!("{}-{} ({})", first.gloss, second.gloss, self.meaning);
        Some(joined)
    }
}

/// Word formation patterns of a language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivationParadigm {
    pub derivations: Vec<Derivation>,
    pub compounds: Vec<Compound>,
}

impl DerivationParadigm {
    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derivations.push(derivation);
        self
    }

    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.compounds.push(compound);
        self
    }

    pub fn phonemes(&self) -> impl Iterator<Item = &Phoneme> {
        self.derivations
            .iter()
            .flat_map(|d| d.affix.phonemes())
            .chain(self.compounds.iter().flat_map(|c| c.infix.iter()))
    }
}
