use super::syllable::{Syllable, SyllableTemplate};
use super::StressType;
use crate::error::DriftError;
use crate::phoneme::{ChangingPhoneme, Phoneme, PhonemeInventory, Prosody};
use crate::DriftResult;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SpeechPart {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Numeral,
    Particle,
}

impl SpeechPart {
    pub const ALL: [SpeechPart; 7] = [
        SpeechPart::Noun,
        SpeechPart::Verb,
        SpeechPart::Adjective,
        SpeechPart::Adverb,
        SpeechPart::Pronoun,
        SpeechPart::Numeral,
        SpeechPart::Particle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpeechPart::Noun => "noun",
            SpeechPart::Verb => "verb",
            SpeechPart::Adjective => "adjective",
            SpeechPart::Adverb => "adverb",
            SpeechPart::Pronoun => "pronoun",
            SpeechPart::Numeral => "numeral",
            SpeechPart::Particle => "particle",
        }
    }
}

impl fmt::Display for SpeechPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SpeechPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpeechPart::ALL
            .iter()
            .find(|part| part.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown speech part '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MorphemeKind {
    Root,
    Affix,
}

/// A run of `len` consecutive phonemes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Morpheme {
    pub len: usize,
    pub kind: MorphemeKind,
}

impl Morpheme {
    pub fn root(len: usize) -> Self {
        Self {
            len,
            kind: MorphemeKind::Root,
        }
    }

    pub fn affix(len: usize) -> Self {
        Self {
            len,
            kind: MorphemeKind::Affix,
        }
    }
}

/// A lexical word with its syllable and morpheme structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Word {
    pub phonemes: Vec<Phoneme>,
    pub syllables: Vec<Syllable>,
    pub morphemes: Vec<Morpheme>,
    pub template: SyllableTemplate,
    pub speech_part: SpeechPart,
    pub gloss: String,
    /// Word class tags used by paradigm filters
    pub tags: BTreeSet<String>,
}

impl Word {
    /// A single-root word; fails when `template` cannot syllabify it
    pub fn new(
        phonemes: Vec<Phoneme>,
        template: SyllableTemplate,
        speech_part: SpeechPart,
        gloss: impl Into<String>,
    ) -> DriftResult<Self> {
        let text: String = phonemes.iter().map(|p| p.symbol.as_str()).collect();
        let syllables = template.segment(&phonemes).ok_or_else(|| {
            DriftError::form(
                &text,
                format!("cannot be split into {} syllables", template),
            )
        })?;
        Ok(Self {
            morphemes: vec![Morpheme::root(phonemes.len())],
            phonemes,
            syllables,
            template,
            speech_part,
            gloss: gloss.into(),
            tags: BTreeSet::new(),
        })
    }

    /// Spell a word with the symbols of `inventory`
    pub fn from_text(
        text: &str,
        inventory: &PhonemeInventory,
        template: SyllableTemplate,
        speech_part: SpeechPart,
        gloss: impl Into<String>,
    ) -> DriftResult<Self> {
        let phonemes = inventory
            .segment(text)
            .map_err(|symbol| DriftError::UnknownPhoneme {
                symbol,
                text: text.to_string(),
            })?;
        Self::new(phonemes, template, speech_part, gloss)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Mark syllable `index` as stressed, for lexical stress
    pub fn with_stress_on(mut self, index: usize) -> Self {
        if let Some(syllable) = self.syllables.get_mut(index) {
            syllable.prosody.insert(Prosody::Stress);
        }
        self
    }

    /// Place predictable stress; lexical stress is left as stored
    pub fn with_stress(mut self, stress: StressType) -> Self {
        stress.place(&mut self.syllables);
        self
    }

    pub fn text(&self) -> String {
        self.phonemes.iter().map(|p| p.symbol.as_str()).collect()
    }

    /// Text with syllable breaks and stress marks, e.g. `ˈba.ca`
    pub fn transcription(&self) -> String {
        self.syllables
            .iter()
            .map(|s| {
                let body: String = self.phonemes[s.start..s.end()]
                    .iter()
                    .map(|p| p.symbol.as_str())
                    .collect();
                if s.is_stressed() {
                    format!("ˈ{}", body)
                } else {
                    body
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn stressed_syllables(&self) -> usize {
        self.syllables.iter().filter(|s| s.is_stressed()).count()
    }

    /// Prosody of the syllable holding phoneme `index`
    pub fn prosody_at(&self, index: usize) -> BTreeSet<Prosody> {
        self.syllables
            .iter()
            .find(|s| s.contains(index))
            .map(|s| s.prosody.clone())
            .unwrap_or_default()
    }

    /// Morpheme index of every phoneme
    pub fn morpheme_indices(&self) -> Vec<usize> {
        self.morphemes
            .iter()
            .enumerate()
            .flat_map(|(i, m)| std::iter::repeat(i).take(m.len))
            .collect()
    }

    /// For every slot of [`Word::to_changing`], whether it holds affix material
    pub fn affix_slots(&self) -> Vec<bool> {
        let mut slots = Vec::with_capacity(self.phonemes.len() + 2);
        slots.push(false);
        for morpheme in &self.morphemes {
            let affix = morpheme.kind == MorphemeKind::Affix;
            slots.extend(std::iter::repeat(affix).take(morpheme.len));
        }
        slots.resize(self.phonemes.len() + 2, false);
        slots
    }

    /// Slot stream with word boundaries and syllable prosody on every phoneme
    pub fn to_changing(&self) -> Vec<ChangingPhoneme> {
        let mut slots = Vec::with_capacity(self.phonemes.len() + 2);
        slots.push(ChangingPhoneme::Boundary);
        for (i, phoneme) in self.phonemes.iter().enumerate() {
            slots.push(ChangingPhoneme::with_prosody(
                phoneme.clone(),
                self.prosody_at(i),
            ));
        }
        slots.push(ChangingPhoneme::Boundary);
        slots
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
