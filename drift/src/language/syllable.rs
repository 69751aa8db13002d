//! Syllable templates and syllabification

use crate::phoneme::{Phoneme, Prosody};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One syllable of a word, as a range of phoneme indices
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Syllable {
    pub start: usize,
    pub len: usize,
    pub prosody: BTreeSet<Prosody>,
}

impl Syllable {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            len,
            prosody: BTreeSet::new(),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    /// Index of the syllable's vowel
    pub fn nucleus(&self, phonemes: &[Phoneme]) -> Option<usize> {
        (self.start..self.end()).find(|&i| phonemes.get(i).is_some_and(|p| p.is_vowel()))
    }

    pub fn is_stressed(&self) -> bool {
        self.prosody.contains(&Prosody::Stress)
    }
}

/// Shape `C{0..max_onset} V C{0..max_coda}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SyllableTemplate {
    pub max_onset: usize,
    pub max_coda: usize,
}

impl SyllableTemplate {
    pub fn new(max_onset: usize, max_coda: usize) -> Self {
        Self {
            max_onset,
            max_coda,
        }
    }

    /// Split `phonemes` into syllables, one per vowel.
    ///
    /// Medial consonants go to the onset first. `None` when the sequence has
    /// no vowel or a cluster does not fit.
    pub fn segment(&self, phonemes: &[Phoneme]) -> Option<Vec<Syllable>> {
        let vowels: Vec<usize> = phonemes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_vowel())
            .map(|(i, _)| i)
            .collect();
        let (&first, &last) = (vowels.first()?, vowels.last()?);
        if first > self.max_onset || phonemes.len() - 1 - last > self.max_coda {
            return None;
        }

        let mut starts = vec![0];
        for pair in vowels.windows(2) {
            let cluster = pair[1] - pair[0] - 1;
            let onset = cluster.min(self.max_onset);
            if cluster - onset > self.max_coda {
                return None;
            }
            starts.push(pair[1] - onset);
        }

        let mut syllables = Vec::with_capacity(starts.len());
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(phonemes.len());
            syllables.push(Syllable::new(start, end - start));
        }
        Some(syllables)
    }
}

impl Default for SyllableTemplate {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for SyllableTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}V{}",
            "(C)".repeat(self.max_onset),
            "(C)".repeat(self.max_coda)
        )
    }
}

/// The smallest extension of `start` that can segment `phonemes`.
///
/// Tries every split of `0..=max_extra_slots` additional slots between onset
/// and coda, smallest total first and onset growth first.
pub fn reanalyze_syllable_structure(
    phonemes: &[Phoneme],
    start: SyllableTemplate,
    max_extra_slots: usize,
) -> Option<SyllableTemplate> {
    for extra in 0..=max_extra_slots {
        for onset_extra in (0..=extra).rev() {
            let candidate = SyllableTemplate::new(
                start.max_onset + onset_extra,
                start.max_coda + extra - onset_extra,
            );
            if candidate.segment(phonemes).is_some() {
                return Some(candidate);
            }
        }
    }
    None
}
