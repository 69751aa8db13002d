//! Phonemes, their features and the containers that hold them
//!
//! A [`Phoneme`] is an immutable sound unit. A [`PhonemeInventory`] is an
//! ordered set of phonemes; the engine keeps one as its *catalog* (every
//! phoneme it knows how to spell) and every language keeps one as the set of
//! phonemes it actually uses.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Broad class of a phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PhonemeType {
    Vowel,
    Consonant,
}

impl fmt::Display for PhonemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhonemeType::Vowel => write!(f, "V"),
            PhonemeType::Consonant => write!(f, "C"),
        }
    }
}

/// Articulatory features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Feature {
    Voiced,
    Nasal,
    Plosive,
    Fricative,
    Affricate,
    Approximant,
    Lateral,
    Trill,
    Labial,
    Dental,
    Alveolar,
    Postalveolar,
    Palatal,
    Velar,
    Glottal,
    Front,
    Central,
    Back,
    High,
    Mid,
    Low,
    Rounded,
    Long,
}

impl Feature {
    pub const ALL: [Feature; 23] = [
        Feature::Voiced,
        Feature::Nasal,
        Feature::Plosive,
        Feature::Fricative,
        Feature::Affricate,
        Feature::Approximant,
        Feature::Lateral,
        Feature::Trill,
        Feature::Labial,
        Feature::Dental,
        Feature::Alveolar,
        Feature::Postalveolar,
        Feature::Palatal,
        Feature::Velar,
        Feature::Glottal,
        Feature::Front,
        Feature::Central,
        Feature::Back,
        Feature::High,
        Feature::Mid,
        Feature::Low,
        Feature::Rounded,
        Feature::Long,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Voiced => "Voiced",
            Feature::Nasal => "Nasal",
            Feature::Plosive => "Plosive",
            Feature::Fricative => "Fricative",
            Feature::Affricate => "Affricate",
            Feature::Approximant => "Approximant",
            Feature::Lateral => "Lateral",
            Feature::Trill => "Trill",
            Feature::Labial => "Labial",
            Feature::Dental => "Dental",
            Feature::Alveolar => "Alveolar",
            Feature::Postalveolar => "Postalveolar",
            Feature::Palatal => "Palatal",
            Feature::Velar => "Velar",
            Feature::Glottal => "Glottal",
            Feature::Front => "Front",
            Feature::Central => "Central",
            Feature::Back => "Back",
            Feature::High => "High",
            Feature::Mid => "Mid",
            Feature::Low => "Low",
            Feature::Rounded => "Rounded",
            Feature::Long => "Long",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .find(|feature| feature.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown feature '{}'", s))
    }
}

/// Suprasegmental marks carried by a syllable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Prosody {
    Stress,
}

impl Prosody {
    pub fn name(&self) -> &'static str {
        match self {
            Prosody::Stress => "Stress",
        }
    }
}

impl fmt::Display for Prosody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Prosody {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stress" => Ok(Prosody::Stress),
            _ => Err(format!("Unknown prosody '{}'", s)),
        }
    }
}

/// A single sound unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Phoneme {
    pub symbol: String,
    pub kind: PhonemeType,
    pub features: BTreeSet<Feature>,
}

impl Phoneme {
    pub fn new(symbol: impl Into<String>, kind: PhonemeType, features: &[Feature]) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            features: features.iter().copied().collect(),
        }
    }

    pub fn vowel(symbol: impl Into<String>, features: &[Feature]) -> Self {
        Self::new(symbol, PhonemeType::Vowel, features)
    }

    pub fn consonant(symbol: impl Into<String>, features: &[Feature]) -> Self {
        Self::new(symbol, PhonemeType::Consonant, features)
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn is_vowel(&self) -> bool {
        self.kind == PhonemeType::Vowel
    }

    /// The feature set after applying `changes`
    pub fn modified_features(&self, changes: &[FeatureChange]) -> BTreeSet<Feature> {
        let mut features = self.features.clone();
        for change in changes {
            if change.present {
                features.insert(change.feature);
            } else {
                features.remove(&change.feature);
            }
        }
        features
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// One signed feature, e.g. `+Voiced` or `-Nasal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FeatureChange {
    pub feature: Feature,
    pub present: bool,
}

impl FeatureChange {
    pub fn add(feature: Feature) -> Self {
        Self {
            feature,
            present: true,
        }
    }

    pub fn remove(feature: Feature) -> Self {
        Self {
            feature,
            present: false,
        }
    }
}

impl fmt::Display for FeatureChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.present { '+' } else { '-' };
        write!(f, "{}{}", sign, self.feature)
    }
}

/// Ordered, duplicate-free collection of phonemes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhonemeInventory {
    phonemes: Vec<Phoneme>,
}

impl PhonemeInventory {
    pub fn new(phonemes: impl IntoIterator<Item = Phoneme>) -> Self {
        let mut inventory = Self::default();
        for phoneme in phonemes {
            inventory.insert(phoneme);
        }
        inventory
    }

    pub fn insert(&mut self, phoneme: Phoneme) {
        if !self.phonemes.contains(&phoneme) {
            self.phonemes.push(phoneme);
        }
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phoneme> {
        self.phonemes.iter()
    }

    pub fn len(&self) -> usize {
        self.phonemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    pub fn contains(&self, phoneme: &Phoneme) -> bool {
        self.phonemes.contains(phoneme)
    }

    pub fn get(&self, symbol: &str) -> Option<&Phoneme> {
        self.phonemes.iter().find(|p| p.symbol == symbol)
    }

    /// The phoneme of the same type whose features equal `phoneme`'s after `changes`
    pub fn modify(&self, phoneme: &Phoneme, changes: &[FeatureChange]) -> Option<&Phoneme> {
        let wanted = phoneme.modified_features(changes);
        self.phonemes
            .iter()
            .find(|p| p.kind == phoneme.kind && p.features == wanted)
    }

    /// Split `text` into phonemes, always taking the longest matching symbol
    pub fn segment(&self, text: &str) -> Result<Vec<Phoneme>, String> {
        let mut result = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let best = self
                .phonemes
                .iter()
                .filter(|p| !p.symbol.is_empty() && rest.starts_with(p.symbol.as_str()))
                .max_by_key(|p| p.symbol.len());
            match best {
                Some(phoneme) => {
                    rest = &rest[phoneme.symbol.len()..];
                    result.push(phoneme.clone());
                }
                None => {
                    let symbol: String = rest.chars().take(1).collect();
                    return Err(symbol);
                }
            }
        }
        Ok(result)
    }

    /// A broad IPA-like catalog used by the CLI and the tests
    pub fn default_catalog() -> Self {
        use Feature::*;
        let c = Phoneme::consonant;
        let v = Phoneme::vowel;
        Self::new(vec![
            c("p", &[Labial, Plosive]),
            c("b", &[Labial, Plosive, Voiced]),
            c("t", &[Alveolar, Plosive]),
            c("d", &[Alveolar, Plosive, Voiced]),
            c("c", &[Palatal, Plosive]),
            c("ɟ", &[Palatal, Plosive, Voiced]),
            c("k", &[Velar, Plosive]),
            c("g", &[Velar, Plosive, Voiced]),
            c("ʔ", &[Glottal, Plosive]),
            c("m", &[Labial, Nasal, Voiced]),
            c("n", &[Alveolar, Nasal, Voiced]),
            c("ŋ", &[Velar, Nasal, Voiced]),
            c("f", &[Labial, Fricative]),
            c("v", &[Labial, Fricative, Voiced]),
            c("θ", &[Dental, Fricative]),
            c("ð", &[Dental, Fricative, Voiced]),
            c("s", &[Alveolar, Fricative]),
            c("z", &[Alveolar, Fricative, Voiced]),
            c("ʃ", &[Postalveolar, Fricative]),
            c("ʒ", &[Postalveolar, Fricative, Voiced]),
            c("x", &[Velar, Fricative]),
            c("ɣ", &[Velar, Fricative, Voiced]),
            c("h", &[Glottal, Fricative]),
            c("ts", &[Alveolar, Affricate]),
            c("dz", &[Alveolar, Affricate, Voiced]),
            c("tʃ", &[Postalveolar, Affricate]),
            c("dʒ", &[Postalveolar, Affricate, Voiced]),
            c("l", &[Alveolar, Lateral, Approximant, Voiced]),
            c("r", &[Alveolar, Trill, Voiced]),
            c("j", &[Palatal, Approximant, Voiced]),
            c("w", &[Labial, Velar, Approximant, Voiced]),
            v("i", &[Front, High, Voiced]),
            v("y", &[Front, High, Rounded, Voiced]),
            v("e", &[Front, Mid, Voiced]),
            v("ɛ", &[Front, Low, Voiced]),
            v("a", &[Central, Low, Voiced]),
            v("ə", &[Central, Mid, Voiced]),
            v("ɨ", &[Central, High, Voiced]),
            v("o", &[Back, Mid, Rounded, Voiced]),
            v("u", &[Back, High, Rounded, Voiced]),
            v("ɔ", &[Back, Low, Rounded, Voiced]),
            v("iː", &[Front, High, Voiced, Long]),
            v("eː", &[Front, Mid, Voiced, Long]),
            v("aː", &[Central, Low, Voiced, Long]),
            v("oː", &[Back, Mid, Rounded, Voiced, Long]),
            v("uː", &[Back, High, Rounded, Voiced, Long]),
        ])
    }
}

impl<'a> IntoIterator for &'a PhonemeInventory {
    type Item = &'a Phoneme;
    type IntoIter = std::slice::Iter<'a, Phoneme>;

    fn into_iter(self) -> Self::IntoIter {
        self.phonemes.iter()
    }
}

/// One slot of a phoneme stream while a rule is being applied
///
/// Deleted phonemes and word edges keep their slot so that indices stay stable
/// for the whole pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangingPhoneme {
    Exact {
        phoneme: Phoneme,
        prosody: BTreeSet<Prosody>,
    },
    Deleted,
    Boundary,
}

impl ChangingPhoneme {
    pub fn exact(phoneme: Phoneme) -> Self {
        ChangingPhoneme::Exact {
            phoneme,
            prosody: BTreeSet::new(),
        }
    }

    pub fn with_prosody(phoneme: Phoneme, prosody: BTreeSet<Prosody>) -> Self {
        ChangingPhoneme::Exact { phoneme, prosody }
    }

    pub fn phoneme(&self) -> Option<&Phoneme> {
        match self {
            ChangingPhoneme::Exact { phoneme, .. } => Some(phoneme),
            ChangingPhoneme::Deleted | ChangingPhoneme::Boundary => None,
        }
    }
}

impl fmt::Display for ChangingPhoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangingPhoneme::Exact { phoneme, .. } => write!(f, "{}", phoneme),
            ChangingPhoneme::Deleted => write!(f, "-"),
            ChangingPhoneme::Boundary => write!(f, "$"),
        }
    }
}

/// Wrap plain phonemes in exact slots, optionally surrounded by boundaries
pub fn to_changing(phonemes: &[Phoneme], with_boundaries: bool) -> Vec<ChangingPhoneme> {
    let mut result = Vec::with_capacity(phonemes.len() + 2);
    if with_boundaries {
        result.push(ChangingPhoneme::Boundary);
    }
    result.extend(phonemes.iter().cloned().map(ChangingPhoneme::exact));
    if with_boundaries {
        result.push(ChangingPhoneme::Boundary);
    }
    result
}

/// Keep only surviving phonemes of a stream
pub fn surviving(phonemes: &[ChangingPhoneme]) -> Vec<Phoneme> {
    phonemes
        .iter()
        .filter_map(|p| p.phoneme().cloned())
        .collect()
}
