//! Inflection: how grammatical categories are expressed on words

use super::affix::{Affix, Position};
use super::word::{SpeechPart, Word};
use crate::application::word::apply_to_word_stems;
use crate::application::ApplicationContext;
use crate::error::DriftError;
use crate::rule::PhonologicalRule;
use crate::DriftResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// A word form: the main word plus any particles around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordForm {
    pub words: Vec<Word>,
    pub main: usize,
    /// Category values that produced this form, in cluster order
    pub categories: Vec<String>,
}

impl WordForm {
    pub fn new(word: Word) -> Self {
        Self {
            words: vec![word],
            main: 0,
            categories: Vec::new(),
        }
    }

    pub fn main_word(&self) -> &Word {
        &self.words[self.main]
    }

    fn with_main(mut self, word: Word) -> Self {
        self.words[self.main] = word;
        self
    }

    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A branch of a [`CategoryApplicator::Filter`]; `None` matches every word
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterBranch {
    pub tag: Option<String>,
    pub applicator: CategoryApplicator,
}

/// How one category value is expressed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryApplicator {
    Affix(Affix),
    /// A separate word next to the main word
    Particle { word: Word, position: Position },
    /// Copy of the first or last syllable
    Reduplication(Position),
    /// Replacement words, picked by the gloss of the main word
    Suppletion(Vec<Word>),
    /// First branch whose tag the main word carries
    Filter(Vec<FilterBranch>),
    Consecutive(Vec<CategoryApplicator>),
    Pass,
}

impl CategoryApplicator {
    pub fn apply(&self, form: WordForm, ctx: &ApplicationContext) -> Result<WordForm, String> {
        match self {
            CategoryApplicator::Pass => Ok(form),
            CategoryApplicator::Affix(affix) => {
                let word = form.main_word();
                let affixed = affix
                    .apply(word, ctx)
                    .ok_or_else(|| format!("affix {} does not attach to '{}'", affix, word))?;
                Ok(form.with_main(affixed))
            }
            CategoryApplicator::Particle { word, position } => {
                let mut form = form;
                match position {
                    Position::Beginning => {
                        form.words.insert(0, word.clone());
                        form.main += 1;
                    }
                    Position::End => form.words.push(word.clone()),
                }
                Ok(form)
            }
            CategoryApplicator::Reduplication(position) => {
                let word = form.main_word();
                let syllable = match position {
                    Position::Beginning => word.syllables.first(),
                    Position::End => word.syllables.last(),
                }
                .ok_or_else(|| format!("'{}' has no syllable to reduplicate", word))?;
                let copy = word.phonemes[syllable.start..syllable.end()].to_vec();
                let affix = match position {
                    Position::Beginning => Affix::prefix(copy),
                    Position::End => Affix::suffix(copy),
                };
                let reduplicated = affix
                    .apply(word, ctx)
                    .ok_or_else(|| format!("cannot reduplicate '{}'", word))?;
                Ok(form.with_main(reduplicated))
            }
            CategoryApplicator::Suppletion(words) => {
                let gloss = &form.main_word().gloss;
                match words.iter().find(|w| &w.gloss == gloss) {
                    Some(replacement) => {
                        let replacement = replacement.clone();
                        Ok(form.with_main(replacement))
                    }
                    None => Ok(form),
                }
            }
            CategoryApplicator::Filter(branches) => {
                let tags = &form.main_word().tags;
                let branch = branches
                    .iter()
                    .find(|b| b.tag.as_ref().map_or(true, |t| tags.contains(t)));
                match branch {
                    Some(branch) => branch.applicator.apply(form, ctx),
                    None => Ok(form),
                }
            }
            CategoryApplicator::Consecutive(applicators) => applicators
                .iter()
                .try_fold(form, |form, applicator| applicator.apply(form, ctx)),
        }
    }

    /// Every affix reachable from this applicator
    pub fn affixes(&self) -> Vec<&Affix> {
        match self {
            CategoryApplicator::Affix(affix) => vec![affix],
            CategoryApplicator::Filter(branches) => {
                branches.iter().flat_map(|b| b.applicator.affixes()).collect()
            }
            CategoryApplicator::Consecutive(applicators) => {
                applicators.iter().flat_map(|a| a.affixes()).collect()
            }
            CategoryApplicator::Particle { .. }
            | CategoryApplicator::Reduplication(_)
            | CategoryApplicator::Suppletion(_)
            | CategoryApplicator::Pass => Vec::new(),
        }
    }

    /// Every standalone word (particles and suppletive forms)
    pub fn words(&self) -> Vec<&Word> {
        match self {
            CategoryApplicator::Particle { word, .. } => vec![word],
            CategoryApplicator::Suppletion(words) => words.iter().collect(),
            CategoryApplicator::Filter(branches) => {
                branches.iter().flat_map(|b| b.applicator.words()).collect()
            }
            CategoryApplicator::Consecutive(applicators) => {
                applicators.iter().flat_map(|a| a.words()).collect()
            }
            CategoryApplicator::Affix(_)
            | CategoryApplicator::Reduplication(_)
            | CategoryApplicator::Pass => Vec::new(),
        }
    }
}

/// A set of categories expressed together, e.g. number or tense
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExponenceCluster {
    pub name: String,
    pub applicators: BTreeMap<String, CategoryApplicator>,
}

impl ExponenceCluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applicators: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>, applicator: CategoryApplicator) -> Self {
        self.applicators.insert(value.into(), applicator);
        self
    }
}

/// Ordered exponence clusters of one speech part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechPartChangeParadigm {
    pub speech_part: SpeechPart,
    pub clusters: Vec<ExponenceCluster>,
}

impl SpeechPartChangeParadigm {
    pub fn new(speech_part: SpeechPart) -> Self {
        Self {
            speech_part,
            clusters: Vec::new(),
        }
    }

    pub fn with_cluster(mut self, cluster: ExponenceCluster) -> Self {
        self.clusters.push(cluster);
        self
    }

    pub fn applicators(&self) -> impl Iterator<Item = &CategoryApplicator> {
        self.clusters.iter().flat_map(|c| c.applicators.values())
    }
}

/// Inflection of a whole language plus its live sandhi rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeParadigm {
    pub speech_parts: BTreeMap<SpeechPart, SpeechPartChangeParadigm>,
    /// Rules applied after every form is assembled
    pub sandhi_rules: Vec<PhonologicalRule>,
}

impl ChangeParadigm {
    pub fn with_paradigm(mut self, paradigm: SpeechPartChangeParadigm) -> Self {
        self.speech_parts.insert(paradigm.speech_part, paradigm);
        self
    }

    pub fn applicators(&self) -> impl Iterator<Item = &CategoryApplicator> {
        self.speech_parts.values().flat_map(|p| p.applicators())
    }

    pub fn affixes(&self) -> Vec<&Affix> {
        self.applicators().flat_map(|a| a.affixes()).collect()
    }

    pub fn has_affix_at(&self, position: Position) -> bool {
        self.affixes()
            .iter()
            .any(|a| a.position() == position && !a.is_empty())
    }

    /// Every form of `word`: one per combination of cluster values
    pub fn forms(&self, word: &Word, ctx: &ApplicationContext) -> DriftResult<Vec<WordForm>> {
        let mut forms = vec![WordForm::new(word.clone())];
        if let Some(paradigm) = self.speech_parts.get(&word.speech_part) {
            for cluster in paradigm.clusters.iter().filter(|c| !c.applicators.is_empty()) {
                let mut next = Vec::with_capacity(forms.len() * cluster.applicators.len());
                for form in &forms {
                    for (value, applicator) in &cluster.applicators {
                        let mut applied = applicator.apply(form.clone(), ctx).map_err(|reason| {
                            DriftError::form(
                                word.text(),
                                format!("{} {}: {}", cluster.name, value, reason),
                            )
                        })?;
                        applied.categories.push(value.clone());
                        next.push(applied);
                    }
                }
                forms = next;
            }
        }
        Ok(forms
            .into_iter()
            .map(|form| self.apply_sandhi(form, ctx))
            .collect())
    }

    /// Run the live sandhi rules over every word of `form`, skipping affixes
    pub fn apply_sandhi(&self, mut form: WordForm, ctx: &ApplicationContext) -> WordForm {
        for rule in &self.sandhi_rules {
            for word in &mut form.words {
                *word = apply_to_word_stems(word, rule, ctx).into_word(word);
            }
        }
        form
    }
}
