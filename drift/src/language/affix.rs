//! Affixes and the stem changes they trigger
//!
//! A [`SingleChange`] is stored in surface order: for a prefix the matchers
//! read the stem from its first phoneme on, for a suffix they read the last
//! stem phonemes. [`TemplateChange::mirror`] turns a suffix change into the
//! equivalent prefix change, which is the only orientation the engine
//! applies.

use crate::application::sequence::{rewrite_at, Rewrite};
use crate::application::word::Rebuilt;
use crate::application::ApplicationContext;
use crate::error::DriftError;
use crate::language::word::Word;
use crate::phoneme::{ChangingPhoneme, Phoneme, PhonemeInventory};
use crate::rule::window::{Column, Window};
use crate::rule::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
use crate::DriftResult;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Position {
    Beginning,
    End,
}

/// Affix phonemes plus the stem edge they require and change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SingleChange {
    affix: Vec<Phoneme>,
    matchers: Vec<PhonemeMatcher>,
    substitutions: Vec<PhonemeSubstitution>,
}

impl SingleChange {
    pub fn new(
        affix: Vec<Phoneme>,
        matchers: Vec<PhonemeMatcher>,
        substitutions: Vec<PhonemeSubstitution>,
    ) -> DriftResult<Self> {
        let aligned = substitutions.iter().filter(|s| !s.is_epenthesis()).count();
        if aligned != matchers.len() {
            return Err(DriftError::invalid_rule(format!(
                "affix change has {} stem matchers but {} stem substitutions",
                matchers.len(),
                aligned
            )));
        }
        Ok(Self {
            affix,
            matchers,
            substitutions,
        })
    }

    /// An affix that attaches to every stem without changing it
    pub fn literal(affix: Vec<Phoneme>) -> Self {
        Self {
            affix,
            matchers: Vec::new(),
            substitutions: Vec::new(),
        }
    }

    pub fn affix(&self) -> &[Phoneme] {
        &self.affix
    }

    pub fn matchers(&self) -> &[PhonemeMatcher] {
        &self.matchers
    }

    pub fn substitutions(&self) -> &[PhonemeSubstitution] {
        &self.substitutions
    }

    /// Same stem change, different affix phonemes
    pub fn with_affix(&self, affix: Vec<Phoneme>) -> Self {
        Self {
            affix,
            matchers: self.matchers.clone(),
            substitutions: self.substitutions.clone(),
        }
    }

    pub fn is_unconditional(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Adds nothing and changes nothing
    pub fn is_empty(&self) -> bool {
        self.affix.is_empty() && !self.substitutions.iter().any(|s| s.is_change())
    }

    pub fn mirror(&self) -> Self {
        Self {
            affix: self.affix.iter().rev().cloned().collect(),
            matchers: self.matchers.iter().rev().cloned().collect(),
            substitutions: self.substitutions.iter().rev().cloned().collect(),
        }
    }

    /// Every phoneme this change can put into a word
    pub fn phonemes(&self) -> impl Iterator<Item = &Phoneme> {
        self.affix
            .iter()
            .chain(self.substitutions.iter().filter_map(|s| s.produced()))
    }

    /// Column form in prefix orientation: the word boundary, then the stem columns
    pub(crate) fn to_window(&self) -> Window {
        let mut columns = vec![Column::context(PhonemeMatcher::Boundary)];
        columns.extend(self.matchers.iter().cloned().map(Column::context));
        let mut tail = Vec::new();

        let mut pending = self.affix.clone();
        let mut cursor = 1;
        for substitution in &self.substitutions {
            match substitution {
                PhonemeSubstitution::Epenthesis(phoneme) => pending.push(phoneme.clone()),
                other => {
                    if let Some(column) = columns.get_mut(cursor) {
                        column.before = std::mem::take(&mut pending);
                        column.substitution = other.clone();
                    }
                    cursor += 1;
                }
            }
        }
        match columns.get_mut(cursor) {
            Some(column) => column.before = pending,
            None => tail = pending,
        }

        Window {
            columns,
            tail,
            allow_syllable_structure_change: false,
        }
    }

    /// Inverse of [`Self::to_window`]; the boundary column's own substitution is ignored
    pub(crate) fn from_window(window: Window) -> Option<Self> {
        let mut columns = window.columns.into_iter();
        let boundary = columns.next()?;
        if !boundary.matcher.is_boundary() {
            return None;
        }
        let stem: Vec<Column> = columns.collect();

        let mut affix = Vec::new();
        let mut matchers = Vec::with_capacity(stem.len());
        let mut substitutions = Vec::new();
        for (j, column) in stem.into_iter().enumerate() {
            if j == 0 {
                affix = column.before;
            } else {
                substitutions.extend(column.before.into_iter().map(PhonemeSubstitution::Epenthesis));
            }
            matchers.push(column.matcher);
            substitutions.push(column.substitution);
        }
        if matchers.is_empty() {
            affix = window.tail;
        } else {
            substitutions.extend(window.tail.into_iter().map(PhonemeSubstitution::Epenthesis));
        }

        Some(Self {
            affix,
            matchers,
            substitutions,
        })
    }

    /// The change as a rule anchored at the start boundary
    pub fn as_rule(&self) -> PhonologicalRule {
        self.to_window().into_rule()
    }

    /// Attach to `stem`, a boundary-wrapped slot stream in prefix orientation
    pub(crate) fn rewrite_stem(
        &self,
        stem: &[ChangingPhoneme],
        catalog: &PhonemeInventory,
    ) -> Option<Rewrite> {
        rewrite_at(stem, &self.as_rule(), 0, catalog)
    }
}

impl fmt::Display for SingleChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let affix: String = self.affix.iter().map(|p| p.symbol.as_str()).collect();
        write!(f, "{}", affix)?;
        if !self.matchers.is_empty() {
            let matchers: String = self.matchers.iter().map(|m| m.to_string()).collect();
            let substitutions: String = self.substitutions.iter().map(|s| s.to_string()).collect();
            write!(f, "[{} -> {}]", matchers, substitutions)?;
        }
        Ok(())
    }
}

/// One or more alternatives, tried in order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateChange {
    Single(SingleChange),
    Sequence(Vec<SingleChange>),
}

impl TemplateChange {
    /// Build the simplest change equivalent to trying `alternatives` in order
    pub fn from_alternatives(alternatives: Vec<SingleChange>) -> Self {
        let mut unique: Vec<SingleChange> = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            if unique.contains(&alternative) {
                continue;
            }
            let unconditional = alternative.is_unconditional();
            unique.push(alternative);
            if unconditional {
                break;
            }
        }

        let mut i = 0;
        while i + 1 < unique.len() {
            if is_subsumed_by(&unique[i], &unique[i + 1]) {
                unique.remove(i);
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }

        match unique.len() {
            0 => TemplateChange::Single(SingleChange::literal(Vec::new())),
            1 => TemplateChange::Single(unique.remove(0)),
            _ => TemplateChange::Sequence(unique),
        }
    }

    pub fn alternatives(&self) -> &[SingleChange] {
        match self {
            TemplateChange::Single(change) => std::slice::from_ref(change),
            TemplateChange::Sequence(changes) => changes,
        }
    }

    pub fn mirror(&self) -> Self {
        match self {
            TemplateChange::Single(change) => TemplateChange::Single(change.mirror()),
            TemplateChange::Sequence(changes) => {
                TemplateChange::Sequence(changes.iter().map(|c| c.mirror()).collect())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives().iter().all(|a| a.is_empty())
    }
}

/// `specific` can be dropped in front of `general` when both produce the same
/// output and `general` accepts whatever `specific` accepts
fn is_subsumed_by(specific: &SingleChange, general: &SingleChange) -> bool {
    specific.affix == general.affix
        && specific.substitutions == general.substitutions
        && specific.matchers.len() == general.matchers.len()
        && specific
            .matchers
            .iter()
            .zip(&general.matchers)
            .all(|(s, g)| s.implies(g))
}

impl fmt::Display for TemplateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.alternatives().iter().map(|a| a.to_string()).collect();
        write!(f, "{}", rendered.join("|"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Affix {
    Prefix(TemplateChange),
    Suffix(TemplateChange),
}

impl Affix {
    pub fn prefix(phonemes: Vec<Phoneme>) -> Self {
        Affix::Prefix(TemplateChange::Single(SingleChange::literal(phonemes)))
    }

    pub fn suffix(phonemes: Vec<Phoneme>) -> Self {
        Affix::Suffix(TemplateChange::Single(SingleChange::literal(phonemes)))
    }

    pub fn position(&self) -> Position {
        match self {
            Affix::Prefix(_) => Position::Beginning,
            Affix::Suffix(_) => Position::End,
        }
    }

    pub fn change(&self) -> &TemplateChange {
        match self {
            Affix::Prefix(change) | Affix::Suffix(change) => change,
        }
    }

    /// Same position, different change
    pub fn with_change(&self, change: TemplateChange) -> Self {
        match self {
            Affix::Prefix(_) => Affix::Prefix(change),
            Affix::Suffix(_) => Affix::Suffix(change),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.change().is_empty()
    }

    pub fn phonemes(&self) -> impl Iterator<Item = &Phoneme> {
        self.change().alternatives().iter().flat_map(|a| a.phonemes())
    }

    /// The change in prefix orientation
    pub(crate) fn oriented_change(&self) -> TemplateChange {
        match self {
            Affix::Prefix(change) => change.clone(),
            Affix::Suffix(change) => change.mirror(),
        }
    }

    /// Attach the affix to `word`; `None` when no alternative accepts the stem
    /// or the result cannot be syllabified
    pub fn apply(&self, word: &Word, ctx: &ApplicationContext) -> Option<Word> {
        let position = self.position();
        let mut stem = word.to_changing();
        if position == Position::End {
            stem.reverse();
        }

        let change = self.oriented_change();
        let rewrite = change
            .alternatives()
            .iter()
            .find_map(|alternative| alternative.rewrite_stem(&stem, ctx.catalog))?;
        let rewrite = match position {
            Position::Beginning => rewrite,
            Position::End => rewrite.mirror(),
        };

        let rebuilt = Rebuilt::from_rewrite(word, &rewrite, Some(position));
        if rebuilt.phonemes.is_empty() {
            return None;
        }
        let (syllables, template) =
            rebuilt.syllabify_or_reanalyze(word.template, ctx.settings.max_extra_slots)?;
        Some(rebuilt.into_word(word, syllables, template, ctx.stress))
    }
}

impl fmt::Display for Affix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Affix::Prefix(change) => write!(f, "{}-", change),
            Affix::Suffix(change) => write!(f, "-{}", change),
        }
    }
}
