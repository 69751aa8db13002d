//! Column view of a rule
//!
//! Every matcher becomes a column carrying the substitution aligned with it
//! and the phonemes inserted right before it. Phonemes inserted after the
//! last column live in `tail`. Context and target are not distinguished here;
//! converting back puts every column between the first and the last change in
//! the target.

use super::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
use crate::phoneme::Phoneme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Column {
    pub matcher: PhonemeMatcher,
    pub before: Vec<Phoneme>,
    pub substitution: PhonemeSubstitution,
}

impl Column {
    pub fn context(matcher: PhonemeMatcher) -> Self {
        Self {
            matcher,
            before: Vec::new(),
            substitution: PhonemeSubstitution::Pass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Window {
    pub columns: Vec<Column>,
    pub tail: Vec<Phoneme>,
    pub allow_syllable_structure_change: bool,
}

impl Window {
    pub fn from_rule(rule: &PhonologicalRule) -> Self {
        let mut columns: Vec<Column> = rule.matchers().cloned().map(Column::context).collect();
        let mut tail = Vec::new();
        let mut cursor = rule.preceding().len();
        for substitution in rule.substitutions() {
            match substitution {
                PhonemeSubstitution::Epenthesis(phoneme) => match columns.get_mut(cursor) {
                    Some(column) => column.before.push(phoneme.clone()),
                    None => tail.push(phoneme.clone()),
                },
                other => {
                    if let Some(column) = columns.get_mut(cursor) {
                        column.substitution = other.clone();
                    }
                    cursor += 1;
                }
            }
        }
        Self {
            columns,
            tail,
            allow_syllable_structure_change: rule.allow_syllable_structure_change(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.tail.is_empty()
            || self
                .columns
                .iter()
                .any(|c| !c.before.is_empty() || c.substitution.is_change())
    }

    /// Columns `start..end` that must be in the target. A lone insertion before
    /// column `k` gives the empty range `k..k`.
    fn changed_range(&self) -> Option<(usize, usize)> {
        let n = self.columns.len();
        let mut start: Option<usize> = None;
        let mut end = 0usize;
        let mut mark = |lo: usize, hi: usize| {
            start = Some(start.map_or(lo, |s| s.min(lo)));
            end = end.max(hi);
        };
        for (j, column) in self.columns.iter().enumerate() {
            if !column.before.is_empty() {
                mark(j, j);
            }
            if column.substitution.is_change() {
                mark(j, j + 1);
            }
        }
        if !self.tail.is_empty() {
            mark(n, n);
        }
        start.map(|s| (s, end.max(s)))
    }

    /// Canonical rule with the smallest target covering every change
    pub fn into_rule(self) -> PhonologicalRule {
        let allow = self.allow_syllable_structure_change;
        let Some((start, end)) = self.changed_range() else {
            return PhonologicalRule {
                preceding: self.columns.into_iter().map(|c| c.matcher).collect(),
                target: Vec::new(),
                following: Vec::new(),
                substitutions: Vec::new(),
                allow_syllable_structure_change: allow,
            };
        };

        let mut columns = self.columns;
        let following_columns = columns.split_off(end);
        let target_columns = columns.split_off(start);

        let preceding: Vec<PhonemeMatcher> = columns.into_iter().map(|c| c.matcher).collect();
        let mut target = Vec::with_capacity(target_columns.len());
        let mut substitutions = Vec::new();
        for column in target_columns {
            substitutions.extend(column.before.into_iter().map(PhonemeSubstitution::Epenthesis));
            substitutions.push(column.substitution);
            target.push(column.matcher);
        }

        let mut following = Vec::with_capacity(following_columns.len());
        for (j, column) in following_columns.into_iter().enumerate() {
            if j == 0 {
                substitutions
                    .extend(column.before.into_iter().map(PhonemeSubstitution::Epenthesis));
            }
            following.push(column.matcher);
        }
        substitutions.extend(self.tail.into_iter().map(PhonemeSubstitution::Epenthesis));

        PhonologicalRule {
            preceding,
            target,
            following,
            substitutions,
            allow_syllable_structure_change: allow,
        }
    }
}
