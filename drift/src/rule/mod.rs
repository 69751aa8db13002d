//! Sound change rules and their algebra
//!
//! A [`PhonologicalRule`] reads `preceding target following` and rewrites the
//! target slots with its substitutions. Rules are immutable; every algebra
//! operation returns new rules.

pub mod algebra;
pub mod matcher;
pub mod substitution;
pub(crate) mod window;

pub use matcher::PhonemeMatcher;
pub use substitution::PhonemeSubstitution;

use crate::error::DriftError;
use crate::phoneme::{ChangingPhoneme, PhonemeInventory};
use crate::DriftResult;
use serde::Serialize;
use std::fmt;
use window::Window;

/// Upper bound on alternatives produced by [`PhonologicalRule::combine_sequential`]
pub const DEFAULT_MAX_ALTERNATIVES: usize = 64;

const RESERVED: &[char] = &[
    '[', ']', '(', ')', '{', '}', '<', '>', '|', '$', '_', '/', '!', '*', '-', '+', ',', 'V', 'C',
];

/// Print a phoneme symbol so that the rule grammar reads it back as one unit
pub(crate) fn write_symbol(f: &mut fmt::Formatter<'_>, symbol: &str) -> fmt::Result {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !RESERVED.contains(&c) && !c.is_whitespace() => write!(f, "{}", c),
        _ => write!(f, "|{}|", symbol),
    }
}

/// A context-sensitive rewrite over phoneme sequences
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhonologicalRule {
    preceding: Vec<PhonemeMatcher>,
    target: Vec<PhonemeMatcher>,
    following: Vec<PhonemeMatcher>,
    substitutions: Vec<PhonemeSubstitution>,
    allow_syllable_structure_change: bool,
}

impl PhonologicalRule {
    /// Build a rule, checking that every target slot has exactly one
    /// non-epenthesis substitution
    pub fn new(
        preceding: Vec<PhonemeMatcher>,
        target: Vec<PhonemeMatcher>,
        following: Vec<PhonemeMatcher>,
        substitutions: Vec<PhonemeSubstitution>,
        allow_syllable_structure_change: bool,
    ) -> DriftResult<Self> {
        let aligned = substitutions.iter().filter(|s| !s.is_epenthesis()).count();
        if aligned != target.len() {
            return Err(DriftError::invalid_rule(format!(
                "{} target matchers but {} non-epenthesis substitutions",
                target.len(),
                aligned
            )));
        }
        Ok(Self {
            preceding,
            target,
            following,
            substitutions,
            allow_syllable_structure_change,
        })
    }

    pub fn preceding(&self) -> &[PhonemeMatcher] {
        &self.preceding
    }

    pub fn target(&self) -> &[PhonemeMatcher] {
        &self.target
    }

    pub fn following(&self) -> &[PhonemeMatcher] {
        &self.following
    }

    pub fn substitutions(&self) -> &[PhonemeSubstitution] {
        &self.substitutions
    }

    pub fn allow_syllable_structure_change(&self) -> bool {
        self.allow_syllable_structure_change
    }

    pub fn with_syllable_structure_change(mut self, allow: bool) -> Self {
        self.allow_syllable_structure_change = allow;
        self
    }

    /// The same rule with target matcher `index` replaced
    pub fn with_target_matcher(&self, index: usize, matcher: PhonemeMatcher) -> Self {
        let mut rule = self.clone();
        if let Some(slot) = rule.target.get_mut(index) {
            *slot = matcher;
        }
        rule
    }

    /// All matchers in reading order
    pub fn matchers(&self) -> impl Iterator<Item = &PhonemeMatcher> {
        self.preceding
            .iter()
            .chain(self.target.iter())
            .chain(self.following.iter())
    }

    pub fn width(&self) -> usize {
        self.preceding.len() + self.target.len() + self.following.len()
    }

    /// Whether the window starting at `index` is accepted by every matcher
    pub fn matches_at(&self, sequence: &[ChangingPhoneme], index: usize) -> bool {
        let width = self.width();
        width > 0
            && index + width <= sequence.len()
            && self
                .matchers()
                .zip(&sequence[index..index + width])
                .all(|(m, slot)| m.matches(slot))
    }

    /// Whether applying the rule can change anything at all
    pub fn has_effect(&self) -> bool {
        self.substitutions.iter().any(|s| s.is_change())
    }

    /// The same rule read right to left
    pub fn mirror(&self) -> Self {
        Self {
            preceding: self.following.iter().rev().cloned().collect(),
            target: self.target.iter().rev().cloned().collect(),
            following: self.preceding.iter().rev().cloned().collect(),
            substitutions: self.substitutions.iter().rev().cloned().collect(),
            allow_syllable_structure_change: self.allow_syllable_structure_change,
        }
    }

    /// Move unchanged edge target slots into the context
    pub fn trim(&self) -> Self {
        let window = Window::from_rule(self);
        if !window.has_changes() {
            return self.clone();
        }
        window.into_rule()
    }

    /// Rules equivalent to applying `self` and then `next`.
    ///
    /// Alternatives are ordered most specific first and are meant to be
    /// applied with first-match semantics. `None` when the alternatives
    /// exceed [`DEFAULT_MAX_ALTERNATIVES`].
    pub fn combine_sequential(
        &self,
        next: &PhonologicalRule,
        catalog: &PhonemeInventory,
    ) -> Option<Vec<PhonologicalRule>> {
        self.combine_sequential_bounded(next, catalog, DEFAULT_MAX_ALTERNATIVES)
    }

    pub fn combine_sequential_bounded(
        &self,
        next: &PhonologicalRule,
        catalog: &PhonemeInventory,
        max_alternatives: usize,
    ) -> Option<Vec<PhonologicalRule>> {
        let combined =
            algebra::combine_windows(&Window::from_rule(self), next, catalog, max_alternatives)?;
        let mut rules: Vec<PhonologicalRule> = Vec::with_capacity(combined.len());
        for candidate in combined {
            let rule = candidate.window.into_rule();
            if !rules.contains(&rule) {
                rules.push(rule);
            }
        }
        Some(rules)
    }

    /// One rule when `next` folds cleanly into `self`, otherwise both rules
    pub fn merge_sequential(
        &self,
        next: &PhonologicalRule,
        catalog: &PhonemeInventory,
    ) -> Vec<PhonologicalRule> {
        match algebra::combine_windows(
            &Window::from_rule(self),
            next,
            catalog,
            DEFAULT_MAX_ALTERNATIVES,
        ) {
            Some(mut combined) if combined.len() == 1 && combined[0].fired => {
                vec![combined.remove(0).window.into_rule()]
            }
            _ => vec![self.clone(), next.clone()],
        }
    }
}

impl fmt::Display for PhonologicalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join_matchers =
            |ms: &[PhonemeMatcher]| ms.iter().map(|m| m.to_string()).collect::<String>();
        let substitutions: String = self.substitutions.iter().map(|s| s.to_string()).collect();
        let mut environment = join_matchers(&self.preceding);
        if !environment.is_empty() {
            environment.push(' ');
        }
        environment.push('_');
        if !self.following.is_empty() {
            environment.push(' ');
            environment.push_str(&join_matchers(&self.following));
        }
        let line = format!(
            "{} -> {} / {}",
            join_matchers(&self.target),
            substitutions,
            environment
        );
        write!(f, "{}", line.trim())?;
        if self.allow_syllable_structure_change {
            write!(f, "!")?;
        }
        Ok(())
    }
}
