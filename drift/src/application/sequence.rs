//! One pass of a rule over a stream of slots
//!
//! Matching always reads the input snapshot, so every window that matches
//! fires even when an earlier firing already rewrote part of it. The first
//! write to a slot wins.

use crate::phoneme::{ChangingPhoneme, Phoneme, PhonemeInventory};
use crate::rule::{PhonemeSubstitution, PhonologicalRule};

/// Slots after a pass plus the phonemes to splice in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub slots: Vec<ChangingPhoneme>,
    /// `insertions[k]` goes right before slot `k`; the last entry follows the final slot
    pub insertions: Vec<Vec<Phoneme>>,
}

impl Rewrite {
    fn untouched(input: &[ChangingPhoneme]) -> Self {
        Self {
            slots: input.to_vec(),
            insertions: vec![Vec::new(); input.len() + 1],
        }
    }

    pub fn has_insertions(&self) -> bool {
        self.insertions.iter().any(|i| !i.is_empty())
    }

    /// Whether the pass changed nothing compared with `input`
    pub fn is_identity(&self, input: &[ChangingPhoneme]) -> bool {
        !self.has_insertions() && self.slots == input
    }

    /// Splice insertions into the slot stream
    pub fn flatten(self) -> Vec<ChangingPhoneme> {
        let mut result = Vec::with_capacity(self.slots.len());
        let mut insertions = self.insertions.into_iter();
        for slot in self.slots {
            if let Some(inserted) = insertions.next() {
                result.extend(inserted.into_iter().map(ChangingPhoneme::exact));
            }
            result.push(slot);
        }
        for inserted in insertions {
            result.extend(inserted.into_iter().map(ChangingPhoneme::exact));
        }
        result
    }

    /// The same rewrite read right to left
    pub fn mirror(self) -> Self {
        let mut slots = self.slots;
        slots.reverse();
        let insertions = self
            .insertions
            .into_iter()
            .rev()
            .map(|mut inserted| {
                inserted.reverse();
                inserted
            })
            .collect();
        Self { slots, insertions }
    }
}

struct Rewriter<'a> {
    input: &'a [ChangingPhoneme],
    catalog: &'a PhonemeInventory,
    output: Rewrite,
    written: Vec<bool>,
}

impl<'a> Rewriter<'a> {
    fn new(input: &'a [ChangingPhoneme], catalog: &'a PhonemeInventory) -> Self {
        Self {
            input,
            catalog,
            output: Rewrite::untouched(input),
            written: vec![false; input.len()],
        }
    }

    fn fire(&mut self, rule: &PhonologicalRule, index: usize) {
        let mut cursor = index + rule.preceding().len();
        for substitution in rule.substitutions() {
            match substitution {
                PhonemeSubstitution::Epenthesis(phoneme) => {
                    self.output.insertions[cursor].push(phoneme.clone());
                }
                other => {
                    if other.is_change() && !self.written[cursor] {
                        self.output.slots[cursor] = other.apply(&self.input[cursor], self.catalog);
                        self.written[cursor] = true;
                    }
                    cursor += 1;
                }
            }
        }
    }
}

/// Fire `rule` at every index whose window matches the input
pub fn rewrite(
    input: &[ChangingPhoneme],
    rule: &PhonologicalRule,
    catalog: &PhonemeInventory,
) -> Rewrite {
    rewrite_first_matching(input, std::slice::from_ref(rule), catalog)
}

/// At every index fire the first rule of `rules` whose window matches
pub fn rewrite_first_matching(
    input: &[ChangingPhoneme],
    rules: &[PhonologicalRule],
    catalog: &PhonemeInventory,
) -> Rewrite {
    let mut rewriter = Rewriter::new(input, catalog);
    for index in 0..input.len() {
        if let Some(rule) = rules.iter().find(|r| r.matches_at(input, index)) {
            rewriter.fire(rule, index);
        }
    }
    rewriter.output
}

/// Fire `rule` at every matching index that `allowed` accepts
pub fn rewrite_filtered(
    input: &[ChangingPhoneme],
    rule: &PhonologicalRule,
    catalog: &PhonemeInventory,
    allowed: impl Fn(usize) -> bool,
) -> Rewrite {
    let mut rewriter = Rewriter::new(input, catalog);
    for index in 0..input.len() {
        if allowed(index) && rule.matches_at(input, index) {
            rewriter.fire(rule, index);
        }
    }
    rewriter.output
}

/// Fire `rule` once, anchored at `index`; `None` when the window does not match
pub fn rewrite_at(
    input: &[ChangingPhoneme],
    rule: &PhonologicalRule,
    index: usize,
    catalog: &PhonemeInventory,
) -> Option<Rewrite> {
    if !rule.matches_at(input, index) {
        return None;
    }
    let mut rewriter = Rewriter::new(input, catalog);
    rewriter.fire(rule, index);
    Some(rewriter.output)
}

/// Apply `rule` to a slot stream, keeping deleted slots
pub fn apply_to_sequence(
    input: &[ChangingPhoneme],
    rule: &PhonologicalRule,
    catalog: &PhonemeInventory,
) -> Vec<ChangingPhoneme> {
    rewrite(input, rule, catalog).flatten()
}

/// Apply the first matching rule of `rules` at every index
pub fn apply_first_matching(
    input: &[ChangingPhoneme],
    rules: &[PhonologicalRule],
    catalog: &PhonemeInventory,
) -> Vec<ChangingPhoneme> {
    rewrite_first_matching(input, rules, catalog).flatten()
}
