use super::write_symbol;
use crate::phoneme::{ChangingPhoneme, FeatureChange, Phoneme, PhonemeInventory};
use serde::Serialize;
use std::fmt;

/// What happens to one target slot, or an insertion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PhonemeSubstitution {
    Pass,
    Exact(Phoneme),
    Modify(Vec<FeatureChange>),
    Delete,
    /// Inserts a phoneme at the current position without consuming a target slot
    Epenthesis(Phoneme),
}

impl PhonemeSubstitution {
    pub fn is_epenthesis(&self) -> bool {
        matches!(self, PhonemeSubstitution::Epenthesis(_))
    }

    /// Whether the substitution can change the slot it is aligned with
    pub fn is_change(&self) -> bool {
        !matches!(self, PhonemeSubstitution::Pass)
    }

    /// Rewrite one slot.
    ///
    /// Boundaries and deleted slots are never altered, and prosody is kept.
    pub fn apply(&self, slot: &ChangingPhoneme, catalog: &PhonemeInventory) -> ChangingPhoneme {
        let ChangingPhoneme::Exact { phoneme, prosody } = slot else {
            return slot.clone();
        };
        match self {
            PhonemeSubstitution::Pass | PhonemeSubstitution::Epenthesis(_) => slot.clone(),
            PhonemeSubstitution::Delete => ChangingPhoneme::Deleted,
            PhonemeSubstitution::Exact(replacement) => {
                ChangingPhoneme::with_prosody(replacement.clone(), prosody.clone())
            }
            PhonemeSubstitution::Modify(changes) => {
                let modified = catalog
                    .modify(phoneme, changes)
                    .cloned()
                    .unwrap_or_else(|| phoneme.clone());
                ChangingPhoneme::with_prosody(modified, prosody.clone())
            }
        }
    }

    /// The single substitution equal to `self` followed by `later` on the same slot
    pub fn then(
        &self,
        later: Option<&PhonemeSubstitution>,
        catalog: &PhonemeInventory,
    ) -> PhonemeSubstitution {
        let Some(later) = later else {
            return self.clone();
        };
        match (self, later) {
            (_, PhonemeSubstitution::Pass | PhonemeSubstitution::Epenthesis(_)) => self.clone(),
            (PhonemeSubstitution::Delete, _) => PhonemeSubstitution::Delete,
            (PhonemeSubstitution::Pass | PhonemeSubstitution::Epenthesis(_), _) => later.clone(),
            (_, PhonemeSubstitution::Delete) => PhonemeSubstitution::Delete,
            (_, PhonemeSubstitution::Exact(_)) => later.clone(),
            (PhonemeSubstitution::Exact(phoneme), PhonemeSubstitution::Modify(changes)) => {
                PhonemeSubstitution::Exact(
                    catalog
                        .modify(phoneme, changes)
                        .cloned()
                        .unwrap_or_else(|| phoneme.clone()),
                )
            }
            (PhonemeSubstitution::Modify(first), PhonemeSubstitution::Modify(second)) => {
                PhonemeSubstitution::Modify(merge_changes(first, second))
            }
        }
    }

    /// Phoneme produced by this substitution regardless of input
    pub fn produced(&self) -> Option<&Phoneme> {
        match self {
            PhonemeSubstitution::Exact(p) | PhonemeSubstitution::Epenthesis(p) => Some(p),
            _ => None,
        }
    }
}

/// Rewrite a phoneme that an earlier rule inserted; `None` when it is deleted again
pub(crate) fn rewrite_inserted(
    phoneme: &Phoneme,
    later: Option<&PhonemeSubstitution>,
    catalog: &PhonemeInventory,
) -> Option<Phoneme> {
    match later {
        None | Some(PhonemeSubstitution::Pass) | Some(PhonemeSubstitution::Epenthesis(_)) => {
            Some(phoneme.clone())
        }
        Some(PhonemeSubstitution::Exact(replacement)) => Some(replacement.clone()),
        Some(PhonemeSubstitution::Delete) => None,
        Some(PhonemeSubstitution::Modify(changes)) => Some(
            catalog
                .modify(phoneme, changes)
                .cloned()
                .unwrap_or_else(|| phoneme.clone()),
        ),
    }
}

/// Later changes override earlier ones for the same feature
pub(crate) fn merge_changes(first: &[FeatureChange], second: &[FeatureChange]) -> Vec<FeatureChange> {
    let mut merged: Vec<FeatureChange> = first
        .iter()
        .filter(|c| !second.iter().any(|s| s.feature == c.feature))
        .copied()
        .collect();
    for change in second {
        if !merged.iter().any(|m| m.feature == change.feature) {
            merged.push(*change);
        }
    }
    merged
}

impl fmt::Display for PhonemeSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhonemeSubstitution::Pass => write!(f, "*"),
            PhonemeSubstitution::Exact(phoneme) => write_symbol(f, &phoneme.symbol),
            PhonemeSubstitution::Delete => write!(f, "-"),
            PhonemeSubstitution::Epenthesis(phoneme) => {
                write!(f, "(")?;
                write_symbol(f, &phoneme.symbol)?;
                write!(f, ")")
            }
            PhonemeSubstitution::Modify(changes) => {
                let rendered: Vec<String> = changes.iter().map(|c| c.to_string()).collect();
                write!(f, "[{}]", rendered.join(","))
            }
        }
    }
}
