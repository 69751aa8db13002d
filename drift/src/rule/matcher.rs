use super::write_symbol;
use crate::phoneme::{ChangingPhoneme, Feature, Phoneme, PhonemeType, Prosody};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Predicate over one slot of a phoneme stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PhonemeMatcher {
    Exact(Phoneme),
    Type(PhonemeType),
    Feature(Feature),
    AbsentFeature(Feature),
    All(Vec<PhonemeMatcher>),
    Boundary,
    /// Matches any slot, including deleted phonemes and word edges
    Pass,
    Prosody(Prosody),
    AbsentProsody(Prosody),
}

impl PhonemeMatcher {
    pub fn matches(&self, slot: &ChangingPhoneme) -> bool {
        match self {
            PhonemeMatcher::Pass => true,
            PhonemeMatcher::Boundary => matches!(slot, ChangingPhoneme::Boundary),
            PhonemeMatcher::All(parts) => parts.iter().all(|m| m.matches(slot)),
            _ => match slot {
                ChangingPhoneme::Exact { phoneme, prosody } => {
                    self.matches_phoneme(phoneme, prosody)
                }
                ChangingPhoneme::Deleted | ChangingPhoneme::Boundary => false,
            },
        }
    }

    fn matches_phoneme(&self, phoneme: &Phoneme, prosody: &BTreeSet<Prosody>) -> bool {
        match self {
            PhonemeMatcher::Exact(p) => p == phoneme,
            PhonemeMatcher::Type(kind) => phoneme.kind == *kind,
            PhonemeMatcher::Feature(feature) => phoneme.has(*feature),
            PhonemeMatcher::AbsentFeature(feature) => !phoneme.has(*feature),
            PhonemeMatcher::All(parts) => parts.iter().all(|m| m.matches_phoneme(phoneme, prosody)),
            PhonemeMatcher::Boundary => false,
            PhonemeMatcher::Pass => true,
            PhonemeMatcher::Prosody(mark) => prosody.contains(mark),
            PhonemeMatcher::AbsentProsody(mark) => !prosody.contains(mark),
        }
    }

    /// Whether some occurrence of `phoneme` can satisfy the matcher.
    ///
    /// Prosody requirements are treated as satisfiable.
    pub fn accepts(&self, phoneme: &Phoneme) -> bool {
        match self {
            PhonemeMatcher::Exact(p) => p == phoneme,
            PhonemeMatcher::Type(kind) => phoneme.kind == *kind,
            PhonemeMatcher::Feature(feature) => phoneme.has(*feature),
            PhonemeMatcher::AbsentFeature(feature) => !phoneme.has(*feature),
            PhonemeMatcher::All(parts) => parts.iter().all(|m| m.accepts(phoneme)),
            PhonemeMatcher::Boundary => false,
            PhonemeMatcher::Pass | PhonemeMatcher::Prosody(_) | PhonemeMatcher::AbsentProsody(_) => {
                true
            }
        }
    }

    /// Flattened conjuncts, without `Pass`
    pub fn atoms(&self) -> Vec<PhonemeMatcher> {
        match self {
            PhonemeMatcher::Pass => Vec::new(),
            PhonemeMatcher::All(parts) => parts.iter().flat_map(|p| p.atoms()).collect(),
            other => vec![other.clone()],
        }
    }

    /// Build the smallest matcher equivalent to the conjunction of `atoms`
    pub fn from_atoms(atoms: Vec<PhonemeMatcher>) -> PhonemeMatcher {
        let mut unique: Vec<PhonemeMatcher> = Vec::with_capacity(atoms.len());
        for atom in atoms.into_iter().flat_map(|a| a.atoms()) {
            if !unique.contains(&atom) {
                unique.push(atom);
            }
        }
        match unique.len() {
            0 => PhonemeMatcher::Pass,
            1 => unique.remove(0),
            _ => PhonemeMatcher::All(unique),
        }
    }

    pub fn is_prosodic(&self) -> bool {
        self.atoms().iter().any(|a| {
            matches!(
                a,
                PhonemeMatcher::Prosody(_) | PhonemeMatcher::AbsentProsody(_)
            )
        })
    }

    pub fn is_boundary(&self) -> bool {
        self.atoms().contains(&PhonemeMatcher::Boundary)
    }

    fn is_segmental(&self) -> bool {
        matches!(
            self,
            PhonemeMatcher::Exact(_)
                | PhonemeMatcher::Type(_)
                | PhonemeMatcher::Feature(_)
                | PhonemeMatcher::AbsentFeature(_)
        )
    }

    /// Conjunction of two matchers; `None` when no slot can satisfy both
    pub fn unite(&self, other: &PhonemeMatcher) -> Option<PhonemeMatcher> {
        let mut atoms = self.atoms();
        for atom in other.atoms() {
            if !atoms.contains(&atom) {
                atoms.push(atom);
            }
        }

        for (i, a) in atoms.iter().enumerate() {
            for b in &atoms[i + 1..] {
                if contradicts(a, b) || contradicts(b, a) {
                    return None;
                }
            }
        }

        if let Some(exact) = atoms
            .iter()
            .find(|a| matches!(a, PhonemeMatcher::Exact(_)))
            .cloned()
        {
            atoms.retain(|a| !a.is_segmental() || *a == exact);
        }

        Some(PhonemeMatcher::from_atoms(atoms))
    }

    /// Whether every slot accepted by `self` is accepted by `other`.
    ///
    /// Conservative: `false` means "not provably".
    pub fn implies(&self, other: &PhonemeMatcher) -> bool {
        let own = self.atoms();
        let exact = own.iter().find_map(|a| match a {
            PhonemeMatcher::Exact(p) => Some(p),
            _ => None,
        });
        other.atoms().iter().all(|wanted| {
            own.contains(wanted)
                || match exact {
                    Some(p) => wanted.is_segmental() && wanted.accepts(p),
                    None => false,
                }
        })
    }
}

fn contradicts(a: &PhonemeMatcher, b: &PhonemeMatcher) -> bool {
    use PhonemeMatcher::*;
    match (a, b) {
        (Exact(p), Exact(q)) => p != q,
        (Exact(p), other) if other.is_segmental() => !other.accepts(p),
        (Boundary, Boundary) => false,
        (Boundary, _) => true,
        (Type(x), Type(y)) => x != y,
        (Feature(f), AbsentFeature(g)) => f == g,
        (Prosody(p), AbsentProsody(q)) => p == q,
        _ => false,
    }
}

impl fmt::Display for PhonemeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhonemeMatcher::Exact(phoneme) => write_symbol(f, &phoneme.symbol),
            PhonemeMatcher::Type(kind) => write!(f, "{}", kind),
            PhonemeMatcher::Feature(feature) => write!(f, "[+{}]", feature),
            PhonemeMatcher::AbsentFeature(feature) => write!(f, "[-{}]", feature),
            PhonemeMatcher::Boundary => write!(f, "$"),
            PhonemeMatcher::Pass => write!(f, "*"),
            PhonemeMatcher::Prosody(mark) => write!(f, "(*{{+{}}})", mark),
            PhonemeMatcher::AbsentProsody(mark) => write!(f, "(*{{-{}}})", mark),
            PhonemeMatcher::All(parts) => {
                let (marks, segmental): (Vec<_>, Vec<_>) = parts.iter().partition(|p| {
                    matches!(
                        p,
                        PhonemeMatcher::Prosody(_) | PhonemeMatcher::AbsentProsody(_)
                    )
                });
                write!(f, "(")?;
                if segmental.is_empty() {
                    write!(f, "*")?;
                }
                for part in segmental {
                    write!(f, "{}", part)?;
                }
                if !marks.is_empty() {
                    let rendered: Vec<String> = marks
                        .iter()
                        .map(|m| match m {
                            PhonemeMatcher::Prosody(p) => format!("+{}", p),
                            PhonemeMatcher::AbsentProsody(p) => format!("-{}", p),
                            _ => String::new(),
                        })
                        .collect();
                    write!(f, "{{{}}}", rendered.join(","))?;
                }
                write!(f, ")")
            }
        }
    }
}
