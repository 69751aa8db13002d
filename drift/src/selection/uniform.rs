use super::chance;
use crate::applicability::filter_applicable;
use crate::engine::Engine;
use crate::language::Language;
use crate::outcome::Outcome;
use crate::phoneme::Phoneme;
use crate::rule::{PhonemeMatcher, PhonologicalRule};
use rand::Rng;
use tracing::debug;

/// Picks an applicable candidate uniformly at random
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDriver;

impl UniformDriver {
    pub fn new() -> Self {
        Self
    }

    pub fn step<R: Rng + ?Sized>(
        &self,
        engine: &Engine,
        language: &Language,
        candidates: &[PhonologicalRule],
        rng: &mut R,
    ) -> Outcome<Language> {
        let applicable = filter_applicable(candidates, language);
        if applicable.is_empty() {
            return Outcome::with_message(language.clone(), "No applicable rules");
        }
        let picked = &applicable[rng.gen_range(0..applicable.len())];
        let rule = if rng.gen_bool(chance(engine.settings().narrowing_chance)) {
            narrow_rule(picked, language, rng)
        } else {
            picked.clone()
        };
        debug!(rule = %rule, "uniform driver picked rule");
        engine.apply(language, &rule)
    }
}

/// Restrict one target matcher of `rule` to a single phoneme of the language
pub fn narrow_rule<R: Rng + ?Sized>(
    rule: &PhonologicalRule,
    language: &Language,
    rng: &mut R,
) -> PhonologicalRule {
    let narrowable: Vec<usize> = rule
        .target()
        .iter()
        .enumerate()
        .filter(|(_, m)| !matches!(m, PhonemeMatcher::Exact(_)) && !m.is_boundary())
        .map(|(i, _)| i)
        .collect();
    if narrowable.is_empty() {
        return rule.clone();
    }
    let index = narrowable[rng.gen_range(0..narrowable.len())];
    let matcher = &rule.target()[index];

    let accepted: Vec<&Phoneme> = language
        .phonemes
        .iter()
        .filter(|p| matcher.accepts(p))
        .collect();
    if accepted.is_empty() {
        return rule.clone();
    }
    let phoneme = accepted[rng.gen_range(0..accepted.len())];
    match matcher.unite(&PhonemeMatcher::Exact(phoneme.clone())) {
        Some(narrowed) => rule.with_target_matcher(index, narrowed),
        None => rule.clone(),
    }
}
