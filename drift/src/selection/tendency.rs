use super::chance;
use super::uniform::UniformDriver;
use crate::engine::Engine;
use crate::language::Language;
use crate::outcome::Outcome;
use crate::phoneme::{Feature, FeatureChange, Phoneme, PhonemeInventory, PhonemeType, Prosody};
use crate::rule::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// A directional drift that keeps proposing related rules
pub trait Tendency: fmt::Debug {
    fn name(&self) -> &str;

    /// Relative weight of this tendency starting in `language`
    fn development_chance(&self, language: &Language) -> f64;

    /// Chance of staying active for another generation
    fn retention_chance(&self, language: &Language) -> f64;

    /// The next rule, or `None` when the tendency has nothing left to change
    fn next_rule(
        &mut self,
        language: &Language,
        catalog: &PhonemeInventory,
        rng: &mut dyn RngCore,
    ) -> Option<PhonologicalRule>;

    /// A fresh instance, as if it had never been active
    fn reset(&self) -> Box<dyn Tendency>;
}

/// Pick an unprocessed phoneme of the language that `changes` maps onto an
/// existing phoneme, and remember it
fn pick_target(
    language: &Language,
    catalog: &PhonemeInventory,
    processed: &mut BTreeSet<Phoneme>,
    eligible: impl Fn(&Phoneme) -> bool,
    changes: &[FeatureChange],
    rng: &mut dyn RngCore,
) -> Option<Phoneme> {
    let candidates: Vec<&Phoneme> = language
        .phonemes
        .iter()
        .filter(|p| eligible(p) && !processed.contains(*p))
        .filter(|p| catalog.modify(p, changes).is_some_and(|q| q != *p))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let picked = candidates[rng.gen_range(0..candidates.len())].clone();
    processed.insert(picked.clone());
    Some(picked)
}

fn is_obstruent(phoneme: &Phoneme) -> bool {
    !phoneme.is_vowel()
        && (phoneme.has(Feature::Plosive)
            || phoneme.has(Feature::Fricative)
            || phoneme.has(Feature::Affricate))
}

/// Voiced obstruents devoice at the end of a word
#[derive(Debug, Clone, Default)]
pub struct FinalDevoicing {
    processed: BTreeSet<Phoneme>,
}

impl Tendency for FinalDevoicing {
    fn name(&self) -> &str {
        "final devoicing"
    }

    fn development_chance(&self, language: &Language) -> f64 {
        let voiced = language
            .phonemes
            .iter()
            .filter(|p| is_obstruent(p) && p.has(Feature::Voiced))
            .count();
        if voiced == 0 {
            0.0
        } else {
            1.0
        }
    }

    fn retention_chance(&self, _language: &Language) -> f64 {
        0.8
    }

    fn next_rule(
        &mut self,
        language: &Language,
        catalog: &PhonemeInventory,
        rng: &mut dyn RngCore,
    ) -> Option<PhonologicalRule> {
        let changes = [FeatureChange::remove(Feature::Voiced)];
        let target = pick_target(
            language,
            catalog,
            &mut self.processed,
            |p| is_obstruent(p) && p.has(Feature::Voiced),
            &changes,
            rng,
        )?;
        PhonologicalRule::new(
            Vec::new(),
            vec![PhonemeMatcher::Exact(target)],
            vec![PhonemeMatcher::Boundary],
            vec![PhonemeSubstitution::Modify(changes.to_vec())],
            false,
        )
        .ok()
    }

    fn reset(&self) -> Box<dyn Tendency> {
        Box::new(Self::default())
    }
}

/// Plosives between vowels become fricatives
#[derive(Debug, Clone, Default)]
pub struct IntervocalicLenition {
    processed: BTreeSet<Phoneme>,
}

impl Tendency for IntervocalicLenition {
    fn name(&self) -> &str {
        "intervocalic lenition"
    }

    fn development_chance(&self, language: &Language) -> f64 {
        let plosives = language
            .phonemes
            .iter()
            .filter(|p| p.has(Feature::Plosive))
            .count();
        plosives as f64 / language.phonemes.len().max(1) as f64
    }

    fn retention_chance(&self, _language: &Language) -> f64 {
        0.7
    }

    fn next_rule(
        &mut self,
        language: &Language,
        catalog: &PhonemeInventory,
        rng: &mut dyn RngCore,
    ) -> Option<PhonologicalRule> {
        let changes = [
            FeatureChange::remove(Feature::Plosive),
            FeatureChange::add(Feature::Fricative),
        ];
        let target = pick_target(
            language,
            catalog,
            &mut self.processed,
            |p| !p.is_vowel() && p.has(Feature::Plosive),
            &changes,
            rng,
        )?;
        let vowel = PhonemeMatcher::Type(PhonemeType::Vowel);
        PhonologicalRule::new(
            vec![vowel.clone()],
            vec![PhonemeMatcher::Exact(target)],
            vec![vowel],
            vec![PhonemeSubstitution::Modify(changes.to_vec())],
            false,
        )
        .ok()
    }

    fn reset(&self) -> Box<dyn Tendency> {
        Box::new(Self::default())
    }
}

/// Mid vowels rise to high, only in unstressed syllables when the language has stress
#[derive(Debug, Clone, Default)]
pub struct VowelRaising {
    processed: BTreeSet<Phoneme>,
}

impl Tendency for VowelRaising {
    fn name(&self) -> &str {
        "vowel raising"
    }

    fn development_chance(&self, language: &Language) -> f64 {
        if language.phonemes.iter().any(|p| p.is_vowel() && p.has(Feature::Mid)) {
            0.5
        } else {
            0.0
        }
    }

    fn retention_chance(&self, _language: &Language) -> f64 {
        0.6
    }

    fn next_rule(
        &mut self,
        language: &Language,
        catalog: &PhonemeInventory,
        rng: &mut dyn RngCore,
    ) -> Option<PhonologicalRule> {
        let changes = [
            FeatureChange::remove(Feature::Mid),
            FeatureChange::add(Feature::High),
        ];
        let target = pick_target(
            language,
            catalog,
            &mut self.processed,
            |p| p.is_vowel() && p.has(Feature::Mid),
            &changes,
            rng,
        )?;
        let matcher = if language.stress.has_stress() {
            PhonemeMatcher::Exact(target)
                .unite(&PhonemeMatcher::AbsentProsody(Prosody::Stress))?
        } else {
            PhonemeMatcher::Exact(target)
        };
        PhonologicalRule::new(
            Vec::new(),
            vec![matcher],
            Vec::new(),
            vec![PhonemeSubstitution::Modify(changes.to_vec())],
            false,
        )
        .ok()
    }

    fn reset(&self) -> Box<dyn Tendency> {
        Box::new(Self::default())
    }
}

/// Applies rules from active tendencies, developing and dropping them over time
#[derive(Debug, Default)]
pub struct TendencyDriver {
    active: Vec<Box<dyn Tendency>>,
    inactive: Vec<Box<dyn Tendency>>,
    uniform: UniformDriver,
}

impl TendencyDriver {
    pub fn new(tendencies: Vec<Box<dyn Tendency>>) -> Self {
        Self {
            active: Vec::new(),
            inactive: tendencies,
            uniform: UniformDriver,
        }
    }

    pub fn with_builtin_tendencies() -> Self {
        Self::new(vec![
            Box::new(FinalDevoicing::default()),
            Box::new(IntervocalicLenition::default()),
            Box::new(VowelRaising::default()),
        ])
    }

    pub fn active_names(&self) -> Vec<&str> {
        self.active.iter().map(|t| t.name()).collect()
    }

    pub fn inactive_names(&self) -> Vec<&str> {
        self.inactive.iter().map(|t| t.name()).collect()
    }

    /// One generation: maybe develop a tendency, apply, then maybe drop tendencies
    pub fn step<R: Rng>(
        &mut self,
        engine: &Engine,
        language: &Language,
        candidates: &[PhonologicalRule],
        rng: &mut R,
    ) -> Outcome<Language> {
        let settings = engine.settings();
        let mut messages = Vec::new();

        if !self.inactive.is_empty() && rng.gen_bool(chance(settings.development_chance)) {
            let weights: Vec<f64> = self
                .inactive
                .iter()
                .map(|t| t.development_chance(language).max(0.0))
                .collect();
            if let Ok(distribution) = WeightedIndex::new(&weights) {
                let developed = self.inactive.remove(distribution.sample(rng));
                debug!(tendency = developed.name(), "tendency developed");
                messages.push(format!("Tendency '{}' developed", developed.name()));
                self.active.push(developed);
            }
        }

        let mut current = language.clone();
        if self.active.is_empty() {
            let (value, step_messages) = self
                .uniform
                .step(engine, &current, candidates, rng)
                .into_parts();
            current = value;
            messages.extend(step_messages);
        } else {
            for tendency in &mut self.active {
                match tendency.next_rule(&current, engine.catalog(), &mut *rng) {
                    Some(rule) => {
                        let (value, step_messages) = engine.apply(&current, &rule).into_parts();
                        current = value;
                        messages.extend(step_messages);
                    }
                    None => messages.push(format!(
                        "Tendency '{}' has nothing left to change",
                        tendency.name()
                    )),
                }
            }
        }

        let mut retained = Vec::with_capacity(self.active.len());
        for tendency in self.active.drain(..) {
            let keep = chance(tendency.retention_chance(&current) * settings.stickiness);
            if rng.gen_bool(keep) {
                retained.push(tendency);
            } else {
                debug!(tendency = tendency.name(), "tendency faded");
                messages.push(format!("Tendency '{}' faded", tendency.name()));
                self.inactive.push(tendency.reset());
            }
        }
        self.active = retained;

        Outcome::new(current, messages)
    }
}
