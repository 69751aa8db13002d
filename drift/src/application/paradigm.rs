//! Structural maps of a rule over lexicon and paradigms

use super::affix::{apply_to_affix, apply_to_infix};
use super::word::{apply_to_word, WordChange};
use super::ApplicationContext;
use crate::language::derivation::{Compound, Derivation, DerivationParadigm};
use crate::language::paradigm::{
    CategoryApplicator, ChangeParadigm, ExponenceCluster, FilterBranch, SpeechPartChangeParadigm,
};
use crate::language::word::Word;
use crate::language::Lexis;
use crate::rule::PhonologicalRule;

/// Which stored forms a rule is baked into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeScope {
    Everything,
    /// Affixes and derivation affixes only; the rule stays live for the rest
    AffixesOnly,
}

/// Apply `rule` to one stored word, logging a revert
pub(crate) fn rewrite_word(
    word: &Word,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
    messages: &mut Vec<String>,
) -> Word {
    match apply_to_word(word, rule, ctx) {
        WordChange::Changed(changed) => changed,
        WordChange::Unchanged => word.clone(),
        WordChange::Reverted(reason) => {
            messages.push(format!("Reverted '{}' ({}): {}", word, word.gloss, reason));
            word.clone()
        }
    }
}

pub fn apply_to_lexis(
    lexis: &Lexis,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
    messages: &mut Vec<String>,
) -> Lexis {
    Lexis::new(
        lexis
            .iter()
            .map(|word| rewrite_word(word, rule, ctx, messages))
            .collect(),
    )
}

pub fn apply_to_applicator(
    applicator: &CategoryApplicator,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
    scope: BakeScope,
    messages: &mut Vec<String>,
) -> CategoryApplicator {
    let bake_words = scope == BakeScope::Everything;
    match applicator {
        CategoryApplicator::Affix(affix) => {
            let rewritten = apply_to_affix(affix, rule, ctx);
            if rewritten.is_empty() {
                CategoryApplicator::Pass
            } else {
                CategoryApplicator::Affix(rewritten)
            }
        }
        CategoryApplicator::Particle { word, position } if bake_words => {
            CategoryApplicator::Particle {
                word: rewrite_word(word, rule, ctx, messages),
                position: *position,
            }
        }
        CategoryApplicator::Suppletion(words) if bake_words => CategoryApplicator::Suppletion(
            words
                .iter()
                .map(|w| rewrite_word(w, rule, ctx, messages))
                .collect(),
        ),
        CategoryApplicator::Filter(branches) => CategoryApplicator::Filter(
            branches
                .iter()
                .map(|b| FilterBranch {
                    tag: b.tag.clone(),
                    applicator: apply_to_applicator(&b.applicator, rule, ctx, scope, messages),
                })
                .collect(),
        ),
        CategoryApplicator::Consecutive(applicators) => CategoryApplicator::Consecutive(
            applicators
                .iter()
                .map(|a| apply_to_applicator(a, rule, ctx, scope, messages))
                .collect(),
        ),
        CategoryApplicator::Particle { .. }
        | CategoryApplicator::Suppletion(_)
        | CategoryApplicator::Reduplication(_)
        | CategoryApplicator::Pass => applicator.clone(),
    }
}

pub fn apply_to_paradigm(
    paradigm: &ChangeParadigm,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
    scope: BakeScope,
    messages: &mut Vec<String>,
) -> ChangeParadigm {
    let speech_parts = paradigm
        .speech_parts
        .iter()
        .map(|(part, speech_part_paradigm)| {
            let clusters = speech_part_paradigm
                .clusters
                .iter()
                .map(|cluster| ExponenceCluster {
                    name: cluster.name.clone(),
                    applicators: cluster
                        .applicators
                        .iter()
                        .map(|(value, applicator)| {
                            (
                                value.clone(),
                                apply_to_applicator(applicator, rule, ctx, scope, messages),
                            )
                        })
                        .collect(),
                })
                .collect();
            (
                *part,
                SpeechPartChangeParadigm {
                    speech_part: *part,
                    clusters,
                },
            )
        })
        .collect();
    ChangeParadigm {
        speech_parts,
        sandhi_rules: paradigm.sandhi_rules.clone(),
    }
}

pub fn apply_to_derivation_paradigm(
    paradigm: &DerivationParadigm,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
    scope: BakeScope,
) -> DerivationParadigm {
    DerivationParadigm {
        derivations: paradigm
            .derivations
            .iter()
            .map(|d| Derivation {
                affix: apply_to_affix(&d.affix, rule, ctx),
                ..d.clone()
            })
            .collect(),
        compounds: paradigm
            .compounds
            .iter()
            .map(|c| match scope {
                BakeScope::Everything => Compound {
                    infix: apply_to_infix(&c.infix, rule, ctx),
                    meaning: c.meaning.clone(),
                },
                BakeScope::AffixesOnly => c.clone(),
            })
            .collect(),
    }
}
