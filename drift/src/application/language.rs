//! Accepting or rejecting a rule for a whole language

use super::paradigm::{apply_to_derivation_paradigm, apply_to_lexis, apply_to_paradigm, BakeScope};
use super::ApplicationContext;
use crate::applicability::{inapplicable_reason, is_sandhi};
use crate::language::paradigm::WordForm;
use crate::language::Language;
use crate::outcome::Outcome;
use crate::rule::PhonologicalRule;
use crate::DriftResult;
use tracing::debug;

/// All forms of every word in the lexicon, in lexicon order
pub fn language_forms(
    language: &Language,
    ctx: &ApplicationContext,
) -> DriftResult<Vec<Vec<WordForm>>> {
    language
        .lexis
        .iter()
        .map(|word| language.change_paradigm.forms(word, ctx))
        .collect()
}

fn reject(language: &Language, mut messages: Vec<String>, reason: String) -> Outcome<Language> {
    debug!(%reason, "rule rejected");
    messages.push(reason);
    Outcome::new(language.clone(), messages)
}

/// Apply `rule` to every stored form of `language`.
///
/// The result is the original language whenever the rule does not apply,
/// changes nothing, or leaves some word without a valid form set.
pub fn apply_to_language(
    language: &Language,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
) -> Outcome<Language> {
    if let Some(reason) = inapplicable_reason(rule, language) {
        return reject(
            language,
            Vec::new(),
            format!("Rule '{}' is not applicable: {}", rule, reason),
        );
    }

    let sandhi = is_sandhi(rule, language);
    let scope = if sandhi {
        BakeScope::AffixesOnly
    } else {
        BakeScope::Everything
    };
    let mut messages = Vec::new();

    let mut changed = language.clone();
    if scope == BakeScope::Everything {
        changed.lexis = apply_to_lexis(&language.lexis, rule, ctx, &mut messages);
    }
    changed.change_paradigm =
        apply_to_paradigm(&language.change_paradigm, rule, ctx, scope, &mut messages);
    changed.derivation_paradigm =
        apply_to_derivation_paradigm(&language.derivation_paradigm, rule, ctx, scope);
    let baked = changed.lexis != language.lexis
        || changed.change_paradigm != language.change_paradigm
        || changed.derivation_paradigm != language.derivation_paradigm;

    if sandhi {
        changed.change_paradigm.sandhi_rules.push(rule.clone());
    }
    let changed = changed.with_recomputed_inventory();

    let forms = match language_forms(&changed, ctx) {
        Ok(forms) => forms,
        Err(error) => {
            return reject(
                language,
                messages,
                format!("Rule '{}' rejected: {}", rule, error),
            )
        }
    };

    let surfaced = sandhi && language_forms(language, ctx).map_or(true, |old| old != forms);
    if !baked && !surfaced {
        return reject(
            language,
            messages,
            format!("Rule '{}' has no effect", rule),
        );
    }

    debug!(rule = %rule, sandhi, "rule applied");
    messages.push(if sandhi {
        format!("Applied '{}' as a live sandhi rule", rule)
    } else {
        format!("Applied '{}'", rule)
    });
    Outcome::new(changed, messages)
}
