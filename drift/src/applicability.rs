//! Which rules make sense for a language, and which must stay live

use crate::language::{Language, StressType};
use crate::rule::{PhonemeMatcher, PhonologicalRule};

/// Why `matcher` cannot match any slot of `language`
fn unresolved(matcher: &PhonemeMatcher, language: &Language) -> Option<String> {
    match matcher {
        PhonemeMatcher::Pass | PhonemeMatcher::Boundary => None,
        PhonemeMatcher::Exact(phoneme) => (!language.phonemes.contains(phoneme))
            .then(|| format!("phoneme '{}' is not in the inventory", phoneme)),
        _ => {
            if matcher.is_prosodic() && !language.stress.has_stress() {
                return Some(format!("{} needs stress, but the language has none", matcher));
            }
            let segmental = matcher
                .atoms()
                .iter()
                .any(|a| !matches!(a, PhonemeMatcher::Prosody(_) | PhonemeMatcher::AbsentProsody(_)));
            if segmental && !language.phonemes.iter().any(|p| matcher.accepts(p)) {
                return Some(format!("no phoneme of the inventory matches {}", matcher));
            }
            None
        }
    }
}

/// The first reason `rule` cannot apply to `language`, if any
pub fn inapplicable_reason(rule: &PhonologicalRule, language: &Language) -> Option<String> {
    rule.matchers().find_map(|m| unresolved(m, language))
}

pub fn is_applicable(rule: &PhonologicalRule, language: &Language) -> bool {
    inapplicable_reason(rule, language).is_none()
}

/// Rules whose every matcher resolves against the language
pub fn filter_applicable(rules: &[PhonologicalRule], language: &Language) -> Vec<PhonologicalRule> {
    rules
        .iter()
        .filter(|rule| is_applicable(rule, language))
        .cloned()
        .collect()
}

/// Whether the rule must stay a live post-lexical rule.
///
/// That is the case when it looks across an affix boundary the language
/// actually has, or reads stress that is stored per morpheme.
pub fn is_sandhi(rule: &PhonologicalRule, language: &Language) -> bool {
    let has_boundary = |ms: &[PhonemeMatcher]| ms.iter().any(|m| m.is_boundary());
    let in_target = has_boundary(rule.target());
    let crosses_start = (in_target || has_boundary(rule.preceding())) && language.has_prefixes();
    let crosses_end = (in_target || has_boundary(rule.following())) && language.has_suffixes();
    let reads_stress =
        language.stress == StressType::Lexical && rule.matchers().any(|m| m.is_prosodic());
    crosses_start || crosses_end || reads_stress
}
