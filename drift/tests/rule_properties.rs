use phonodrift::application::{apply_first_matching, apply_to_sequence};
use phonodrift::phoneme::{to_changing, ChangingPhoneme};
use phonodrift::{Engine, PhonemeInventory, PhonologicalRule};
use proptest::prelude::*;

fn matcher_tokens(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "i", "t", "V", "C", "*"]), len)
}

fn rule_text() -> impl Strategy<Value = String> {
    (1usize..4)
        .prop_flat_map(|width| {
            (
                matcher_tokens(width..width + 1),
                prop::collection::vec(
                    prop::sample::select(vec!["a", "i", "t", "-", "*", "[+Voiced]"]),
                    width..width + 1,
                ),
                prop::collection::vec(prop::sample::select(vec!["$", "b", "V"]), 0..2),
                prop::collection::vec(prop::sample::select(vec!["$", "a", "C"]), 0..2),
                any::<bool>(),
            )
        })
        .prop_map(|(target, substitutions, preceding, following, loose)| {
            format!(
                "{} -> {} / {} _ {}{}",
                target.join(""),
                substitutions.join(""),
                preceding.join(""),
                following.join(""),
                if loose { "!" } else { "" }
            )
        })
}

/// One-slot rule with optional context whose substitution may be a feature change
fn first_rule_text() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["a", "i", "h", "t", "ʔ", "C", "V", "[+Voiced]", "[-Voiced]"]),
        prop::sample::select(vec!["i", "a", "-", "[+Voiced]", "[-Voiced]", "*"]),
        prop::collection::vec(prop::sample::select(vec!["$", "a", "C", "V"]), 0..2),
        prop::collection::vec(prop::sample::select(vec!["$", "a", "C", "V"]), 0..2),
    )
        .prop_map(|(target, substitution, preceding, following)| {
            format!(
                "{} -> {} / {} _ {}",
                target,
                substitution,
                preceding.join(""),
                following.join("")
            )
        })
}

/// One-slot rule without context
fn second_rule_text() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["a", "i", "h", "t", "d", "ʔ", "n", "C", "V", "[+Voiced]", "[-Voiced]"]),
        prop::sample::select(vec!["i", "n", "x", "-", "[+Voiced]", "[-Voiced]"]),
    )
        .prop_map(|(target, substitution)| format!("{} -> {}", target, substitution))
}

fn gap_word() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(vec!["a", "i", "h", "t", "d", "ʔ"]), 1..7)
}

/// Whether every slot `second` matches after `first` is a target `first` rewrote
fn second_only_sees_changes(
    slots: &[ChangingPhoneme],
    first: &PhonologicalRule,
    second: &PhonologicalRule,
    catalog: &PhonemeInventory,
) -> bool {
    let mut changed = vec![false; slots.len()];
    if first.substitutions().iter().any(|s| s.is_change()) {
        for index in 0..slots.len() {
            if first.matches_at(slots, index) {
                changed[index + first.preceding().len()] = true;
            }
        }
    }
    let middle = apply_to_sequence(slots, first, catalog);
    (0..middle.len())
        .filter(|&index| second.matches_at(&middle, index))
        .all(|index| changed[index])
}

fn parse(engine: &Engine, text: &str) -> Option<PhonologicalRule> {
    engine.parse_rule(text).ok()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_mirror_is_an_involution(text in rule_text()) {
        let engine = Engine::new();
        if let Some(rule) = parse(&engine, &text) {
            prop_assert_eq!(rule.mirror().mirror(), rule);
        }
    }

    #[test]
    fn prop_display_parses_back(text in rule_text()) {
        let engine = Engine::new();
        if let Some(rule) = parse(&engine, &text) {
            let printed = rule.to_string();
            prop_assert_eq!(engine.parse_rule(&printed).ok(), Some(rule));
        }
    }

    #[test]
    fn prop_trim_is_idempotent(text in rule_text()) {
        let engine = Engine::new();
        if let Some(rule) = parse(&engine, &text) {
            let trimmed = rule.trim();
            prop_assert_eq!(trimmed.trim(), trimmed);
        }
    }

    #[test]
    fn prop_trim_keeps_the_effect(
        text in rule_text(),
        word in prop::collection::vec(prop::sample::select(vec!["a", "b", "i", "t"]), 1..7),
    ) {
        let engine = Engine::new();
        if let Some(rule) = parse(&engine, &text) {
            let phonemes = engine.catalog().segment(&word.concat()).unwrap();
            let slots = to_changing(&phonemes, true);
            prop_assert_eq!(
                apply_to_sequence(&slots, &rule.trim(), engine.catalog()),
                apply_to_sequence(&slots, &rule, engine.catalog())
            );
        }
    }

    #[test]
    fn prop_combined_alternatives_match_sequential_application(
        first in first_rule_text(),
        second in second_rule_text(),
        word in gap_word(),
    ) {
        let engine = Engine::new();
        let catalog = engine.catalog();
        if let (Some(first), Some(second)) = (parse(&engine, &first), parse(&engine, &second)) {
            let phonemes = catalog.segment(&word.concat()).unwrap();
            let slots = to_changing(&phonemes, true);
            if second_only_sees_changes(&slots, &first, &second, catalog) {
                if let Some(combined) = first.combine_sequential(&second, catalog) {
                    let sequential =
                        apply_to_sequence(&apply_to_sequence(&slots, &first, catalog), &second, catalog);
                    prop_assert_eq!(apply_first_matching(&slots, &combined, catalog), sequential);
                }
            }
        }
    }

    #[test]
    fn prop_merged_rules_match_sequential_application(
        first in first_rule_text(),
        second in second_rule_text(),
        word in gap_word(),
    ) {
        let engine = Engine::new();
        let catalog = engine.catalog();
        if let (Some(first), Some(second)) = (parse(&engine, &first), parse(&engine, &second)) {
            let phonemes = catalog.segment(&word.concat()).unwrap();
            let slots = to_changing(&phonemes, true);
            if second_only_sees_changes(&slots, &first, &second, catalog) {
                let merged = first
                    .merge_sequential(&second, catalog)
                    .iter()
                    .fold(slots.clone(), |current, rule| apply_to_sequence(&current, rule, catalog));
                let sequential =
                    apply_to_sequence(&apply_to_sequence(&slots, &first, catalog), &second, catalog);
                prop_assert_eq!(merged, sequential);
            }
        }
    }
}
