use super::{catalog, rule, slots, text_of};
use crate::application::{apply_first_matching, apply_to_sequence};
use crate::phoneme::PhonemeType;
use crate::rule::PhonemeMatcher;

#[test]
fn test_mirror_swaps_context() {
    let mirrored = rule("ab -> ba / c _ d").mirror();
    assert_eq!(mirrored, rule("ba -> ab / d _ c"));
    assert_eq!(mirrored.mirror(), rule("ab -> ba / c _ d"));
}

#[test]
fn test_trim_moves_unchanged_slots_into_context() {
    let trimmed = rule("bac -> *i* / $ _").trim();
    assert_eq!(trimmed, rule("a -> i / $b _ c"));
    assert_eq!(trimmed.trim(), trimmed);
}

#[test]
fn test_trim_keeps_insertion_points() {
    let trimmed = rule("bb -> *(ə)* / _").trim();
    assert_eq!(trimmed, rule("-> (ə) / b _ b"));
}

#[test]
fn test_trim_without_changes_is_identity() {
    let unchanged = rule("ab -> ** / c _");
    assert_eq!(unchanged.trim(), unchanged);
    assert!(!unchanged.has_effect());
}

#[test]
fn test_combine_chain_collapses() {
    let combined = rule("a -> e").combine_sequential(&rule("e -> i"), &catalog());
    assert_eq!(combined, Some(vec![rule("a -> i")]));
}

#[test]
fn test_combine_disjoint_rules_keeps_the_first() {
    let combined = rule("a -> e").combine_sequential(&rule("b -> p"), &catalog());
    assert_eq!(combined, Some(vec![rule("a -> e")]));
}

#[test]
fn test_combine_narrowing_puts_specific_alternative_first() {
    let combined = rule("a -> e").combine_sequential(&rule("e -> i / _ b"), &catalog());
    assert_eq!(combined, Some(vec![rule("a -> i / _ b"), rule("a -> e")]));
}

#[test]
fn test_combine_rewrites_inserted_phonemes() {
    let combined = rule("-> (e) / b _ b").combine_sequential(&rule("e -> i"), &catalog());
    assert_eq!(combined, Some(vec![rule("-> (i) / b _ b")]));
}

#[test]
fn test_combine_lifts_feature_changes() {
    // Voicing turns p into b, which the second rule then replaces with m
    let combined = rule("p -> [+Voiced]").combine_sequential(&rule("b -> m"), &catalog());
    assert_eq!(combined, Some(vec![rule("p -> m")]));
}

#[test]
fn test_combine_splits_off_phonemes_without_a_counterpart() {
    // ʔ and h have no voiced partner, so voicing leaves them for the second rule to skip
    let first = rule("C -> [+Voiced]");
    let second = rule("(C[+Voiced]) -> n");
    let combined = first.combine_sequential(&second, &catalog()).unwrap();
    assert_eq!(
        combined,
        vec![rule("ʔ -> [+Voiced]"), rule("h -> [+Voiced]"), rule("C -> n")]
    );

    let input = slots("hata");
    let sequential = apply_to_sequence(&apply_to_sequence(&input, &first, &catalog()), &second, &catalog());
    assert_eq!(text_of(&sequential), "hana");
    assert_eq!(apply_first_matching(&input, &combined, &catalog()), sequential);
    assert_eq!(first.merge_sequential(&second, &catalog()), vec![first, second]);
}

#[test]
fn test_combine_reaches_a_phoneme_the_change_leaves_alone() {
    let first = rule("C -> [+Voiced]");
    let second = rule("h -> x");
    let combined = first.combine_sequential(&second, &catalog()).unwrap();
    assert_eq!(combined, vec![rule("h -> x"), rule("C -> [+Voiced]")]);

    let input = slots("hat");
    let sequential = apply_to_sequence(&apply_to_sequence(&input, &first, &catalog()), &second, &catalog());
    assert_eq!(text_of(&sequential), "xad");
    assert_eq!(apply_first_matching(&input, &combined, &catalog()), sequential);
}

#[test]
fn test_combine_respects_the_alternative_limit() {
    let first = rule("a -> e");
    let second = rule("e -> i / _ b");
    assert_eq!(first.combine_sequential_bounded(&second, &catalog(), 1), None);
    assert!(first
        .combine_sequential_bounded(&second, &catalog(), 2)
        .is_some());
}

#[test]
fn test_merge_folds_a_clean_chain() {
    let merged = rule("a -> e").merge_sequential(&rule("e -> i"), &catalog());
    assert_eq!(merged, vec![rule("a -> i")]);
}

#[test]
fn test_merge_keeps_both_rules_when_narrowing() {
    let merged = rule("a -> e").merge_sequential(&rule("e -> i / _ b"), &catalog());
    assert_eq!(merged, vec![rule("a -> e"), rule("e -> i / _ b")]);
}

#[test]
fn test_merge_keeps_both_rules_when_second_never_fires() {
    let merged = rule("a -> e").merge_sequential(&rule("b -> p"), &catalog());
    assert_eq!(merged, vec![rule("a -> e"), rule("b -> p")]);
}

#[test]
fn test_with_target_matcher() {
    let narrowed = rule("V -> i").with_target_matcher(0, PhonemeMatcher::Exact(super::phoneme("a")));
    assert_eq!(narrowed, rule("a -> i"));
    let untouched = rule("V -> i").with_target_matcher(3, PhonemeMatcher::Type(PhonemeType::Consonant));
    assert_eq!(untouched, rule("V -> i"));
}
