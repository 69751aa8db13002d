use super::{phonemes, rule, with_context, word};
use crate::application::affix::{apply_to_affix, apply_to_infix};
use crate::language::affix::{Affix, SingleChange, TemplateChange};
use crate::language::word::Morpheme;
use crate::language::StressType;
use crate::phoneme::PhonemeType;
use crate::rule::{PhonemeMatcher, PhonemeSubstitution};

fn rewrite(affix: &Affix, text: &str) -> Affix {
    with_context(StressType::Unstressed, |ctx| apply_to_affix(affix, &rule(text), ctx))
}

#[test]
fn test_suffix_literal_is_rewritten() {
    let rewritten = rewrite(&Affix::suffix(phonemes("ab")), "a -> i");
    assert_eq!(rewritten, Affix::suffix(phonemes("ib")));
}

#[test]
fn test_prefix_literal_is_rewritten() {
    let rewritten = rewrite(&Affix::prefix(phonemes("ac")), "a -> i");
    assert_eq!(rewritten, Affix::prefix(phonemes("ic")));
}

#[test]
fn test_unmatched_affix_is_untouched() {
    let affix = Affix::suffix(phonemes("ob"));
    assert_eq!(rewrite(&affix, "a -> i"), affix);
}

#[test]
fn test_word_edge_rule_reaches_the_suffix() {
    let rewritten = rewrite(&Affix::suffix(phonemes("ob")), "b -> t / _ $");
    assert_eq!(rewritten, Affix::suffix(phonemes("ot")));
}

#[test]
fn test_rule_across_the_boundary_becomes_a_stem_condition() {
    let rewritten = rewrite(&Affix::prefix(phonemes("a")), "a -> e / _ b");
    let conditional =
        SingleChange::new(phonemes("e"), vec![PhonemeMatcher::Exact(super::phoneme("b"))], vec![
            PhonemeSubstitution::Pass,
        ])
        .unwrap();
    assert_eq!(
        rewritten,
        Affix::Prefix(TemplateChange::Sequence(vec![
            conditional,
            SingleChange::literal(phonemes("a")),
        ]))
    );
    assert_eq!(rewritten.to_string(), "e[b -> *]|a-");
}

#[test]
fn test_conditional_prefix_picks_the_first_matching_alternative() {
    let affix = rewrite(&Affix::prefix(phonemes("a")), "a -> e / _ b");
    with_context(StressType::Unstressed, |ctx| {
        let before_b = affix.apply(&word("bab"), ctx).unwrap();
        assert_eq!(before_b.text(), "ebab");
        assert_eq!(before_b.morphemes, vec![Morpheme::affix(1), Morpheme::root(3)]);

        let elsewhere = affix.apply(&word("dab"), ctx).unwrap();
        assert_eq!(elsewhere.text(), "adab");
    });
}

#[test]
fn test_suffix_attaches_at_the_end() {
    let attached = with_context(StressType::Unstressed, |ctx| {
        Affix::suffix(phonemes("ob")).apply(&word("bab"), ctx)
    })
    .unwrap();
    assert_eq!(attached.text(), "babob");
    assert_eq!(attached.morphemes, vec![Morpheme::root(3), Morpheme::affix(2)]);
}

#[test]
fn test_stem_changing_suffix() {
    // -i that deletes a stem-final vowel
    let change = SingleChange::new(
        phonemes("i"),
        vec![PhonemeMatcher::Type(PhonemeType::Vowel)],
        vec![PhonemeSubstitution::Delete],
    )
    .unwrap();
    let affix = Affix::Suffix(TemplateChange::from_alternatives(vec![
        change,
        SingleChange::literal(phonemes("i")),
    ]));
    with_context(StressType::Unstressed, |ctx| {
        assert_eq!(affix.apply(&word("baba"), ctx).unwrap().text(), "babi");
        assert_eq!(affix.apply(&word("bab"), ctx).unwrap().text(), "babi");
    });
}

#[test]
fn test_affix_that_becomes_empty() {
    let rewritten = rewrite(&Affix::suffix(phonemes("a")), "a -> -");
    assert!(rewritten.is_empty());
}

#[test]
fn test_from_alternatives_simplifies() {
    let a = SingleChange::literal(phonemes("a"));
    let e = SingleChange::literal(phonemes("e"));
    assert_eq!(
        TemplateChange::from_alternatives(vec![a.clone(), a.clone()]),
        TemplateChange::Single(a.clone())
    );
    assert_eq!(
        TemplateChange::from_alternatives(vec![a.clone(), e]),
        TemplateChange::Single(a.clone())
    );
    assert_eq!(
        TemplateChange::from_alternatives(Vec::new()),
        TemplateChange::Single(SingleChange::literal(Vec::new()))
    );
}

#[test]
fn test_from_alternatives_drops_subsumed_alternatives() {
    let specific = SingleChange::new(
        phonemes("e"),
        vec![PhonemeMatcher::Exact(super::phoneme("b"))],
        vec![PhonemeSubstitution::Pass],
    )
    .unwrap();
    let general = SingleChange::new(
        phonemes("e"),
        vec![PhonemeMatcher::Type(PhonemeType::Consonant)],
        vec![PhonemeSubstitution::Pass],
    )
    .unwrap();
    assert_eq!(
        TemplateChange::from_alternatives(vec![specific, general.clone()]),
        TemplateChange::Single(general)
    );
}

#[test]
fn test_single_change_checks_alignment() {
    assert!(SingleChange::new(
        phonemes("e"),
        vec![PhonemeMatcher::Type(PhonemeType::Consonant)],
        Vec::new()
    )
    .is_err());
}

#[test]
fn test_infix_is_rewritten_without_boundaries() {
    let rewritten = with_context(StressType::Unstressed, |ctx| {
        apply_to_infix(&phonemes("ab"), &rule("b -> t / _ $"), ctx)
    });
    assert_eq!(rewritten, phonemes("ab"));

    let rewritten = with_context(StressType::Unstressed, |ctx| {
        apply_to_infix(&phonemes("ab"), &rule("a -> o"), ctx)
    });
    assert_eq!(rewritten, phonemes("ob"));
}
