use super::{affixed_language, phonemes, rule, word};
use crate::applicability::{filter_applicable, inapplicable_reason, is_sandhi};
use crate::language::affix::Affix;
use crate::language::paradigm::{CategoryApplicator, ExponenceCluster, SpeechPartChangeParadigm};
use crate::language::word::SpeechPart;
use crate::language::{Language, StressType};

fn suffixing_language() -> Language {
    Language::new(StressType::Unstressed)
        .with_word(word("bab"))
        .with_paradigm(
            SpeechPartChangeParadigm::new(SpeechPart::Noun).with_cluster(
                ExponenceCluster::new("number")
                    .with_value("pl", CategoryApplicator::Affix(Affix::suffix(phonemes("ob")))),
            ),
        )
}

#[test]
fn test_filter_applicable_keeps_resolvable_rules() {
    let language = affixed_language(&["bab"], "ob", "ic");
    let candidates = vec![
        rule("o -> u"),
        rule("u -> o"),
        rule("[+Nasal] -> -"),
        rule("a -> i / _ $"),
    ];
    assert_eq!(
        filter_applicable(&candidates, &language),
        vec![rule("o -> u"), rule("a -> i / _ $")]
    );
}

#[test]
fn test_missing_phoneme_is_reported() {
    let language = affixed_language(&["bab"], "ob", "ic");
    let reason = inapplicable_reason(&rule("u -> o"), &language).unwrap();
    assert!(reason.contains("'u'"));
}

#[test]
fn test_stress_matchers_need_a_stressed_language() {
    let stressed_vowel = rule("(V{+Stress}) -> a");

    let unstressed = Language::new(StressType::Unstressed).with_word(word("bab"));
    let reason = inapplicable_reason(&stressed_vowel, &unstressed).unwrap();
    assert!(reason.contains("needs stress"));

    let initial = Language::new(StressType::Initial).with_word(word("bab"));
    assert_eq!(inapplicable_reason(&stressed_vowel, &initial), None);
}

#[test]
fn test_boundary_rules_are_sandhi_only_where_affixes_attach() {
    let both = affixed_language(&["bab"], "ob", "ic");
    let suffixing = suffixing_language();
    let initial = rule("a -> i / $ _");
    let final_ = rule("b -> t / _ $");

    assert!(is_sandhi(&initial, &both));
    assert!(!is_sandhi(&initial, &suffixing));
    assert!(is_sandhi(&final_, &suffixing));
    assert!(!is_sandhi(&rule("a -> i"), &both));
}

#[test]
fn test_bare_words_have_no_sandhi() {
    let language = Language::new(StressType::Unstressed).with_word(word("bab"));
    assert!(!is_sandhi(&rule("b -> t / _ $"), &language));
}

#[test]
fn test_lexical_stress_rules_are_sandhi() {
    let language = Language::new(StressType::Lexical).with_word(word("bab").with_stress_on(0));
    assert!(is_sandhi(&rule("(V{+Stress}) -> o"), &language));
    assert!(!is_sandhi(&rule("a -> o"), &language));
}
