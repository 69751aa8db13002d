use super::phoneme;
use crate::phoneme::{ChangingPhoneme, Feature, PhonemeType, Prosody};
use crate::rule::PhonemeMatcher;
use std::collections::BTreeSet;

fn stressed(symbol: &str) -> ChangingPhoneme {
    ChangingPhoneme::with_prosody(phoneme(symbol), BTreeSet::from([Prosody::Stress]))
}

#[test]
fn test_exact_matches_only_its_phoneme() {
    let matcher = PhonemeMatcher::Exact(phoneme("a"));
    assert!(matcher.matches(&ChangingPhoneme::exact(phoneme("a"))));
    assert!(!matcher.matches(&ChangingPhoneme::exact(phoneme("i"))));
    assert!(!matcher.matches(&ChangingPhoneme::Deleted));
    assert!(!matcher.matches(&ChangingPhoneme::Boundary));
}

#[test]
fn test_pass_matches_every_slot() {
    assert!(PhonemeMatcher::Pass.matches(&ChangingPhoneme::Deleted));
    assert!(PhonemeMatcher::Pass.matches(&ChangingPhoneme::Boundary));
    assert!(PhonemeMatcher::Pass.matches(&ChangingPhoneme::exact(phoneme("k"))));
}

#[test]
fn test_boundary_matches_only_word_edges() {
    assert!(PhonemeMatcher::Boundary.matches(&ChangingPhoneme::Boundary));
    assert!(!PhonemeMatcher::Boundary.matches(&ChangingPhoneme::Deleted));
    assert!(!PhonemeMatcher::Boundary.matches(&ChangingPhoneme::exact(phoneme("a"))));
}

#[test]
fn test_type_and_feature_matchers() {
    let vowel = PhonemeMatcher::Type(PhonemeType::Vowel);
    assert!(vowel.matches(&ChangingPhoneme::exact(phoneme("a"))));
    assert!(!vowel.matches(&ChangingPhoneme::exact(phoneme("b"))));

    let voiced = PhonemeMatcher::Feature(Feature::Voiced);
    let voiceless = PhonemeMatcher::AbsentFeature(Feature::Voiced);
    assert!(voiced.matches(&ChangingPhoneme::exact(phoneme("b"))));
    assert!(voiceless.matches(&ChangingPhoneme::exact(phoneme("p"))));
    assert!(!voiceless.matches(&ChangingPhoneme::exact(phoneme("b"))));
}

#[test]
fn test_prosody_matchers_read_the_slot() {
    let stress = PhonemeMatcher::Prosody(Prosody::Stress);
    assert!(stress.matches(&stressed("a")));
    assert!(!stress.matches(&ChangingPhoneme::exact(phoneme("a"))));
    assert!(PhonemeMatcher::AbsentProsody(Prosody::Stress)
        .matches(&ChangingPhoneme::exact(phoneme("a"))));
}

#[test]
fn test_accepts_ignores_prosody() {
    let matcher = PhonemeMatcher::All(vec![
        PhonemeMatcher::Exact(phoneme("a")),
        PhonemeMatcher::Prosody(Prosody::Stress),
    ]);
    assert!(matcher.accepts(&phoneme("a")));
    assert!(!matcher.matches(&ChangingPhoneme::exact(phoneme("a"))));
    assert!(matcher.matches(&stressed("a")));
}

#[test]
fn test_unite_detects_contradictions() {
    let vowel = PhonemeMatcher::Type(PhonemeType::Vowel);
    let consonant = PhonemeMatcher::Type(PhonemeType::Consonant);
    assert_eq!(vowel.unite(&consonant), None);
    assert_eq!(
        PhonemeMatcher::Feature(Feature::Voiced).unite(&PhonemeMatcher::AbsentFeature(Feature::Voiced)),
        None
    );
    assert_eq!(PhonemeMatcher::Exact(phoneme("a")).unite(&consonant), None);
    assert_eq!(
        PhonemeMatcher::Boundary.unite(&PhonemeMatcher::Exact(phoneme("a"))),
        None
    );
}

#[test]
fn test_unite_keeps_the_smallest_form() {
    let a = PhonemeMatcher::Exact(phoneme("a"));
    let vowel = PhonemeMatcher::Type(PhonemeType::Vowel);
    assert_eq!(a.unite(&vowel), Some(a.clone()));
    assert_eq!(PhonemeMatcher::Pass.unite(&vowel), Some(vowel.clone()));
    assert_eq!(
        a.unite(&PhonemeMatcher::Prosody(Prosody::Stress)),
        Some(PhonemeMatcher::All(vec![
            a.clone(),
            PhonemeMatcher::Prosody(Prosody::Stress)
        ]))
    );
}

#[test]
fn test_implies() {
    let b = PhonemeMatcher::Exact(phoneme("b"));
    let vowel = PhonemeMatcher::Type(PhonemeType::Vowel);
    let high_vowel = PhonemeMatcher::All(vec![vowel.clone(), PhonemeMatcher::Feature(Feature::High)]);

    assert!(b.implies(&PhonemeMatcher::Feature(Feature::Voiced)));
    assert!(b.implies(&PhonemeMatcher::Type(PhonemeType::Consonant)));
    assert!(!b.implies(&vowel));
    assert!(high_vowel.implies(&vowel));
    assert!(!vowel.implies(&high_vowel));
    assert!(vowel.implies(&PhonemeMatcher::Pass));
}

#[test]
fn test_display() {
    assert_eq!(PhonemeMatcher::Exact(phoneme("a")).to_string(), "a");
    assert_eq!(PhonemeMatcher::Exact(phoneme("ts")).to_string(), "|ts|");
    assert_eq!(PhonemeMatcher::Feature(Feature::Voiced).to_string(), "[+Voiced]");
    assert_eq!(PhonemeMatcher::AbsentFeature(Feature::Nasal).to_string(), "[-Nasal]");
    assert_eq!(PhonemeMatcher::Boundary.to_string(), "$");
    assert_eq!(PhonemeMatcher::Prosody(Prosody::Stress).to_string(), "(*{+Stress})");
    assert_eq!(
        PhonemeMatcher::All(vec![
            PhonemeMatcher::Type(PhonemeType::Vowel),
            PhonemeMatcher::Feature(Feature::High),
            PhonemeMatcher::AbsentProsody(Prosody::Stress),
        ])
        .to_string(),
        "(V[+High]{-Stress})"
    );
}
