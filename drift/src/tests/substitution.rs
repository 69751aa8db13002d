use super::{catalog, phoneme};
use crate::phoneme::{ChangingPhoneme, Feature, FeatureChange, Prosody};
use crate::rule::PhonemeSubstitution;
use std::collections::BTreeSet;

#[test]
fn test_exact_keeps_prosody() {
    let stress = BTreeSet::from([Prosody::Stress]);
    let slot = ChangingPhoneme::with_prosody(phoneme("a"), stress.clone());
    let result = PhonemeSubstitution::Exact(phoneme("i")).apply(&slot, &catalog());
    assert_eq!(result, ChangingPhoneme::with_prosody(phoneme("i"), stress));
}

#[test]
fn test_boundary_and_deleted_slots_are_never_altered() {
    let catalog = catalog();
    for substitution in [
        PhonemeSubstitution::Exact(phoneme("i")),
        PhonemeSubstitution::Delete,
        PhonemeSubstitution::Modify(vec![FeatureChange::add(Feature::Voiced)]),
    ] {
        assert_eq!(
            substitution.apply(&ChangingPhoneme::Boundary, &catalog),
            ChangingPhoneme::Boundary
        );
        assert_eq!(
            substitution.apply(&ChangingPhoneme::Deleted, &catalog),
            ChangingPhoneme::Deleted
        );
    }
}

#[test]
fn test_modify_finds_the_catalog_phoneme() {
    let devoice = PhonemeSubstitution::Modify(vec![FeatureChange::remove(Feature::Voiced)]);
    assert_eq!(
        devoice.apply(&ChangingPhoneme::exact(phoneme("b")), &catalog()),
        ChangingPhoneme::exact(phoneme("p"))
    );
}

#[test]
fn test_modify_without_a_match_keeps_the_phoneme() {
    let nasalize = PhonemeSubstitution::Modify(vec![FeatureChange::add(Feature::Nasal)]);
    assert_eq!(
        nasalize.apply(&ChangingPhoneme::exact(phoneme("a")), &catalog()),
        ChangingPhoneme::exact(phoneme("a"))
    );
}

#[test]
fn test_delete_leaves_a_deleted_slot() {
    assert_eq!(
        PhonemeSubstitution::Delete.apply(&ChangingPhoneme::exact(phoneme("a")), &catalog()),
        ChangingPhoneme::Deleted
    );
}

#[test]
fn test_then_composes_substitutions() {
    let catalog = catalog();
    let b = PhonemeSubstitution::Exact(phoneme("b"));
    let devoice = PhonemeSubstitution::Modify(vec![FeatureChange::remove(Feature::Voiced)]);
    let voice = PhonemeSubstitution::Modify(vec![FeatureChange::add(Feature::Voiced)]);

    assert_eq!(b.then(None, &catalog), b);
    assert_eq!(b.then(Some(&devoice), &catalog), PhonemeSubstitution::Exact(phoneme("p")));
    assert_eq!(PhonemeSubstitution::Pass.then(Some(&b), &catalog), b);
    assert_eq!(
        PhonemeSubstitution::Delete.then(Some(&b), &catalog),
        PhonemeSubstitution::Delete
    );
    assert_eq!(b.then(Some(&PhonemeSubstitution::Delete), &catalog), PhonemeSubstitution::Delete);
    assert_eq!(devoice.then(Some(&voice), &catalog), voice);
}

#[test]
fn test_display() {
    assert_eq!(PhonemeSubstitution::Pass.to_string(), "*");
    assert_eq!(PhonemeSubstitution::Delete.to_string(), "-");
    assert_eq!(PhonemeSubstitution::Exact(phoneme("ts")).to_string(), "|ts|");
    assert_eq!(PhonemeSubstitution::Epenthesis(phoneme("ə")).to_string(), "(ə)");
    assert_eq!(
        PhonemeSubstitution::Modify(vec![
            FeatureChange::add(Feature::High),
            FeatureChange::remove(Feature::Mid)
        ])
        .to_string(),
        "[+High,-Mid]"
    );
}
