// Rule tests
mod algebra;
mod matcher;
mod substitution;

// Application tests
mod affix;


// Selection tests
mod applicability;

use crate::application::ApplicationContext;
use crate::language::affix::Affix;
use crate::language::paradigm::{CategoryApplicator, ExponenceCluster, SpeechPartChangeParadigm};
use crate::language::syllable::SyllableTemplate;
use crate::language::word::{SpeechPart, Word};
use crate::language::{Language, StressType};
use crate::parser::parse_rule;
use crate::phoneme::{ChangingPhoneme, Phoneme, PhonemeInventory};
use crate::rule::PhonologicalRule;
use crate::settings::ChangeSettings;

fn catalog() -> PhonemeInventory {
    PhonemeInventory::default_catalog()
}

fn phoneme(symbol: &str) -> Phoneme {
    catalog().get(symbol).cloned().unwrap()
}

fn phonemes(text: &str) -> Vec<Phoneme> {
    catalog().segment(text).unwrap()
}

fn slots(text: &str) -> Vec<ChangingPhoneme> {
    phonemes(text).into_iter().map(ChangingPhoneme::exact).collect()
}

fn text_of(slots: &[ChangingPhoneme]) -> String {
    slots.iter().map(|s| s.to_string()).collect()
}

fn rule(text: &str) -> PhonologicalRule {
    parse_rule(text, &catalog()).unwrap()
}

fn word(text: &str) -> Word {
    Word::from_text(
        text,
        &catalog(),
        SyllableTemplate::default(),
        SpeechPart::Noun,
        text,
    )
    .unwrap()
}

/// Nouns with a plural suffix and an accusative prefix
fn affixed_language(words: &[&str], suffix: &str, prefix: &str) -> Language {
    let mut language = Language::new(StressType::Unstressed);
    for text in words {
        language = language.with_word(word(text));
    }
    language.with_paradigm(
        SpeechPartChangeParadigm::new(SpeechPart::Noun)
            .with_cluster(
                ExponenceCluster::new("number")
                    .with_value("sg", CategoryApplicator::Pass)
                    .with_value("pl", CategoryApplicator::Affix(Affix::suffix(phonemes(suffix)))),
            )
            .with_cluster(
                ExponenceCluster::new("case")
                    .with_value("nom", CategoryApplicator::Pass)
                    .with_value("acc", CategoryApplicator::Affix(Affix::prefix(phonemes(prefix)))),
            ),
    )
}

fn with_context<T>(stress: StressType, f: impl FnOnce(&ApplicationContext) -> T) -> T {
    let catalog = catalog();
    let settings = ChangeSettings::default();
    let ctx = ApplicationContext::new(&catalog, &settings, stress);
    f(&ctx)
}
