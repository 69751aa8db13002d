use phonodrift::language::paradigm::{ExponenceCluster, SpeechPartChangeParadigm};
use phonodrift::{
    Affix, CategoryApplicator, Engine, Language, Phoneme, SpeechPart, StressType,
};

fn phonemes(engine: &Engine, text: &str) -> Vec<Phoneme> {
    engine.catalog().segment(text).unwrap()
}

fn lexicon(engine: &Engine, words: &[&str]) -> Language {
    words.iter().fold(Language::new(StressType::Unstressed), |language, text| {
        language.with_word(engine.word(text, SpeechPart::Noun, *text).unwrap())
    })
}

fn noun_paradigm(engine: &Engine, suffix: &str, prefix: Option<&str>) -> SpeechPartChangeParadigm {
    let mut paradigm = SpeechPartChangeParadigm::new(SpeechPart::Noun).with_cluster(
        ExponenceCluster::new("number")
            .with_value("sg", CategoryApplicator::Pass)
            .with_value("pl", CategoryApplicator::Affix(Affix::suffix(phonemes(engine, suffix)))),
    );
    if let Some(prefix) = prefix {
        paradigm = paradigm.with_cluster(
            ExponenceCluster::new("case")
                .with_value("nom", CategoryApplicator::Pass)
                .with_value("acc", CategoryApplicator::Affix(Affix::prefix(phonemes(engine, prefix)))),
        );
    }
    paradigm
}

fn texts(language: &Language) -> Vec<String> {
    language.lexis.iter().map(|w| w.text()).collect()
}

fn applicator<'a>(language: &'a Language, cluster: usize, value: &str) -> &'a CategoryApplicator {
    &language.change_paradigm.speech_parts[&SpeechPart::Noun].clusters[cluster].applicators[value]
}

fn all_forms(engine: &Engine, language: &Language) -> Vec<String> {
    engine
        .language_forms(language)
        .unwrap()
        .iter()
        .flatten()
        .map(|form| form.text())
        .collect()
}

#[test]
fn vowel_shift_reaches_words_and_affixes() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["aba", "abo", "ubo", "bacab", "bob", "bac"])
        .with_paradigm(noun_paradigm(&engine, "ab", Some("ac")));

    let rule = engine.parse_rule("a -> i / _").unwrap();
    assert!(!engine.is_sandhi(&rule, &language));
    let outcome = engine.apply(&language, &rule);
    let changed = outcome.value;

    assert_eq!(texts(&changed), vec!["ibi", "ibo", "ubo", "bicib", "bob", "bic"]);
    assert_eq!(
        applicator(&changed, 0, "pl"),
        &CategoryApplicator::Affix(Affix::suffix(phonemes(&engine, "ib")))
    );
    assert_eq!(
        applicator(&changed, 1, "acc"),
        &CategoryApplicator::Affix(Affix::prefix(phonemes(&engine, "ic")))
    );
    assert!(all_forms(&engine, &changed).contains(&"icbobib".to_string()));
    assert!(!changed.phonemes.contains(engine.catalog().get("a").unwrap()));
}

#[test]
fn vowel_shift_leaves_unrelated_affixes_alone() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["aba", "bob"]).with_paradigm(noun_paradigm(&engine, "ob", None));

    let outcome = engine.apply(&language, &engine.parse_rule("a -> i").unwrap());
    assert_eq!(texts(&outcome.value), vec!["ibi", "bob"]);
    assert_eq!(
        applicator(&outcome.value, 0, "pl"),
        &CategoryApplicator::Affix(Affix::suffix(phonemes(&engine, "ob")))
    );
}

#[test]
fn final_devoicing_without_affixes_is_baked() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["aba", "bob", "bac"]);

    let rule = engine.parse_rule("b -> t / _ $").unwrap();
    let outcome = engine.apply(&language, &rule);
    assert_eq!(texts(&outcome.value), vec!["aba", "bot", "bac"]);
    assert!(outcome.value.change_paradigm.sandhi_rules.is_empty());
    assert_eq!(outcome.messages.last().unwrap(), "Applied 'b -> t / _ $'");
}

#[test]
fn final_devoicing_with_a_suffix_stays_live() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["aba", "bob", "bac"]).with_paradigm(noun_paradigm(&engine, "ob", None));

    let rule = engine.parse_rule("b -> t / _ $").unwrap();
    assert!(engine.is_sandhi(&rule, &language));
    let changed = engine.apply(&language, &rule).value;

    assert_eq!(
        applicator(&changed, 0, "pl"),
        &CategoryApplicator::Affix(Affix::suffix(phonemes(&engine, "ot")))
    );
    assert_eq!(changed.change_paradigm.sandhi_rules, vec![rule]);
    assert_eq!(texts(&changed), vec!["aba", "bob", "bac"]);
    assert_eq!(
        all_forms(&engine, &changed),
        vec!["abaot", "aba", "bobot", "bot", "bacot", "bac"]
    );
}

#[test]
fn syncope_needs_structure_change() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["bata", "bab"]);

    let strict = engine.parse_rule("V -> - / $C _ CV").unwrap();
    let outcome = engine.apply(&language, &strict);
    assert_eq!(outcome.value, language);
    assert!(outcome.messages.iter().any(|m| m.starts_with("Reverted 'bata'")));

    let loose = engine.parse_rule("V -> - / $C _ CV!").unwrap();
    let outcome = engine.apply(&language, &loose);
    assert_eq!(texts(&outcome.value), vec!["bta", "bab"]);
}

#[test]
fn word_initial_rule_with_prefixes_is_sandhi() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["aba"]).with_paradigm(noun_paradigm(&engine, "ob", Some("ac")));

    let rule = engine.parse_rule("a -> i / $ _").unwrap();
    assert!(engine.is_sandhi(&rule, &language));

    let outcome = engine.apply(&language, &rule);
    let changed = outcome.value;
    assert_eq!(texts(&changed), vec!["aba"]);
    assert_eq!(changed.change_paradigm.sandhi_rules, vec![rule]);
    let forms = all_forms(&engine, &changed);
    assert!(forms.contains(&"iba".to_string()));
    assert!(forms.contains(&"icaba".to_string()));
}

#[test]
fn placeholders_expand_against_the_language() {
    let engine = Engine::new();
    let language = lexicon(&engine, &["bada", "tibbi"]);
    let rules = engine.parse_rules("<C> -> - / _ <C>", &language).unwrap();
    assert_eq!(rules.len(), language.phonemes.iter().filter(|p| !p.is_vowel()).count());

    let applied = engine.apply_all(&language, &rules);
    assert_eq!(texts(&applied.value), vec!["bada", "tibi"]);
}
