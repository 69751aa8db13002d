use crate::application::language::{apply_to_language, language_forms};
use crate::application::ApplicationContext;
use crate::applicability::{filter_applicable, inapplicable_reason, is_sandhi};
use crate::language::paradigm::WordForm;
use crate::language::syllable::SyllableTemplate;
use crate::language::word::{SpeechPart, Word};
use crate::language::Language;
use crate::outcome::Outcome;
use crate::parser::{parse_rule, parse_rules_from_source, INLINE_SOURCE};
use crate::phoneme::PhonemeInventory;
use crate::rule::PhonologicalRule;
use crate::settings::ChangeSettings;
use crate::DriftResult;
use tracing::debug;

/// The sound change engine.
///
/// Owns the phoneme catalog rules are parsed against and the settings that
/// bound composition and re-analysis. Languages are passed in and returned
/// as new snapshots; the engine keeps no per-language state.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: PhonemeInventory,
    settings: ChangeSettings,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            catalog: PhonemeInventory::default_catalog(),
            settings: ChangeSettings::default(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over a custom phoneme catalog
    pub fn with_catalog(catalog: PhonemeInventory) -> Self {
        Self {
            catalog,
            settings: ChangeSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ChangeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &PhonemeInventory {
        &self.catalog
    }

    pub fn settings(&self) -> &ChangeSettings {
        &self.settings
    }

    pub fn context(&self, language: &Language) -> ApplicationContext<'_> {
        ApplicationContext::new(&self.catalog, &self.settings, language.stress)
    }

    /// Parse one line of rule text, expanding placeholders against the
    /// phonemes `language` uses
    pub fn parse_rules(&self, text: &str, language: &Language) -> DriftResult<Vec<PhonologicalRule>> {
        self.parse_rules_from_source(text, INLINE_SOURCE, language)
    }

    pub fn parse_rules_from_source(
        &self,
        text: &str,
        source_id: &str,
        language: &Language,
    ) -> DriftResult<Vec<PhonologicalRule>> {
        parse_rules_from_source(text, source_id, &self.catalog, &language.phonemes)
    }

    /// Parse rule text that describes exactly one rule
    pub fn parse_rule(&self, text: &str) -> DriftResult<PhonologicalRule> {
        parse_rule(text, &self.catalog)
    }

    /// Build a word from its phoneme symbols in the catalog
    pub fn word(
        &self,
        text: &str,
        speech_part: SpeechPart,
        gloss: &str,
    ) -> DriftResult<Word> {
        Word::from_text(
            text,
            &self.catalog,
            SyllableTemplate::default(),
            speech_part,
            gloss,
        )
    }

    pub fn applicable_rules(
        &self,
        rules: &[PhonologicalRule],
        language: &Language,
    ) -> Vec<PhonologicalRule> {
        filter_applicable(rules, language)
    }

    pub fn inapplicable_reason(&self, rule: &PhonologicalRule, language: &Language) -> Option<String> {
        inapplicable_reason(rule, language)
    }

    pub fn is_sandhi(&self, rule: &PhonologicalRule, language: &Language) -> bool {
        is_sandhi(rule, language)
    }

    /// `first` followed by `second` as first-match alternatives, bounded by
    /// the configured alternative limit
    pub fn combine(
        &self,
        first: &PhonologicalRule,
        second: &PhonologicalRule,
    ) -> Option<Vec<PhonologicalRule>> {
        first.combine_sequential_bounded(second, &self.catalog, self.settings.max_alternatives)
    }

    /// Apply one rule to a language.
    ///
    /// A rejected rule yields the unchanged language; the messages say why.
    pub fn apply(&self, language: &Language, rule: &PhonologicalRule) -> Outcome<Language> {
        let ctx = self.context(language);
        apply_to_language(language, rule, &ctx)
    }

    /// Apply rules one after another, collecting every message
    pub fn apply_all(&self, language: &Language, rules: &[PhonologicalRule]) -> Outcome<Language> {
        let mut current = language.clone();
        let mut messages = Vec::new();
        for rule in rules {
            let (next, rule_messages) = self.apply(&current, rule).into_parts();
            messages.extend(rule_messages);
            current = next;
        }
        debug!(rules = rules.len(), messages = messages.len(), "applied rule list");
        Outcome::new(current, messages)
    }

    /// Every form the change paradigm builds for `word`
    pub fn forms(&self, language: &Language, word: &Word) -> DriftResult<Vec<WordForm>> {
        let ctx = self.context(language);
        language.change_paradigm.forms(word, &ctx)
    }

    /// Forms of every word in the lexicon, in lexicon order
    pub fn language_forms(&self, language: &Language) -> DriftResult<Vec<Vec<WordForm>>> {
        let ctx = self.context(language);
        language_forms(language, &ctx)
    }
}
