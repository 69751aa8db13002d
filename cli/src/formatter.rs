use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use phonodrift::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
use serde::Serialize;

/// A word before and after the change
#[derive(Debug, Serialize)]
pub struct WordReport {
    pub gloss: String,
    pub before: String,
    pub after: String,
    /// Syllabified form after the change, with stress marks
    pub syllables: String,
}

/// One inflected form of a word
#[derive(Debug, Serialize)]
pub struct FormReport {
    pub gloss: String,
    pub categories: String,
    pub form: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub messages: Vec<String>,
}

/// Everything the apply and evolve commands print
#[derive(Debug, Serialize)]
pub struct ChangeReport {
    /// Parsed rules for apply, live sandhi rules for evolve
    pub rules: Vec<String>,
    pub words: Vec<WordReport>,
    pub forms: Vec<FormReport>,
    pub generations: Vec<GenerationReport>,
    pub tendencies: Vec<String>,
}

enum LineType {
    Message,
    LastMessage,
}

impl LineType {
    fn format_line(&self, base_prefix: &str, content: &str) -> String {
        let symbol = match self {
            LineType::Message => "├─",
            LineType::LastMessage => "└─",
        };
        format!("{}{} {}\n", base_prefix, symbol, content)
    }
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_apply(&self, report: &ChangeReport) -> String {
        let mut output = String::new();

        if report.rules.is_empty() {
            output.push_str("No rules: every placeholder lacks a matching phoneme\n");
        } else {
            for rule in &report.rules {
                output.push_str(&format!("{}\n", rule));
            }
        }
        for generation in &report.generations {
            output.push_str(&self.format_messages("", &generation.messages));
        }
        output.push('\n');

        output.push_str(&self.format_words_table(&report.words));
        output.push('\n');

        if !report.forms.is_empty() {
            output.push_str(&self.format_forms_table(&report.forms));
            output.push('\n');
        }

        output
    }

    pub fn format_evolution(&self, report: &ChangeReport) -> String {
        let mut output = String::new();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Generation").set_alignment(CellAlignment::Right),
            Cell::new("Messages").set_alignment(CellAlignment::Left),
        ]));
        for generation in &report.generations {
            let messages = self.format_messages("", &generation.messages);
            table.add_row(Row::from(vec![
                Cell::new(generation.generation).set_alignment(CellAlignment::Right),
                Cell::new(messages.trim_end()),
            ]));
        }
        output.push_str(&table.to_string());
        output.push_str("\n\n");

        output.push_str(&self.format_words_table(&report.words));
        output.push('\n');

        if !report.forms.is_empty() {
            output.push_str(&self.format_forms_table(&report.forms));
            output.push('\n');
        }

        if !report.rules.is_empty() {
            output.push_str("Live sandhi rules:\n");
            output.push_str(&self.format_messages("", &report.rules));
        }
        if !report.tendencies.is_empty() {
            output.push_str("Active tendencies:\n");
            output.push_str(&self.format_messages("", &report.tendencies));
        }

        output
    }

    pub fn format_alternatives(
        &self,
        first: &PhonologicalRule,
        second: &PhonologicalRule,
        alternatives: &[PhonologicalRule],
    ) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new(format!("{}  then  {}", first, second)),
        ]));

        if alternatives.is_empty() {
            table.add_row(Row::from(vec![Cell::new("-"), Cell::new("(no effect)")]));
        }
        for (i, rule) in alternatives.iter().enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(i + 1).set_alignment(CellAlignment::Right),
                Cell::new(rule),
            ]));
        }

        format!("{}\n", table)
    }

    pub fn format_rule(&self, rule: &PhonologicalRule) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new(rule.to_string()).set_alignment(CellAlignment::Left),
            Cell::new(""),
        ]));

        table.add_row(Row::from(vec![
            "Preceding".to_string(),
            self.format_matchers(rule.preceding()),
        ]));
        table.add_row(Row::from(vec![
            "Target".to_string(),
            self.format_matchers(rule.target()),
        ]));
        table.add_row(Row::from(vec![
            "Following".to_string(),
            self.format_matchers(rule.following()),
        ]));
        table.add_row(Row::from(vec![
            "Substitutions".to_string(),
            self.format_substitutions(rule.substitutions()),
        ]));
        table.add_row(Row::from(vec![
            "Structure change".to_string(),
            if rule.allow_syllable_structure_change() {
                "allowed".to_string()
            } else {
                "not allowed".to_string()
            },
        ]));
        table.add_row(Row::from(vec!["Trimmed".to_string(), rule.trim().to_string()]));
        table.add_row(Row::from(vec!["Mirror".to_string(), rule.mirror().to_string()]));

        format!("{}\n", table)
    }

    fn format_matchers(&self, matchers: &[PhonemeMatcher]) -> String {
        if matchers.is_empty() {
            return "-".to_string();
        }
        matchers
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn format_substitutions(&self, substitutions: &[PhonemeSubstitution]) -> String {
        if substitutions.is_empty() {
            return "-".to_string();
        }
        substitutions
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn format_words_table(&self, words: &[WordReport]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Word").set_alignment(CellAlignment::Left),
            Cell::new("Before").set_alignment(CellAlignment::Left),
            Cell::new("After").set_alignment(CellAlignment::Left),
            Cell::new("Syllables").set_alignment(CellAlignment::Left),
        ]));

        for word in words {
            let after = if word.after == word.before {
                word.after.clone()
            } else {
                format!("{} *", word.after)
            };
            table.add_row(Row::from(vec![
                &word.gloss,
                &word.before,
                &after,
                &word.syllables,
            ]));
        }

        table.to_string()
    }

    fn format_forms_table(&self, forms: &[FormReport]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Word").set_alignment(CellAlignment::Left),
            Cell::new("Categories").set_alignment(CellAlignment::Left),
            Cell::new("Form").set_alignment(CellAlignment::Left),
        ]));

        for form in forms {
            table.add_row(Row::from(vec![&form.gloss, &form.categories, &form.form]));
        }

        table.to_string()
    }

    fn format_messages(&self, base_prefix: &str, messages: &[String]) -> String {
        let mut output = String::new();
        for (i, message) in messages.iter().enumerate() {
            let line = if i + 1 == messages.len() {
                LineType::LastMessage
            } else {
                LineType::Message
            };
            output.push_str(&line.format_line(base_prefix, message));
        }
        output
    }
}
