use crate::ast::Span;
use crate::error::DriftError;
use crate::phoneme::PhonemeInventory;
use crate::rule::PhonologicalRule;
use pest::Parser;
use pest_derive::Parser;
use std::sync::Arc;

pub mod matchers;
pub mod rules;

#[derive(Parser)]
#[grammar = "src/parser/rule.pest"]
pub struct RuleParser;

/// Source id used when rule text does not come from a file
pub const INLINE_SOURCE: &str = "<rule>";

/// Parse one line of rule text.
///
/// Placeholders are expanded against `inventory`, so one line may produce
/// several rules, or none when no phoneme fits a placeholder.
pub fn parse_rules(
    text: &str,
    catalog: &PhonemeInventory,
    inventory: &PhonemeInventory,
) -> Result<Vec<PhonologicalRule>, DriftError> {
    parse_rules_from_source(text, INLINE_SOURCE, catalog, inventory)
}

pub fn parse_rules_from_source(
    text: &str,
    source_id: &str,
    catalog: &PhonemeInventory,
    inventory: &PhonemeInventory,
) -> Result<Vec<PhonologicalRule>, DriftError> {
    let source: Arc<str> = Arc::from(text);
    let context = rules::SourceContext {
        source_id,
        source: source.clone(),
        catalog,
    };

    match RuleParser::parse(Rule::sound_change, text) {
        Ok(mut pairs) => {
            let pair = pairs.next().ok_or_else(|| {
                DriftError::Engine("Grammar error: empty parse for sound_change".to_string())
            })?;
            let template = rules::parse_sound_change(pair, &context)?;
            template.expand(inventory)
        }
        Err(e) => {
            let (line, col) = match e.line_col {
                pest::error::LineColLocation::Pos(pos) => pos,
                pest::error::LineColLocation::Span(start, _) => start,
            };
            let start = match e.location {
                pest::error::InputLocation::Pos(pos) => pos,
                pest::error::InputLocation::Span((start, _)) => start,
            };
            Err(DriftError::parse_with_suggestion(
                e.variant.message().to_string(),
                Span {
                    start,
                    end: (start + 1).min(text.len()),
                    line,
                    col,
                },
                source_id,
                source,
                "rules look like `TARGET -> SUBSTITUTION / PRECEDING _ FOLLOWING`",
            ))
        }
    }
}

/// Parse rule text that must produce exactly one rule; placeholders expand
/// against the whole catalog
pub fn parse_rule(text: &str, catalog: &PhonemeInventory) -> Result<PhonologicalRule, DriftError> {
    let mut rules = parse_rules(text, catalog, catalog)?;
    if rules.len() != 1 {
        return Err(DriftError::invalid_rule(format!(
            "'{}' describes {} rules, expected exactly one",
            text,
            rules.len()
        )));
    }
    Ok(rules.remove(0))
}
