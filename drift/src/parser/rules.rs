use super::matchers::{parse_matcher, parse_substitution, MatcherTerm, Placeholders, SubstitutionTerm};
use crate::ast::Span;
use crate::error::DriftError;
use crate::parser::Rule;
use crate::phoneme::{Phoneme, PhonemeInventory};
use crate::rule::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
use pest::iterators::Pair;
use std::sync::Arc;

/// Where the text being parsed came from, for error reporting
pub(crate) struct SourceContext<'a> {
    pub source_id: &'a str,
    pub source: Arc<str>,
    pub catalog: &'a PhonemeInventory,
}

impl SourceContext<'_> {
    pub fn error(&self, message: impl Into<String>, span: Span) -> DriftError {
        DriftError::parse(message, span, self.source_id, self.source.clone())
    }
}

/// A parsed rule whose placeholders are not yet bound
#[derive(Debug)]
pub(crate) struct RuleTemplate {
    preceding: Vec<MatcherTerm>,
    target: Vec<MatcherTerm>,
    following: Vec<MatcherTerm>,
    substitutions: Vec<SubstitutionTerm>,
    allow_syllable_structure_change: bool,
    placeholders: Placeholders,
}

fn parse_matchers(
    pair: Pair<Rule>,
    placeholders: &mut Placeholders,
    context: &SourceContext,
) -> Result<Vec<MatcherTerm>, DriftError> {
    pair.into_inner()
        .map(|inner| parse_matcher(inner, placeholders, context))
        .collect()
}

pub(crate) fn parse_sound_change(
    pair: Pair<Rule>,
    context: &SourceContext,
) -> Result<RuleTemplate, DriftError> {
    let span = Span::from_pest_span(pair.as_span());
    let mut template = RuleTemplate {
        preceding: Vec::new(),
        target: Vec::new(),
        following: Vec::new(),
        substitutions: Vec::new(),
        allow_syllable_structure_change: false,
        placeholders: Placeholders::default(),
    };

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::target => {
                template.target = parse_matchers(inner_pair, &mut template.placeholders, context)?
            }
            Rule::replacement => {
                for substitution in inner_pair.into_inner() {
                    template.substitutions.push(parse_substitution(
                        substitution,
                        &mut template.placeholders,
                        context,
                    )?);
                }
            }
            Rule::environment => {
                for side in inner_pair.into_inner() {
                    match side.as_rule() {
                        Rule::preceding => {
                            template.preceding =
                                parse_matchers(side, &mut template.placeholders, context)?
                        }
                        Rule::following => {
                            template.following =
                                parse_matchers(side, &mut template.placeholders, context)?
                        }
                        _ => {}
                    }
                }
            }
            Rule::structure_change => template.allow_syllable_structure_change = true,
            _ => {}
        }
    }

    let aligned = template
        .substitutions
        .iter()
        .filter(|s| !s.is_epenthesis())
        .count();
    if aligned != template.target.len() {
        return Err(context.error(
            format!(
                "{} target matchers but {} substitutions",
                template.target.len(),
                aligned
            ),
            span,
        ));
    }
    Ok(template)
}

impl RuleTemplate {
    /// One rule per combination of placeholder bindings
    pub fn expand(self, inventory: &PhonemeInventory) -> Result<Vec<PhonologicalRule>, DriftError> {
        let mut bindings: Vec<Vec<&Phoneme>> = vec![Vec::new()];
        for (_, matcher) in &self.placeholders.entries {
            let options: Vec<&Phoneme> = inventory.iter().filter(|p| matcher.accepts(p)).collect();
            bindings = bindings
                .into_iter()
                .flat_map(|binding| {
                    options.iter().map(move |phoneme| {
                        let mut next = binding.clone();
                        next.push(*phoneme);
                        next
                    })
                })
                .collect();
        }
        bindings
            .iter()
            .map(|binding| self.instantiate(binding))
            .collect()
    }

    fn instantiate(&self, binding: &[&Phoneme]) -> Result<PhonologicalRule, DriftError> {
        let matchers = |terms: &[MatcherTerm]| -> Vec<PhonemeMatcher> {
            terms
                .iter()
                .map(|term| match term {
                    MatcherTerm::Matcher(m) => m.clone(),
                    MatcherTerm::Placeholder(i) => PhonemeMatcher::Exact(binding[*i].clone()),
                })
                .collect()
        };
        let substitutions = self
            .substitutions
            .iter()
            .map(|term| match term {
                SubstitutionTerm::Substitution(s) => s.clone(),
                SubstitutionTerm::Placeholder(i) => PhonemeSubstitution::Exact(binding[*i].clone()),
                SubstitutionTerm::EpenthesisPlaceholder(i) => {
                    PhonemeSubstitution::Epenthesis(binding[*i].clone())
                }
            })
            .collect();
        PhonologicalRule::new(
            matchers(&self.preceding),
            matchers(&self.target),
            matchers(&self.following),
            substitutions,
            self.allow_syllable_structure_change,
        )
    }
}
