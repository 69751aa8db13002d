use super::rules::SourceContext;
use crate::ast::Span;
use crate::error::DriftError;
use crate::parser::Rule;
use crate::phoneme::{Feature, FeatureChange, Phoneme, PhonemeType, Prosody};
use crate::rule::{PhonemeMatcher, PhonemeSubstitution};
use pest::iterators::Pair;

/// A matcher position, possibly still bound to a placeholder
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MatcherTerm {
    Matcher(PhonemeMatcher),
    Placeholder(usize),
}

/// A substitution position, possibly still bound to a placeholder
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SubstitutionTerm {
    Substitution(PhonemeSubstitution),
    Placeholder(usize),
    EpenthesisPlaceholder(usize),
}

impl SubstitutionTerm {
    pub fn is_epenthesis(&self) -> bool {
        match self {
            SubstitutionTerm::Substitution(s) => s.is_epenthesis(),
            SubstitutionTerm::EpenthesisPlaceholder(_) => true,
            SubstitutionTerm::Placeholder(_) => false,
        }
    }
}

/// Placeholders of one rule, keyed by their text
#[derive(Debug, Default)]
pub(crate) struct Placeholders {
    pub entries: Vec<(String, PhonemeMatcher)>,
}

impl Placeholders {
    fn bind(&mut self, pair: Pair<Rule>, context: &SourceContext) -> Result<usize, DriftError> {
        let key: String = pair.as_str().split_whitespace().collect();
        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            return Ok(index);
        }
        let span = pair.as_span();
        let matcher = conjunction(pair.into_inner(), span, context)?;
        self.entries.push((key, matcher));
        Ok(self.entries.len() - 1)
    }
}

fn symbol_phoneme(pair: Pair<Rule>, context: &SourceContext) -> Result<Phoneme, DriftError> {
    let text = pair.as_str();
    let symbol = text.trim_start_matches('|').trim_end_matches('|');
    context.catalog.get(symbol).cloned().ok_or_else(|| {
        context.error(
            format!("Unknown phoneme '{}'", symbol),
            Span::from_pest_span(pair.as_span()),
        )
    })
}

fn signed_names(pair: Pair<Rule>) -> Vec<(bool, Pair<Rule>)> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::signed_name)
        .filter_map(|signed| {
            let mut parts = signed.into_inner();
            let sign = parts.next()?;
            let name = parts.next()?;
            Some((sign.as_str() == "+", name))
        })
        .collect()
}

fn feature_changes(pair: Pair<Rule>, context: &SourceContext) -> Result<Vec<FeatureChange>, DriftError> {
    signed_names(pair)
        .into_iter()
        .map(|(present, name)| {
            let feature: Feature = name.as_str().parse().map_err(|message: String| {
                context.error(message, Span::from_pest_span(name.as_span()))
            })?;
            Ok(FeatureChange { feature, present })
        })
        .collect()
}

fn prosody_matchers(pair: Pair<Rule>, context: &SourceContext) -> Result<Vec<PhonemeMatcher>, DriftError> {
    signed_names(pair)
        .into_iter()
        .map(|(present, name)| {
            let mark: Prosody = name.as_str().parse().map_err(|message: String| {
                context.error(message, Span::from_pest_span(name.as_span()))
            })?;
            Ok(if present {
                PhonemeMatcher::Prosody(mark)
            } else {
                PhonemeMatcher::AbsentProsody(mark)
            })
        })
        .collect()
}

fn conjunction<'i>(
    members: impl Iterator<Item = Pair<'i, Rule>>,
    span: pest::Span<'i>,
    context: &SourceContext,
) -> Result<PhonemeMatcher, DriftError> {
    let mut result = PhonemeMatcher::Pass;
    for member in members {
        let part = match member.as_rule() {
            Rule::prosody_bundle => PhonemeMatcher::from_atoms(prosody_matchers(member, context)?),
            _ => concrete_matcher(member, context)?,
        };
        result = result.unite(&part).ok_or_else(|| {
            context.error(
                format!("'{}' can never match", span.as_str()),
                Span::from_pest_span(span),
            )
        })?;
    }
    Ok(result)
}

/// A matcher that cannot contain placeholders
fn concrete_matcher(pair: Pair<Rule>, context: &SourceContext) -> Result<PhonemeMatcher, DriftError> {
    match pair.as_rule() {
        Rule::group => {
            let span = pair.as_span();
            conjunction(pair.into_inner(), span, context)
        }
        Rule::feature_bundle => {
            let span = pair.as_span();
            feature_changes(pair, context)?
                .into_iter()
                .map(|c| {
                    if c.present {
                        PhonemeMatcher::Feature(c.feature)
                    } else {
                        PhonemeMatcher::AbsentFeature(c.feature)
                    }
                })
                .try_fold(PhonemeMatcher::Pass, |acc, atom| acc.unite(&atom))
                .ok_or_else(|| {
                    context.error(
                        format!("'{}' can never match", span.as_str()),
                        Span::from_pest_span(span),
                    )
                })
        }
        Rule::type_class => Ok(PhonemeMatcher::Type(if pair.as_str() == "V" {
            PhonemeType::Vowel
        } else {
            PhonemeType::Consonant
        })),
        Rule::boundary => Ok(PhonemeMatcher::Boundary),
        Rule::pass => Ok(PhonemeMatcher::Pass),
        Rule::symbol => Ok(PhonemeMatcher::Exact(symbol_phoneme(pair, context)?)),
        other => Err(DriftError::Engine(format!(
            "Grammar error: unexpected {:?} in matcher",
            other
        ))),
    }
}

pub(crate) fn parse_matcher(
    pair: Pair<Rule>,
    placeholders: &mut Placeholders,
    context: &SourceContext,
) -> Result<MatcherTerm, DriftError> {
    match pair.as_rule() {
        Rule::placeholder => Ok(MatcherTerm::Placeholder(placeholders.bind(pair, context)?)),
        _ => Ok(MatcherTerm::Matcher(concrete_matcher(pair, context)?)),
    }
}

pub(crate) fn parse_substitution(
    pair: Pair<Rule>,
    placeholders: &mut Placeholders,
    context: &SourceContext,
) -> Result<SubstitutionTerm, DriftError> {
    let substitution = match pair.as_rule() {
        Rule::deletion => PhonemeSubstitution::Delete,
        Rule::pass => PhonemeSubstitution::Pass,
        Rule::modification => PhonemeSubstitution::Modify(feature_changes(pair, context)?),
        Rule::symbol => PhonemeSubstitution::Exact(symbol_phoneme(pair, context)?),
        Rule::placeholder => {
            return Ok(SubstitutionTerm::Placeholder(placeholders.bind(pair, context)?))
        }
        Rule::epenthesis => {
            let span = Span::from_pest_span(pair.as_span());
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| context.error("Empty epenthesis", span))?;
            if inner.as_rule() == Rule::placeholder {
                return Ok(SubstitutionTerm::EpenthesisPlaceholder(
                    placeholders.bind(inner, context)?,
                ));
            }
            PhonemeSubstitution::Epenthesis(symbol_phoneme(inner, context)?)
        }
        other => {
            return Err(DriftError::Engine(format!(
                "Grammar error: unexpected {:?} in substitution",
                other
            )))
        }
    };
    Ok(SubstitutionTerm::Substitution(substitution))
}
