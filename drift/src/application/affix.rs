//! Folding a rule into affix templates
//!
//! An affix plus the stem it attaches to is one phoneme stream, so a rule can
//! change the affix, the stem edge, or both. The affix is rewritten so that
//! attaching the new affix gives the same result as attaching the old one and
//! then applying the rule.

use super::sequence::apply_to_sequence;
use super::ApplicationContext;
use crate::language::affix::{Affix, Position, SingleChange, TemplateChange};
use crate::phoneme::{surviving, to_changing, ChangingPhoneme, Phoneme};
use crate::rule::algebra::combine_windows;
use crate::rule::PhonologicalRule;
use tracing::trace;

/// The affix with `rule` folded in
pub fn apply_to_affix(affix: &Affix, rule: &PhonologicalRule, ctx: &ApplicationContext) -> Affix {
    let oriented_rule = match affix.position() {
        Position::Beginning => rule.clone(),
        Position::End => rule.mirror(),
    };
    let alternatives: Vec<SingleChange> = affix
        .oriented_change()
        .alternatives()
        .iter()
        .flat_map(|alternative| rewrite_alternative(alternative, &oriented_rule, ctx))
        .collect();

    let rewritten = TemplateChange::from_alternatives(alternatives);
    affix.with_change(match affix.position() {
        Position::Beginning => rewritten,
        Position::End => rewritten.mirror(),
    })
}

/// Alternatives replacing one prefix-oriented alternative, most specific first
fn rewrite_alternative(
    alternative: &SingleChange,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
) -> Vec<SingleChange> {
    match combine_windows(
        &alternative.to_window(),
        rule,
        ctx.catalog,
        ctx.settings.max_alternatives,
    ) {
        Some(combined) => combined
            .into_iter()
            .filter(|c| c.offset == 0)
            .filter_map(|c| SingleChange::from_window(c.window))
            .collect(),
        None => {
            trace!(affix = %alternative, rule = %rule, "rewriting affix literal only");
            vec![rewrite_literal(alternative, rule, ctx)]
        }
    }
}

fn rewrite_literal(
    alternative: &SingleChange,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
) -> SingleChange {
    let mut slots = vec![ChangingPhoneme::Boundary];
    slots.extend(to_changing(alternative.affix(), false));
    let rewritten = apply_to_sequence(&slots, rule, ctx.catalog);
    alternative.with_affix(surviving(&rewritten))
}

/// Rewrite a compound infix as a free-standing sequence
pub fn apply_to_infix(
    infix: &[Phoneme],
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
) -> Vec<Phoneme> {
    surviving(&apply_to_sequence(&to_changing(infix, false), rule, ctx.catalog))
}
