//! Applying a rule to a single word and rebuilding word structure

use super::sequence::{self, Rewrite};
use super::ApplicationContext;
use crate::language::affix::Position;
use crate::language::syllable::{reanalyze_syllable_structure, Syllable, SyllableTemplate};
use crate::language::word::{Morpheme, Word};
use crate::language::StressType;
use crate::phoneme::{ChangingPhoneme, Phoneme, Prosody};
use crate::rule::PhonologicalRule;
use std::collections::BTreeSet;
use tracing::trace;

/// Result of applying a rule to one word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordChange {
    Changed(Word),
    Unchanged,
    /// The rule would break the word; the reason is kept for the message log
    Reverted(String),
}

impl WordChange {
    /// The word after the change, or `original` when nothing was applied
    pub fn into_word(self, original: &Word) -> Word {
        match self {
            WordChange::Changed(word) => word,
            WordChange::Unchanged | WordChange::Reverted(_) => original.clone(),
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, WordChange::Changed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Leading,
    Morpheme(usize),
    Trailing,
}

/// Phonemes of a rewritten word with their prosody and morpheme lengths
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rebuilt {
    pub phonemes: Vec<Phoneme>,
    pub prosody: Vec<BTreeSet<Prosody>>,
    pub morphemes: Vec<Morpheme>,
}

impl Rebuilt {
    /// Collect surviving and inserted phonemes of a rewrite of `word.to_changing()`.
    ///
    /// Insertions outside the word boundaries are dropped. An inserted phoneme
    /// joins the morpheme of the phoneme before it, except at `new_edge`, where
    /// insertions form a new affix morpheme.
    pub fn from_rewrite(word: &Word, rewrite: &Rewrite, new_edge: Option<Position>) -> Self {
        let owners = word.morpheme_indices();
        let n = word.phonemes.len();
        let mut items: Vec<(Phoneme, BTreeSet<Prosody>, Owner)> = Vec::new();

        for k in 1..=n + 1 {
            let owner = match new_edge {
                Some(Position::Beginning) if k == 1 => Owner::Leading,
                Some(Position::End) if k == n + 1 => Owner::Trailing,
                _ => owners
                    .get(k.saturating_sub(2))
                    .copied()
                    .map_or(Owner::Leading, Owner::Morpheme),
            };
            if let Some(inserted) = rewrite.insertions.get(k) {
                items.extend(
                    inserted
                        .iter()
                        .cloned()
                        .map(|p| (p, BTreeSet::new(), owner)),
                );
            }
            if k <= n {
                if let Some(ChangingPhoneme::Exact { phoneme, prosody }) = rewrite.slots.get(k) {
                    items.push((phoneme.clone(), prosody.clone(), Owner::Morpheme(owners[k - 1])));
                }
            }
        }

        let count = |owner: Owner| items.iter().filter(|(_, _, o)| *o == owner).count();
        let mut morphemes = Vec::with_capacity(word.morphemes.len() + 1);
        let leading = count(Owner::Leading);
        if leading > 0 {
            morphemes.push(Morpheme::affix(leading));
        }
        for (i, old) in word.morphemes.iter().enumerate() {
            let len = count(Owner::Morpheme(i));
            if len > 0 {
                morphemes.push(Morpheme {
                    len,
                    kind: old.kind,
                });
            }
        }
        let trailing = count(Owner::Trailing);
        if trailing > 0 {
            morphemes.push(Morpheme::affix(trailing));
        }

        let (phonemes, prosody): (Vec<_>, Vec<_>) =
            items.into_iter().map(|(p, pr, _)| (p, pr)).unzip();
        Self {
            phonemes,
            prosody,
            morphemes,
        }
    }

    /// Syllables under `template`, each carrying the prosody of its nucleus
    pub fn syllabify(&self, template: SyllableTemplate) -> Option<Vec<Syllable>> {
        let mut syllables = template.segment(&self.phonemes)?;
        for syllable in &mut syllables {
            if let Some(nucleus) = syllable.nucleus(&self.phonemes) {
                syllable.prosody = self.prosody[nucleus].clone();
            }
        }
        Some(syllables)
    }

    /// Syllabify with `template`, growing it when the sequence does not fit
    pub fn syllabify_or_reanalyze(
        &self,
        template: SyllableTemplate,
        max_extra_slots: usize,
    ) -> Option<(Vec<Syllable>, SyllableTemplate)> {
        if let Some(syllables) = self.syllabify(template) {
            return Some((syllables, template));
        }
        let grown = reanalyze_syllable_structure(&self.phonemes, template, max_extra_slots)?;
        self.syllabify(grown).map(|s| (s, grown))
    }

    /// A copy of `like` with this structure
    pub fn into_word(
        self,
        like: &Word,
        syllables: Vec<Syllable>,
        template: SyllableTemplate,
        stress: StressType,
    ) -> Word {
        let mut word = Word {
            phonemes: self.phonemes,
            syllables,
            morphemes: self.morphemes,
            template,
            speech_part: like.speech_part,
            gloss: like.gloss.clone(),
            tags: like.tags.clone(),
        };
        stress.place(&mut word.syllables);
        word
    }
}

/// Apply `rule` to one word.
///
/// Never fails: a change that would break the word comes back as
/// [`WordChange::Reverted`] with the reason.
pub fn apply_to_word(word: &Word, rule: &PhonologicalRule, ctx: &ApplicationContext) -> WordChange {
    let input = word.to_changing();
    let rewrite = sequence::rewrite(&input, rule, ctx.catalog);
    finish_word_change(word, rule, ctx, &input, rewrite)
}

/// Apply `rule` only at windows that lie entirely outside affix material.
///
/// Affixes already carry a live sandhi rule baked in.
pub fn apply_to_word_stems(
    word: &Word,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
) -> WordChange {
    let input = word.to_changing();
    let affix = word.affix_slots();
    let width = rule.width();
    let rewrite = sequence::rewrite_filtered(&input, rule, ctx.catalog, |index| {
        affix
            .get(index..index + width)
            .is_some_and(|window| !window.contains(&true))
    });
    finish_word_change(word, rule, ctx, &input, rewrite)
}

fn finish_word_change(
    word: &Word,
    rule: &PhonologicalRule,
    ctx: &ApplicationContext,
    input: &[ChangingPhoneme],
    rewrite: Rewrite,
) -> WordChange {
    if rewrite.is_identity(input) {
        return WordChange::Unchanged;
    }

    let rebuilt = Rebuilt::from_rewrite(word, &rewrite, None);
    if rebuilt.phonemes == word.phonemes {
        return WordChange::Unchanged;
    }
    let revert = |reason: String| {
        trace!(word = %word, rule = %rule, %reason, "reverted word change");
        WordChange::Reverted(reason)
    };
    if rebuilt.phonemes.is_empty() {
        return revert(format!("'{}' would lose every phoneme", word));
    }

    let new_text: String = rebuilt.phonemes.iter().map(|p| p.symbol.as_str()).collect();
    let structured = if rule.allow_syllable_structure_change() {
        rebuilt.syllabify_or_reanalyze(word.template, ctx.settings.max_extra_slots)
    } else {
        rebuilt
            .syllabify(word.template)
            .filter(|s| s.len() == word.syllables.len())
            .map(|s| (s, word.template))
    };
    let Some((syllables, template)) = structured else {
        return revert(format!(
            "'{}' -> '{}' does not fit syllable structure {}",
            word, new_text, word.template
        ));
    };

    let changed = rebuilt.into_word(word, syllables, template, ctx.stress);
    if ctx.stress == StressType::Lexical
        && changed.stressed_syllables() != word.stressed_syllables()
    {
        return revert(format!("'{}' -> '{}' loses its stress", word, new_text));
    }
    WordChange::Changed(changed)
}
