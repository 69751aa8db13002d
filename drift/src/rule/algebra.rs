//! Sequential composition of rules
//!
//! `combine_windows` slides the second rule over the output of one firing of
//! the first rule. The output is described cell by cell: a cell is either a
//! column of the first rule (whose content is that column's matcher seen
//! through its substitution) or a phoneme the first rule inserted. Columns of
//! padding on both sides let the second rule reach outside the first window.
//!
//! Every offset of the second rule that overlaps a changed cell either cannot
//! fire, always fires, or fires only on a narrower input. The last case splits
//! the candidate in two, narrowed alternative first.
//!
//! A feature change reaches its target only when the catalog has the
//! modified phoneme. Phonemes for which it does not are split off into
//! alternatives of their own, reasoned about phoneme by phoneme.

use super::substitution::{merge_changes, rewrite_inserted};
use super::window::{Column, Window};
use super::{PhonemeMatcher, PhonemeSubstitution, PhonologicalRule};
use crate::phoneme::{ChangingPhoneme, Feature, FeatureChange, Phoneme, PhonemeInventory};
use tracing::trace;

/// One composed window and how it came about
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CombinedWindow {
    pub window: Window,
    /// Padding columns kept left of the first rule's window
    pub offset: usize,
    /// Whether the second rule fired at least once
    pub fired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    Column(usize),
    Inserted(Phoneme),
}

#[derive(Debug, Clone)]
struct Candidate {
    matchers: Vec<PhonemeMatcher>,
    touched: Vec<bool>,
    writes: Vec<Option<PhonemeSubstitution>>,
    inserts: Vec<Vec<Phoneme>>,
    fired: bool,
}

enum Firing {
    Impossible,
    Always(Candidate),
    Narrowing(Candidate),
}

struct Layout<'a> {
    first: &'a Window,
    catalog: &'a PhonemeInventory,
    second: Window,
    pad: usize,
    cells: Vec<Cell>,
    substitutions: Vec<PhonemeSubstitution>,
}

impl<'a> Layout<'a> {
    fn new(first: &'a Window, second: Window, catalog: &'a PhonemeInventory) -> Self {
        let pad = second.columns.len().saturating_sub(1);
        let mut cells = Vec::new();
        let mut substitutions = Vec::new();

        for _ in 0..pad {
            cells.push(Cell::Column(substitutions.len()));
            substitutions.push(PhonemeSubstitution::Pass);
        }
        for column in &first.columns {
            cells.extend(column.before.iter().cloned().map(Cell::Inserted));
            cells.push(Cell::Column(substitutions.len()));
            substitutions.push(column.substitution.clone());
        }
        cells.extend(first.tail.iter().cloned().map(Cell::Inserted));
        for _ in 0..pad {
            cells.push(Cell::Column(substitutions.len()));
            substitutions.push(PhonemeSubstitution::Pass);
        }

        Self {
            first,
            catalog,
            second,
            pad,
            cells,
            substitutions,
        }
    }

    fn is_padding(&self, column: usize) -> bool {
        column < self.pad || column >= self.pad + self.first.columns.len()
    }

    fn interacts(&self, cell: &Cell) -> bool {
        match cell {
            Cell::Inserted(_) => true,
            Cell::Column(c) => self.substitutions[*c].is_change(),
        }
    }

    fn initial(&self) -> Candidate {
        let mut matchers = vec![PhonemeMatcher::Pass; self.substitutions.len()];
        for (j, column) in self.first.columns.iter().enumerate() {
            matchers[self.pad + j] = column.matcher.clone();
        }
        Candidate {
            matchers,
            touched: vec![false; self.substitutions.len()],
            writes: vec![None; self.cells.len()],
            inserts: vec![Vec::new(); self.cells.len() + 1],
            fired: false,
        }
    }

    fn fire(&self, candidate: &Candidate, offset: usize) -> Firing {
        let mut matchers = candidate.matchers.clone();
        let mut narrowing = false;

        for (k, column) in self.second.columns.iter().enumerate() {
            match &self.cells[offset + k] {
                Cell::Inserted(phoneme) => {
                    if !column.matcher.matches(&ChangingPhoneme::exact(phoneme.clone())) {
                        return Firing::Impossible;
                    }
                }
                Cell::Column(c) => {
                    let lifted = match (&self.substitutions[*c], pinned(&matchers[*c])) {
                        (PhonemeSubstitution::Modify(changes), Some(phoneme)) => lift(
                            &column.matcher,
                            &PhonemeSubstitution::Exact(modified(self.catalog, &phoneme, changes)),
                        ),
                        (substitution, _) => lift(&column.matcher, substitution),
                    };
                    let Some(lifted) = lifted else {
                        return Firing::Impossible;
                    };
                    let Some(united) = matchers[*c].unite(&lifted) else {
                        return Firing::Impossible;
                    };
                    if !matchers[*c].implies(&lifted)
                        || (self.is_padding(*c) && !candidate.touched[*c])
                    {
                        narrowing = true;
                    }
                    matchers[*c] = united;
                }
            }
        }

        let mut fired = candidate.clone();
        fired.matchers = matchers;
        fired.fired = true;
        for (k, column) in self.second.columns.iter().enumerate() {
            let cell = offset + k;
            if let Cell::Column(c) = &self.cells[cell] {
                fired.touched[*c] = true;
            }
            fired.inserts[cell].extend(column.before.iter().cloned());
            if column.substitution.is_change() && fired.writes[cell].is_none() {
                fired.writes[cell] = Some(column.substitution.clone());
            }
        }
        let end = offset + self.second.columns.len();
        fired.inserts[end].extend(self.second.tail.iter().cloned());

        if narrowing {
            Firing::Narrowing(fired)
        } else {
            Firing::Always(fired)
        }
    }

    /// Split off a candidate for every phoneme on which a feature change of
    /// the first rule misleads the feature-level lift at `offset`.
    ///
    /// The split-off candidates come first and pin their column to the phoneme.
    fn split_gaps(&self, candidate: Candidate, offset: usize) -> Vec<Candidate> {
        let mut split = vec![candidate];
        for (k, column) in self.second.columns.iter().enumerate() {
            let cell = offset + k;
            let Cell::Column(c) = &self.cells[cell] else {
                continue;
            };
            let PhonemeSubstitution::Modify(changes) = &self.substitutions[*c] else {
                continue;
            };
            let mut next = Vec::with_capacity(split.len());
            for candidate in split {
                if pinned(&candidate.matchers[*c]).is_none() {
                    let later = match (&candidate.writes[cell], &column.substitution) {
                        (None, PhonemeSubstitution::Modify(later)) => Some(later.as_slice()),
                        _ => None,
                    };
                    for gap in self.gaps(&candidate.matchers[*c], &column.matcher, changes, later) {
                        if let Some(united) =
                            candidate.matchers[*c].unite(&PhonemeMatcher::Exact(gap))
                        {
                            let mut narrowed = candidate.clone();
                            narrowed.matchers[*c] = united;
                            next.push(narrowed);
                        }
                    }
                }
                next.push(candidate);
            }
            split = next;
        }
        split
    }

    /// Phonemes accepted by `input` on which lifting `matcher` through
    /// `changes` disagrees with applying the changes, or on which merging
    /// `changes` with `later` differs from applying both in turn
    fn gaps(
        &self,
        input: &PhonemeMatcher,
        matcher: &PhonemeMatcher,
        changes: &[FeatureChange],
        later: Option<&[FeatureChange]>,
    ) -> Vec<Phoneme> {
        let lifted = lift_through_modify(matcher, changes);
        self.catalog
            .iter()
            .filter(|p| input.accepts(p))
            .filter(|p| {
                let out = modified(self.catalog, p, changes);
                let fires = matcher.accepts(&out);
                if fires != lifted.as_ref().is_some_and(|l| l.accepts(p)) {
                    return true;
                }
                match later {
                    Some(later) if fires => {
                        modified(self.catalog, &out, later)
                            != modified(self.catalog, p, &merge_changes(changes, later))
                    }
                    _ => false,
                }
            })
            .cloned()
            .collect()
    }

    /// Substitution of column `c` after the second rule's write at `cell`
    fn composed_substitution(
        &self,
        candidate: &Candidate,
        c: usize,
        cell: usize,
    ) -> PhonemeSubstitution {
        let first = &self.substitutions[c];
        let later = candidate.writes[cell].as_ref();
        if let (
            PhonemeSubstitution::Modify(_),
            Some(second @ PhonemeSubstitution::Modify(_)),
            Some(phoneme),
        ) = (first, later, pinned(&candidate.matchers[c]))
        {
            let once = first.apply(&ChangingPhoneme::exact(phoneme), self.catalog);
            if let ChangingPhoneme::Exact { phoneme, .. } = second.apply(&once, self.catalog) {
                return PhonemeSubstitution::Exact(phoneme);
            }
        }
        first.then(later, self.catalog)
    }

    fn finish(&self, candidate: Candidate) -> CombinedWindow {
        let kept = |c: usize| !self.is_padding(c) || candidate.touched[c];
        let mut columns = Vec::new();
        let mut pending: Vec<Phoneme> = Vec::new();
        let mut offset = 0;

        for (i, cell) in self.cells.iter().enumerate() {
            pending.extend(candidate.inserts[i].iter().cloned());
            match cell {
                Cell::Inserted(phoneme) => {
                    if let Some(rewritten) =
                        rewrite_inserted(phoneme, candidate.writes[i].as_ref(), self.catalog)
                    {
                        pending.push(rewritten);
                    }
                }
                Cell::Column(c) if kept(*c) => {
                    if *c < self.pad {
                        offset += 1;
                    }
                    columns.push(Column {
                        matcher: candidate.matchers[*c].clone(),
                        before: std::mem::take(&mut pending),
                        substitution: self.composed_substitution(&candidate, *c, i),
                    });
                }
                Cell::Column(_) => {}
            }
        }
        pending.extend(candidate.inserts[self.cells.len()].iter().cloned());

        CombinedWindow {
            window: Window {
                columns,
                tail: pending,
                allow_syllable_structure_change: self.first.allow_syllable_structure_change
                    || self.second.allow_syllable_structure_change,
            },
            offset,
            fired: candidate.fired,
        }
    }
}

/// Compose `second` after one firing of `first`.
///
/// `None` when the number of alternatives exceeds `max_alternatives`.
pub(crate) fn combine_windows(
    first: &Window,
    second: &PhonologicalRule,
    catalog: &PhonemeInventory,
    max_alternatives: usize,
) -> Option<Vec<CombinedWindow>> {
    let second = Window::from_rule(second);
    let width = second.columns.len();
    let layout = Layout::new(first, second, catalog);

    let mut worklist = vec![layout.initial()];
    if width > 0 && layout.cells.len() >= width {
        for offset in 0..=layout.cells.len() - width {
            if !layout.cells[offset..offset + width]
                .iter()
                .any(|cell| layout.interacts(cell))
            {
                continue;
            }
            let mut next = Vec::with_capacity(worklist.len());
            for candidate in worklist {
                let firings: Vec<(Candidate, Firing)> = layout
                    .split_gaps(candidate, offset)
                    .into_iter()
                    .map(|c| {
                        let firing = layout.fire(&c, offset);
                        (c, firing)
                    })
                    .collect();
                // pinned candidates that fire no more than the general one are redundant
                let general_idle = matches!(firings.last(), Some((_, Firing::Impossible)));
                let pinned_count = firings.len().saturating_sub(1);
                for (i, (candidate, firing)) in firings.into_iter().enumerate() {
                    match firing {
                        Firing::Impossible if general_idle && i < pinned_count => {}
                        Firing::Impossible => next.push(candidate),
                        Firing::Always(fired) => next.push(fired),
                        Firing::Narrowing(fired) => {
                            next.push(fired);
                            next.push(candidate);
                        }
                    }
                }
            }
            if next.len() > max_alternatives {
                trace!(
                    offset,
                    alternatives = next.len(),
                    "composition exceeded alternative limit"
                );
                return None;
            }
            worklist = next;
        }
    }

    let mut combined: Vec<CombinedWindow> = Vec::with_capacity(worklist.len());
    for candidate in worklist {
        let window = layout.finish(candidate);
        if !combined.iter().any(|c| c.window == window.window) {
            combined.push(window);
        }
    }
    trace!(alternatives = combined.len(), "composed rule windows");
    Some(combined)
}

/// Constraint on a slot's input that makes its output satisfy `matcher`.
///
/// `None` when no input can.
pub(crate) fn lift(
    matcher: &PhonemeMatcher,
    substitution: &PhonemeSubstitution,
) -> Option<PhonemeMatcher> {
    match substitution {
        PhonemeSubstitution::Pass | PhonemeSubstitution::Epenthesis(_) => Some(matcher.clone()),
        PhonemeSubstitution::Delete => matcher
            .matches(&ChangingPhoneme::Deleted)
            .then_some(PhonemeMatcher::Pass),
        PhonemeSubstitution::Exact(produced) => lift_through_exact(matcher, produced),
        PhonemeSubstitution::Modify(changes) => lift_through_modify(matcher, changes),
    }
}

/// Output of `changes` on `phoneme`, which stays as it is without a counterpart
fn modified(catalog: &PhonemeInventory, phoneme: &Phoneme, changes: &[FeatureChange]) -> Phoneme {
    catalog
        .modify(phoneme, changes)
        .cloned()
        .unwrap_or_else(|| phoneme.clone())
}

fn pinned(matcher: &PhonemeMatcher) -> Option<Phoneme> {
    matcher.atoms().into_iter().find_map(|atom| match atom {
        PhonemeMatcher::Exact(phoneme) => Some(phoneme),
        _ => None,
    })
}

fn conjunction<'m>(
    parts: impl Iterator<Item = &'m PhonemeMatcher>,
    lift_part: impl Fn(&PhonemeMatcher) -> Option<PhonemeMatcher>,
) -> Option<PhonemeMatcher> {
    let mut result = PhonemeMatcher::Pass;
    for part in parts {
        result = result.unite(&lift_part(part)?)?;
    }
    Some(result)
}

fn lift_through_exact(matcher: &PhonemeMatcher, produced: &Phoneme) -> Option<PhonemeMatcher> {
    match matcher {
        PhonemeMatcher::Pass => Some(PhonemeMatcher::Pass),
        PhonemeMatcher::Boundary => None,
        PhonemeMatcher::Prosody(_) | PhonemeMatcher::AbsentProsody(_) => Some(matcher.clone()),
        PhonemeMatcher::All(parts) => {
            conjunction(parts.iter(), |part| lift_through_exact(part, produced))
        }
        PhonemeMatcher::Exact(_)
        | PhonemeMatcher::Type(_)
        | PhonemeMatcher::Feature(_)
        | PhonemeMatcher::AbsentFeature(_) => {
            matcher.accepts(produced).then_some(PhonemeMatcher::Pass)
        }
    }
}

fn effective_change(changes: &[FeatureChange], feature: Feature) -> Option<bool> {
    changes
        .iter()
        .rev()
        .find(|c| c.feature == feature)
        .map(|c| c.present)
}

fn lift_through_modify(
    matcher: &PhonemeMatcher,
    changes: &[FeatureChange],
) -> Option<PhonemeMatcher> {
    match matcher {
        PhonemeMatcher::Pass => Some(PhonemeMatcher::Pass),
        PhonemeMatcher::Boundary => None,
        PhonemeMatcher::Prosody(_)
        | PhonemeMatcher::AbsentProsody(_)
        | PhonemeMatcher::Type(_) => Some(matcher.clone()),
        PhonemeMatcher::Feature(feature) => match effective_change(changes, *feature) {
            Some(present) => present.then_some(PhonemeMatcher::Pass),
            None => Some(matcher.clone()),
        },
        PhonemeMatcher::AbsentFeature(feature) => match effective_change(changes, *feature) {
            Some(present) => (!present).then_some(PhonemeMatcher::Pass),
            None => Some(matcher.clone()),
        },
        PhonemeMatcher::Exact(wanted) => {
            let consistent = changes
                .iter()
                .all(|c| effective_change(changes, c.feature) == Some(wanted.has(c.feature)));
            if !consistent {
                return None;
            }
            let mut atoms = vec![PhonemeMatcher::Type(wanted.kind)];
            for feature in Feature::ALL {
                if effective_change(changes, feature).is_some() {
                    continue;
                }
                atoms.push(if wanted.has(feature) {
                    PhonemeMatcher::Feature(feature)
                } else {
                    PhonemeMatcher::AbsentFeature(feature)
                });
            }
            Some(PhonemeMatcher::from_atoms(atoms))
        }
        PhonemeMatcher::All(parts) => {
            conjunction(parts.iter(), |part| lift_through_modify(part, changes))
        }
    }
}
