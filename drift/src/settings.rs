/// Tunables for rule application and rule selection
///
/// The defaults keep composition and syllable re-analysis bounded while
/// leaving room for every realistic rule and word.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSettings {
    /// Maximum onset plus coda growth tried when re-analysing syllables
    pub max_extra_slots: usize,

    /// Maximum number of alternatives a rule composition may produce
    /// Real usage: 1-4, Limit: 64
    pub max_alternatives: usize,

    /// Chance that the uniform driver narrows a picked rule to one phoneme
    pub narrowing_chance: f64,

    /// Chance per step that an inactive tendency becomes active
    pub development_chance: f64,

    /// Multiplier on a tendency's retention chance
    pub stickiness: f64,
}

impl Default for ChangeSettings {
    fn default() -> Self {
        Self {
            max_extra_slots: 15,
            max_alternatives: crate::rule::DEFAULT_MAX_ALTERNATIVES,
            narrowing_chance: 0.5,
            development_chance: 0.3,
            stickiness: 0.9,
        }
    }
}

impl ChangeSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }
}
