mod error_formatter;
mod formatter;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use formatter::{ChangeReport, Formatter, FormReport, GenerationReport, WordReport};
use phonodrift::language::paradigm::{ExponenceCluster, SpeechPartChangeParadigm};
use phonodrift::{
    Affix, CategoryApplicator, ChangeSettings, Engine, Language, PhonologicalRule, SpeechPart,
    StressType, TendencyDriver, UniformDriver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "phonodrift")]
#[command(about = "Sound change for generated languages.")]
#[command(
    long_about = "phonodrift applies diachronic sound change rules to a small language.\nRules rewrite the lexicon and every affix, rules that cross an affix boundary stay live as sandhi, and the evolve command lets a language drift over many generations."
)]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one rule to a list of words
    ///
    /// Every word is a noun. With --suffix and --prefix the nouns get a plural
    /// suffix and an accusative prefix, so the affix rewriting and sandhi
    /// handling can be seen in the generated forms.
    ///
    /// Example: phonodrift apply "b -> t / _ $" aba bob --suffix ob
    Apply {
        /// Rule text: TARGET -> SUBSTITUTION / PRECEDING _ FOLLOWING[!]
        rule: String,
        #[command(flatten)]
        language: LanguageArgs,
        /// Print a JSON report instead of tables
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Compose two rules into first-match alternatives
    ///
    /// Prints rules that, tried in order, have the same effect as applying
    /// FIRST and then SECOND.
    Compose {
        first: String,
        second: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Show the parts of a rule, its trimmed form and its mirror image
    Show { rule: String },
    /// Let a language drift for a number of generations
    ///
    /// Candidate rules are read from *.rules files (one rule per line, `#`
    /// starts a comment). Each generation picks an applicable candidate, or
    /// follows the active tendencies with --tendencies.
    Evolve {
        #[command(flatten)]
        language: LanguageArgs,
        /// Directory searched recursively for .rules files
        #[arg(short = 'd', long = "rules-dir", default_value = ".")]
        rules_dir: PathBuf,
        /// Number of generations to run
        #[arg(short = 'g', long, default_value_t = 10)]
        generations: usize,
        /// Seed of the random generator
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        /// Drive change with the built-in tendencies
        #[arg(short, long)]
        tendencies: bool,
        /// Print a JSON report instead of tables
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

#[derive(Args)]
struct LanguageArgs {
    /// Words of the language, spelled with catalog symbols (e.g. aba tʃa)
    #[arg(required = true)]
    words: Vec<String>,
    /// Plural suffix attached to every noun
    #[arg(long)]
    suffix: Option<String>,
    /// Accusative prefix attached to every noun
    #[arg(long)]
    prefix: Option<String>,
    /// Stress placement
    #[arg(long, value_enum, default_value_t = StressArg::Unstressed)]
    stress: StressArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum StressArg {
    Unstressed,
    Initial,
    Penultimate,
    Final,
}

impl From<StressArg> for StressType {
    fn from(stress: StressArg) -> Self {
        match stress {
            StressArg::Unstressed => StressType::Unstressed,
            StressArg::Initial => StressType::Initial,
            StressArg::Penultimate => StressType::Penultimate,
            StressArg::Final => StressType::Final,
        }
    }
}

/// Overrides of the engine settings; unset flags keep the defaults
#[derive(Args)]
struct SettingsArgs {
    /// Maximum syllable template growth when a change needs re-analysis
    #[arg(long)]
    max_extra_slots: Option<usize>,
    /// Maximum number of alternatives a rule composition may produce
    #[arg(long)]
    max_alternatives: Option<usize>,
    /// Chance that a picked rule is narrowed to a single phoneme
    #[arg(long)]
    narrowing_chance: Option<f64>,
    /// Chance per generation that a new tendency develops
    #[arg(long)]
    development_chance: Option<f64>,
    /// Multiplier on the chance that a tendency stays active
    #[arg(long)]
    stickiness: Option<f64>,
}

impl SettingsArgs {
    fn settings(&self) -> ChangeSettings {
        let defaults = ChangeSettings::default();
        ChangeSettings {
            max_extra_slots: self.max_extra_slots.unwrap_or(defaults.max_extra_slots),
            max_alternatives: self.max_alternatives.unwrap_or(defaults.max_alternatives),
            narrowing_chance: self.narrowing_chance.unwrap_or(defaults.narrowing_chance),
            development_chance: self.development_chance.unwrap_or(defaults.development_chance),
            stickiness: self.stickiness.unwrap_or(defaults.stickiness),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Apply {
            rule,
            language,
            json,
            settings,
        } => apply_command(rule, language, *json, settings),
        Commands::Compose {
            first,
            second,
            settings,
        } => compose_command(first, second, settings),
        Commands::Show { rule } => show_command(rule),
        Commands::Evolve {
            language,
            rules_dir,
            generations,
            seed,
            tendencies,
            json,
            settings,
        } => evolve_command(
            language,
            rules_dir,
            *generations,
            *seed,
            *tendencies,
            *json,
            settings,
        ),
    };

    if let Err(e) = result {
        if let Some(drift_err) = e.downcast_ref::<phonodrift::DriftError>() {
            eprintln!("{}", error_formatter::format_error(drift_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "phonodrift=debug"
    } else {
        "phonodrift=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn apply_command(
    rule_text: &str,
    args: &LanguageArgs,
    json: bool,
    settings: &SettingsArgs,
) -> Result<()> {
    let engine = Engine::new().with_settings(settings.settings());
    let language = build_language(&engine, args)?;

    let rules = engine.parse_rules(rule_text, &language)?;
    let outcome = engine.apply_all(&language, &rules);
    let forms = if args.prefix.is_some() || args.suffix.is_some() {
        form_reports(&engine, &outcome.value)?
    } else {
        Vec::new()
    };
    let report = ChangeReport {
        rules: rules.iter().map(|r| r.to_string()).collect(),
        words: word_reports(&language, &outcome.value),
        forms,
        generations: vec![GenerationReport {
            generation: 1,
            messages: outcome.messages,
        }],
        tendencies: Vec::new(),
    };

    let formatter = Formatter::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", formatter.format_apply(&report));
    }
    Ok(())
}

fn compose_command(first: &str, second: &str, settings: &SettingsArgs) -> Result<()> {
    let engine = Engine::new().with_settings(settings.settings());
    let first = engine.parse_rule(first)?;
    let second = engine.parse_rule(second)?;

    let alternatives = engine.combine(&first, &second).with_context(|| {
        format!(
            "composing '{}' and '{}' needs more than {} alternatives",
            first,
            second,
            engine.settings().max_alternatives
        )
    })?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_alternatives(&first, &second, &alternatives));
    Ok(())
}

fn show_command(rule_text: &str) -> Result<()> {
    let engine = Engine::new();
    let rule = engine.parse_rule(rule_text)?;

    let formatter = Formatter::default();
    print!("{}", formatter.format_rule(&rule));
    Ok(())
}

fn evolve_command(
    args: &LanguageArgs,
    rules_dir: &Path,
    generations: usize,
    seed: u64,
    tendencies: bool,
    json: bool,
    settings: &SettingsArgs,
) -> Result<()> {
    let engine = Engine::new().with_settings(settings.settings());
    let original = build_language(&engine, args)?;
    let sources = load_rule_sources(rules_dir)?;
    // Fail on bad rule files before the first generation
    candidates(&engine, &sources, &original)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let uniform = UniformDriver::new();
    let mut driver = TendencyDriver::with_builtin_tendencies();
    let mut language = original.clone();
    let mut history = Vec::with_capacity(generations);

    for generation in 1..=generations {
        let rules = candidates(&engine, &sources, &language)?;
        let outcome = if tendencies {
            driver.step(&engine, &language, &rules, &mut rng)
        } else {
            uniform.step(&engine, &language, &rules, &mut rng)
        };
        debug!(generation, "generation finished");
        let (next, messages) = outcome.into_parts();
        language = next;
        history.push(GenerationReport {
            generation,
            messages,
        });
    }

    let forms = if args.prefix.is_some() || args.suffix.is_some() {
        form_reports(&engine, &language)?
    } else {
        Vec::new()
    };
    let report = ChangeReport {
        rules: language
            .change_paradigm
            .sandhi_rules
            .iter()
            .map(|r| r.to_string())
            .collect(),
        words: word_reports(&original, &language),
        forms,
        generations: history,
        tendencies: if tendencies {
            driver.active_names().iter().map(|n| n.to_string()).collect()
        } else {
            Vec::new()
        },
    };

    let formatter = Formatter::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", formatter.format_evolution(&report));
    }
    Ok(())
}

/// Nouns of `args.words`, with a plural suffix and accusative prefix when given
fn build_language(engine: &Engine, args: &LanguageArgs) -> Result<Language> {
    let mut language = Language::new(args.stress.into());
    for text in &args.words {
        language = language.with_word(engine.word(text, SpeechPart::Noun, text.as_str())?);
    }

    let mut paradigm = SpeechPartChangeParadigm::new(SpeechPart::Noun);
    if let Some(suffix) = &args.suffix {
        paradigm = paradigm.with_cluster(
            ExponenceCluster::new("number")
                .with_value("sg", CategoryApplicator::Pass)
                .with_value("pl", CategoryApplicator::Affix(Affix::suffix(segment(engine, suffix)?))),
        );
    }
    if let Some(prefix) = &args.prefix {
        paradigm = paradigm.with_cluster(
            ExponenceCluster::new("case")
                .with_value("nom", CategoryApplicator::Pass)
                .with_value("acc", CategoryApplicator::Affix(Affix::prefix(segment(engine, prefix)?))),
        );
    }
    if !paradigm.clusters.is_empty() {
        language = language.with_paradigm(paradigm);
    }
    Ok(language)
}

fn segment(engine: &Engine, text: &str) -> Result<Vec<phonodrift::Phoneme>> {
    engine
        .catalog()
        .segment(text)
        .map_err(|symbol| {
            phonodrift::DriftError::UnknownPhoneme {
                symbol,
                text: text.to_string(),
            }
            .into()
        })
}

fn word_reports(before: &Language, after: &Language) -> Vec<WordReport> {
    before
        .lexis
        .iter()
        .zip(after.lexis.iter())
        .map(|(old, new)| WordReport {
            gloss: old.gloss.clone(),
            before: old.text(),
            after: new.text(),
            syllables: new.transcription(),
        })
        .collect()
}

fn form_reports(engine: &Engine, language: &Language) -> Result<Vec<FormReport>> {
    let all_forms = engine.language_forms(language)?;
    Ok(language
        .lexis
        .iter()
        .zip(all_forms)
        .flat_map(|(word, forms)| {
            forms.into_iter().map(move |form| FormReport {
                gloss: word.gloss.clone(),
                categories: form.categories.join("."),
                form: form.text(),
            })
        })
        .collect())
}

/// One line of a rules file
struct RuleSource {
    source_id: String,
    text: String,
}

/// Load every rule line of the .rules files under `rules_dir`
fn load_rule_sources(rules_dir: &Path) -> Result<Vec<RuleSource>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(rules_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rules") {
            continue;
        }
        let path = entry.path();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        for (index, line) in content.lines().enumerate() {
            let text = line.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }
            sources.push(RuleSource {
                source_id: format!("{}:{}", path.display(), index + 1),
                text: text.to_string(),
            });
        }
    }
    debug!(count = sources.len(), "loaded rule lines");
    Ok(sources)
}

/// Candidate rules with placeholders expanded against `language`
fn candidates(
    engine: &Engine,
    sources: &[RuleSource],
    language: &Language,
) -> Result<Vec<PhonologicalRule>> {
    let mut rules = Vec::new();
    for source in sources {
        rules.extend(engine.parse_rules_from_source(&source.text, &source.source_id, language)?);
    }
    Ok(rules)
}
