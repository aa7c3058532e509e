//! Rule-based lexicon polarity backend
//!
//! Scoring follows the valence-aware approach used by VADER:
//! word valence lookup, capitalisation emphasis, booster words,
//! negation within a three-token window, contrastive "but", exclamation
//! emphasis, and a final `s / sqrt(s² + α)` normalisation.
//!
//! Lexicon files use the VADER layout: one `token<TAB>valence[<TAB>...]`
//! entry per line, extra columns ignored, `#` comments and blank lines
//! skipped.

use super::PolarityBackend;
use crate::error::{PortalError, Result};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Normalisation constant approximating the max expected raw sum
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Valence added by a booster word
const BOOSTER_INCREMENT: f64 = 0.293;

/// Valence added to an ALL-CAPS word when the text is mixed-case
const CAPS_EMPHASIS: f64 = 0.733;

/// Multiplier applied to a negated word
const NEGATION_SCALAR: f64 = -0.74;

/// Magnitude added per exclamation mark
const EXCLAMATION_EMPHASIS: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;

/// How many preceding tokens a booster or negator reaches
const LOOKBACK: usize = 3;
const BOOSTER_DAMPING: [f64; LOOKBACK] = [1.0, 0.95, 0.9];

/// Built-in valences, tuned for public-service feedback
const BUILTIN_VALENCES: &[(&str, f64)] = &[
    // Strong positive
    ("excellent", 3.2),
    ("outstanding", 3.1),
    ("great", 3.1),
    ("amazing", 2.8),
    ("wonderful", 2.7),
    ("fantastic", 2.6),
    ("superb", 2.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("perfect", 2.7),
    ("impressive", 2.5),
    // Positive
    ("good", 1.9),
    ("nice", 1.8),
    ("happy", 2.7),
    ("glad", 2.0),
    ("pleased", 1.9),
    ("satisfied", 1.8),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("grateful", 2.0),
    ("appreciate", 1.7),
    ("appreciated", 2.3),
    ("helpful", 1.8),
    ("efficient", 1.8),
    ("effective", 2.1),
    ("fair", 1.3),
    ("clean", 1.7),
    ("safe", 1.9),
    ("secure", 1.4),
    ("improve", 1.9),
    ("improved", 2.1),
    ("improvement", 2.0),
    ("improving", 1.8),
    ("progress", 1.8),
    ("support", 1.7),
    ("supported", 1.3),
    ("benefit", 2.0),
    ("beneficial", 1.9),
    ("success", 2.7),
    ("successful", 2.8),
    ("hope", 1.9),
    ("hopeful", 2.3),
    ("trust", 2.3),
    ("transparent", 1.5),
    ("accountable", 1.2),
    ("responsive", 1.6),
    ("quick", 1.0),
    ("fast", 0.9),
    ("reliable", 1.9),
    ("affordable", 1.6),
    ("accessible", 1.4),
    ("welcome", 2.0),
    ("encouraging", 2.4),
    ("commend", 1.9),
    ("praise", 2.6),
    ("well", 1.1),
    ("better", 1.9),
    ("repaired", 1.5),
    ("fixed", 1.1),
    ("working", 0.8),
    ("opportunity", 1.8),
    ("opportunities", 1.8),
    ("jobs", 0.9),
    ("peace", 2.5),
    ("peaceful", 2.2),
    ("proud", 2.1),
    ("like", 1.5),
    ("liked", 1.8),
    ("yes", 1.7),
    ("agree", 1.5),
    // Strong negative
    ("terrible", -2.5),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("worst", -3.1),
    ("hate", -2.7),
    ("disgusting", -2.4),
    ("disgraceful", -2.5),
    ("pathetic", -2.1),
    ("corrupt", -2.2),
    ("corruption", -2.3),
    ("fraud", -2.8),
    ("theft", -2.6),
    ("stolen", -2.2),
    ("violence", -3.1),
    ("killed", -3.5),
    ("dead", -3.3),
    ("dangerous", -2.1),
    ("disaster", -3.1),
    ("useless", -1.8),
    ("abandoned", -2.1),
    ("insecurity", -1.9),
    ("unsafe", -1.8),
    // Negative
    ("bad", -2.5),
    ("poor", -2.1),
    ("worse", -2.1),
    ("broken", -1.6),
    ("damaged", -1.9),
    ("repair", -1.2),
    ("potholes", -1.3),
    ("pothole", -1.2),
    ("dirty", -1.9),
    ("flood", -1.7),
    ("flooding", -1.6),
    ("shortage", -1.5),
    ("outage", -1.5),
    ("outages", -1.5),
    ("blackout", -1.7),
    ("delay", -1.3),
    ("delayed", -1.3),
    ("delays", -1.3),
    ("slow", -1.0),
    ("late", -0.8),
    ("expensive", -1.2),
    ("unfair", -2.1),
    ("neglect", -1.9),
    ("neglected", -2.1),
    ("ignored", -1.4),
    ("problem", -1.7),
    ("problems", -1.7),
    ("issue", -0.8),
    ("issues", -0.8),
    ("complaint", -1.5),
    ("complain", -1.5),
    ("fail", -2.3),
    ("failed", -2.3),
    ("failure", -2.3),
    ("failing", -2.3),
    ("lack", -1.3),
    ("lacking", -1.4),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("angry", -2.3),
    ("sad", -2.1),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("frustrated", -2.1),
    ("frustrating", -2.3),
    ("tired", -1.9),
    ("worried", -1.2),
    ("concern", -0.6),
    ("concerned", -1.0),
    ("fear", -2.2),
    ("afraid", -2.0),
    ("suffer", -2.1),
    ("suffering", -2.1),
    ("hardship", -2.0),
    ("hunger", -2.3),
    ("unemployment", -1.9),
    ("unemployed", -1.8),
    ("crime", -2.5),
    ("bribe", -2.0),
    ("bribes", -2.0),
    ("scam", -2.4),
    ("lies", -1.8),
    ("lie", -1.6),
    ("no", -1.2),
    ("never", -0.6),
    ("difficult", -1.5),
    ("hard", -0.4),
    ("unacceptable", -2.0),
    ("inadequate", -1.7),
    ("insufficient", -1.5),
    ("unpaid", -1.5),
    ("dislike", -1.6),
    ("disagree", -1.6),
];

/// Booster words and the sign of their effect
static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let increments = [
        "absolutely", "completely", "deeply", "enormously", "entirely", "especially",
        "exceptionally", "extremely", "greatly", "highly", "hugely", "incredibly",
        "particularly", "purely", "quite", "really", "remarkably", "so", "substantially",
        "thoroughly", "totally", "tremendously", "truly", "utterly", "very", "most", "more",
        "seriously", "badly",
    ];
    let decrements = [
        "almost", "barely", "hardly", "marginally", "occasionally", "partly", "scarcely",
        "slightly", "somewhat", "little", "less",
    ];

    increments
        .iter()
        .map(|w| (*w, BOOSTER_INCREMENT))
        .chain(decrements.iter().map(|w| (*w, -BOOSTER_INCREMENT)))
        .collect()
});

static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere",
        "cannot", "without", "rarely", "seldom", "aint", "dont", "doesnt", "didnt", "isnt",
        "arent", "wasnt", "werent", "wont", "cant", "couldnt", "shouldnt", "wouldnt",
        "hasnt", "havent", "hadnt",
    ]
    .into_iter()
    .collect()
});

/// Where a lexicon came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconSource {
    Builtin,
    File(PathBuf),
}

/// Word valence table
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
    source: LexiconSource,
}

impl Lexicon {
    /// The built-in civic feedback lexicon
    pub fn builtin() -> Self {
        Self {
            valences: BUILTIN_VALENCES
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
            source: LexiconSource::Builtin,
        }
    }

    /// Load a VADER-format lexicon file
    ///
    /// A missing, unreadable, or malformed file makes the backend
    /// unavailable rather than silently falling back to the built-in table.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PortalError::BackendUnavailable(format!(
                "cannot read lexicon {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut lexicon = Self::parse(&contents).map_err(|reason| {
            PortalError::BackendUnavailable(format!("lexicon {}: {}", path.display(), reason))
        })?;
        lexicon.source = LexiconSource::File(path.to_path_buf());

        info!(
            "Loaded {} lexicon entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    fn parse(contents: &str) -> std::result::Result<Self, String> {
        let mut valences = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.split('\t');
            let token = columns.next().unwrap_or_default().trim();
            let valence = columns
                .next()
                .ok_or_else(|| format!("line {}: missing valence column", idx + 1))?
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("line {}: {}", idx + 1, e))?;

            if token.is_empty() || !valence.is_finite() {
                return Err(format!("line {}: invalid entry", idx + 1));
            }
            valences.insert(token.to_lowercase(), valence);
        }

        if valences.is_empty() {
            return Err("no entries".to_string());
        }

        Ok(Self {
            valences,
            source: LexiconSource::Builtin,
        })
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    pub fn source(&self) -> &LexiconSource {
        &self.source
    }
}

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_shouting(&self) -> bool {
        let mut letters = 0;
        for c in self.raw.chars().filter(|c| c.is_alphabetic()) {
            if !c.is_uppercase() {
                return false;
            }
            letters += 1;
        }
        letters > 1
    }

    fn is_negator(&self) -> bool {
        NEGATORS.contains(self.lower.as_str()) || self.lower.ends_with("n't")
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(|raw| Token {
            raw,
            // Typographic apostrophes ("isn’t") match the ASCII forms
            lower: raw.to_lowercase().replace('\u{2019}', "'"),
        })
        .collect()
}

fn normalize(sum: f64) -> f64 {
    if sum.is_infinite() {
        return sum.signum();
    }
    // hypot keeps sum² from overflowing for huge custom valences
    let score = sum / sum.hypot(NORMALIZATION_ALPHA.sqrt());
    (score.clamp(-1.0, 1.0) * 10_000.0).round() / 10_000.0
}

/// Polarity backend over a [`Lexicon`]
#[derive(Debug, Clone)]
pub struct LexiconBackend {
    lexicon: Lexicon,
}

impl LexiconBackend {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn builtin() -> Self {
        Self::new(Lexicon::builtin())
    }

    /// Backend over a lexicon file, or the built-in table when `path` is `None`
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(Lexicon::from_path(path)?)),
            None => Ok(Self::builtin()),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn token_valence(&self, tokens: &[Token<'_>], i: usize, mixed_case: bool) -> f64 {
        let token = &tokens[i];
        if BOOSTERS.contains_key(token.lower.as_str()) {
            return 0.0;
        }
        let Some(mut valence) = self.lexicon.valence(&token.lower) else {
            return 0.0;
        };
        let sign = valence.signum();

        if mixed_case && token.is_shouting() {
            valence += sign * CAPS_EMPHASIS;
        }

        for distance in 1..=LOOKBACK.min(i) {
            let prev = &tokens[i - distance];
            if let Some(boost) = BOOSTERS.get(prev.lower.as_str()) {
                let mut scalar = boost * sign;
                if mixed_case && prev.is_shouting() {
                    scalar += sign * CAPS_EMPHASIS;
                }
                valence += scalar * BOOSTER_DAMPING[distance - 1];
            }
            if prev.is_negator() {
                valence *= NEGATION_SCALAR;
            }
        }

        valence
    }
}

impl PolarityBackend for LexiconBackend {
    fn name(&self) -> &str {
        match self.lexicon.source {
            LexiconSource::Builtin => "lexicon:builtin",
            LexiconSource::File(_) => "lexicon:file",
        }
    }

    fn polarity(&self, text: &str) -> Result<f64> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(0.0);
        }

        let shouting = tokens.iter().filter(|t| t.is_shouting()).count();
        let mixed_case = shouting > 0 && shouting < tokens.len();

        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, i, mixed_case))
            .collect();

        // Contrastive conjunction: the clause after "but" dominates
        if let Some(pivot) = tokens.iter().position(|t| t.lower == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *valence *= 0.5;
                } else if i > pivot {
                    *valence *= 1.5;
                }
            }
        }

        let mut sum: f64 = valences.iter().sum();
        if sum != 0.0 {
            let marks = text.chars().filter(|c| *c == '!').count().min(MAX_EXCLAMATIONS);
            sum += sum.signum() * marks as f64 * EXCLAMATION_EMPHASIS;
        }

        let score = normalize(sum);
        debug!("Lexicon polarity: raw sum {:.3} -> {:.4}", sum, score);
        Ok(score)
    }
}
