//! 6C scoring engine.
//!
//! Maps raw questionnaire responses onto the six learning categories,
//! derives a personality label and a human-readable description. The
//! engine is pure: no I/O, no clock, no randomness, and no failure
//! mode - malformed answers degrade to the scale midpoint.

pub mod catalog;
mod engine;
mod labels;

pub use catalog::{Question, QuestionKind, CATALOG, QUESTION_COUNT, SCALE_MAX, SCALE_MID, SCALE_MIN};
pub use engine::{score, Assessment};
pub use labels::label_for;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The six learning categories ("6Cs").
///
/// Declaration order is the canonical catalog order and doubles as the
/// tie-break order when two categories score equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Working and creating with others.
    Collaboration,
    /// Expressing ideas and listening well.
    Communication,
    /// Imagination and original thinking.
    Creativity,
    /// Reasoning, questioning, and problem solving.
    CriticalThinking,
    /// Persistence, self-regulation, and grit.
    Character,
    /// Care for the community and the wider world.
    Citizenship,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 6] = [
        Category::Collaboration,
        Category::Communication,
        Category::Creativity,
        Category::CriticalThinking,
        Category::Character,
        Category::Citizenship,
    ];

    /// Position in the canonical order.
    pub fn index(self) -> usize {
        match self {
            Category::Collaboration => 0,
            Category::Communication => 1,
            Category::Creativity => 2,
            Category::CriticalThinking => 3,
            Category::Character => 4,
            Category::Citizenship => 5,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Collaboration => write!(f, "collaboration"),
            Category::Communication => write!(f, "communication"),
            Category::Creativity => write!(f, "creativity"),
            Category::CriticalThinking => write!(f, "critical_thinking"),
            Category::Character => write!(f, "character"),
            Category::Citizenship => write!(f, "citizenship"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collaboration" => Ok(Category::Collaboration),
            "communication" => Ok(Category::Communication),
            "creativity" => Ok(Category::Creativity),
            "critical_thinking" => Ok(Category::CriticalThinking),
            "character" => Ok(Category::Character),
            "citizenship" => Ok(Category::Citizenship),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A single raw answer.
///
/// Likert questions carry an integer on the 1-5 scale; categorical
/// questions carry an option key or a list of option keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// A 1-5 Likert value.
    Scale(i64),
    /// A single selected option.
    Choice(String),
    /// A multi-select list of options.
    Multi(Vec<String>),
}

/// Raw answers keyed by question id. Immutable once submitted for scoring.
pub type ResponseSet = BTreeMap<u16, Answer>;

/// Computed category scores, each guaranteed to lie in [1.0, 5.0].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scores(BTreeMap<Category, f64>);

impl Scores {
    pub(crate) fn from_map(map: BTreeMap<Category, f64>) -> Self {
        Self(map)
    }

    /// Score for a category, or the scale midpoint if absent.
    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(SCALE_MID)
    }

    /// Iterate categories and scores in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(c, s)| (*c, *s))
    }
}
