//! The fixed assessment questionnaire.
//!
//! Question ids, category weights, and categorical option values are
//! application constants: the engine only reads these tables, so tuning
//! the instrument is a data change here, never a logic change.

use super::Category;

/// Lowest value on the Likert scale.
pub const SCALE_MIN: f64 = 1.0;
/// Highest value on the Likert scale.
pub const SCALE_MAX: f64 = 5.0;
/// Neutral midpoint substituted for missing or malformed answers.
pub const SCALE_MID: f64 = 3.0;

/// Number of questions in the instrument.
pub const QUESTION_COUNT: usize = 24;

/// How a question is answered.
#[derive(Debug, Clone, Copy)]
pub enum QuestionKind {
    /// Agreement on the 1-5 Likert scale.
    Scale,
    /// Exactly one option; each option maps to a scale-equivalent value.
    Choice(&'static [(&'static str, f64)]),
    /// Any number of options; selected values are averaged.
    MultiChoice(&'static [(&'static str, f64)]),
}

/// One questionnaire item.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    /// Stable question id used as the response key.
    pub id: u16,
    /// Prompt shown to the respondent.
    pub prompt: &'static str,
    /// Category this item loads on.
    pub category: Category,
    /// Relative weight within the category.
    pub weight: f64,
    /// Answer shape.
    pub kind: QuestionKind,
}

const GROUP_GAME_OPTIONS: &[(&str, f64)] = &[
    ("leads_the_team", 5.0),
    ("joins_in", 4.0),
    ("follows_along", 3.0),
    ("plays_nearby", 2.0),
    ("prefers_alone", 1.0),
];

const FAVORITE_ACTIVITY_OPTIONS: &[(&str, f64)] = &[
    ("puzzles", 5.0),
    ("strategy_games", 5.0),
    ("science_questions", 4.0),
    ("building_sets", 4.0),
    ("sorting_collections", 3.0),
    ("none_of_these", 1.0),
];

/// The full instrument, in presentation order.
pub const CATALOG: [Question; QUESTION_COUNT] = [
    Question {
        id: 1,
        prompt: "Enjoys working on projects together with other children",
        category: Category::Collaboration,
        weight: 1.2,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 2,
        prompt: "Explains their ideas so that others understand them",
        category: Category::Communication,
        weight: 1.2,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 3,
        prompt: "Invents their own games, stories, or ways of doing things",
        category: Category::Creativity,
        weight: 1.2,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 4,
        prompt: "Asks why things work the way they do",
        category: Category::CriticalThinking,
        weight: 1.2,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 5,
        prompt: "Keeps trying when something is difficult",
        category: Category::Character,
        weight: 1.2,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 6,
        prompt: "Notices when someone else needs help",
        category: Category::Citizenship,
        weight: 1.2,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 7,
        prompt: "When playing a group game, your child usually...",
        category: Category::Collaboration,
        weight: 1.0,
        kind: QuestionKind::Choice(GROUP_GAME_OPTIONS),
    },
    Question {
        id: 8,
        prompt: "Listens without interrupting when others speak",
        category: Category::Communication,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 9,
        prompt: "Comes up with unusual solutions to everyday problems",
        category: Category::Creativity,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 10,
        prompt: "Checks whether an answer actually makes sense",
        category: Category::CriticalThinking,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 11,
        prompt: "Owns up to mistakes without being prompted",
        category: Category::Character,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 12,
        prompt: "Takes care of shared spaces and belongings",
        category: Category::Citizenship,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 13,
        prompt: "Shares materials and takes turns without conflict",
        category: Category::Collaboration,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 14,
        prompt: "Enjoys telling stories about their day",
        category: Category::Communication,
        weight: 0.8,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 15,
        prompt: "Would rather make something new than follow instructions",
        category: Category::Creativity,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 16,
        prompt: "Which of these does your child reach for first?",
        category: Category::CriticalThinking,
        weight: 1.0,
        kind: QuestionKind::MultiChoice(FAVORITE_ACTIVITY_OPTIONS),
    },
    Question {
        id: 17,
        prompt: "Finishes what they start, even without reminders",
        category: Category::Character,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 18,
        prompt: "Shows interest in how choices affect other people",
        category: Category::Citizenship,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 19,
        prompt: "Prefers team activities over solo activities",
        category: Category::Collaboration,
        weight: 0.8,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 20,
        prompt: "Adjusts how they speak depending on who is listening",
        category: Category::Communication,
        weight: 1.0,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 21,
        prompt: "Gets absorbed in drawing, building, or make-believe",
        category: Category::Creativity,
        weight: 0.8,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 22,
        prompt: "Weighs options before deciding",
        category: Category::CriticalThinking,
        weight: 0.8,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 23,
        prompt: "Stays calm when plans change unexpectedly",
        category: Category::Character,
        weight: 0.8,
        kind: QuestionKind::Scale,
    },
    Question {
        id: 24,
        prompt: "Wants to join in when the family helps others",
        category: Category::Citizenship,
        weight: 0.8,
        kind: QuestionKind::Scale,
    },
];

/// Look up a question by id.
pub fn question(id: u16) -> Option<&'static Question> {
    CATALOG.iter().find(|q| q.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_category_equally() {
        for category in Category::ALL {
            let count = CATALOG.iter().filter(|q| q.category == category).count();
            assert_eq!(count, 4, "category {} should have 4 items", category);
        }
    }

    #[test]
    fn test_question_ids_are_unique_and_dense() {
        for (i, q) in CATALOG.iter().enumerate() {
            assert_eq!(q.id as usize, i + 1);
        }
    }

    #[test]
    fn test_option_values_stay_on_scale() {
        for q in &CATALOG {
            let options = match q.kind {
                QuestionKind::Scale => continue,
                QuestionKind::Choice(opts) | QuestionKind::MultiChoice(opts) => opts,
            };
            for (key, value) in options {
                assert!(
                    (SCALE_MIN..=SCALE_MAX).contains(value),
                    "option {} of question {} is off-scale",
                    key,
                    q.id
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert!(question(1).is_some());
        assert!(question(24).is_some());
        assert!(question(25).is_none());
        assert!(question(0).is_none());
    }
}
