use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{CATALOG, SCALE_MAX, SCALE_MID, SCALE_MIN};
use super::labels;
use super::{Answer, Category, Question, QuestionKind, ResponseSet, Scores};

/// A fully computed assessment: scores, label, and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Per-category scores in [1.0, 5.0].
    pub scores: Scores,
    /// Personality label for the highest-scoring category.
    pub personality_label: String,
    /// Human-readable description assembled from the top two categories.
    pub description: String,
    /// Highest-scoring category after tie-break.
    pub primary: Category,
    /// Second-highest category after tie-break.
    pub secondary: Category,
}

/// Score a response set.
///
/// Pure and deterministic. Missing answers, off-scale Likert values,
/// unknown option keys, and answers of the wrong shape all count as the
/// scale midpoint; there is no error path.
pub fn score(responses: &ResponseSet) -> Assessment {
    let mut weighted_sums = [0.0_f64; 6];
    let mut weight_totals = [0.0_f64; 6];

    for question in &CATALOG {
        let value = answer_value(question, responses.get(&question.id));
        let idx = question.category.index();
        weighted_sums[idx] += question.weight * value;
        weight_totals[idx] += question.weight;
    }

    let mut map = BTreeMap::new();
    for category in Category::ALL {
        let idx = category.index();
        let raw = weighted_sums[idx] / weight_totals[idx];
        map.insert(category, raw.clamp(SCALE_MIN, SCALE_MAX));
    }
    let scores = Scores::from_map(map);

    let (primary, secondary) = top_two(&scores);
    let personality_label = labels::label_for(primary).to_string();
    let description = labels::describe(primary, secondary);

    Assessment {
        scores,
        personality_label,
        description,
        primary,
        secondary,
    }
}

/// Scale-equivalent value of one answer, or the midpoint when the
/// answer is missing or does not fit the question.
fn answer_value(question: &Question, answer: Option<&Answer>) -> f64 {
    match (question.kind, answer) {
        (QuestionKind::Scale, Some(Answer::Scale(n))) => {
            let n = *n as f64;
            if (SCALE_MIN..=SCALE_MAX).contains(&n) {
                n
            } else {
                SCALE_MID
            }
        }
        (QuestionKind::Choice(options), Some(Answer::Choice(key))) => {
            option_value(options, key).unwrap_or(SCALE_MID)
        }
        (QuestionKind::MultiChoice(options), Some(Answer::Multi(keys))) => {
            let values: Vec<f64> = keys
                .iter()
                .filter_map(|k| option_value(options, k))
                .collect();
            if values.is_empty() {
                SCALE_MID
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
        // A single selection is acceptable for a multi-select item.
        (QuestionKind::MultiChoice(options), Some(Answer::Choice(key))) => {
            option_value(options, key).unwrap_or(SCALE_MID)
        }
        _ => SCALE_MID,
    }
}

fn option_value(options: &[(&str, f64)], key: &str) -> Option<f64> {
    options
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| *value)
}

/// Rank categories by score, canonical order breaking ties, and return
/// the top two.
fn top_two(scores: &Scores) -> (Category, Category) {
    let mut ranked: Vec<(Category, f64)> = Category::ALL
        .iter()
        .map(|c| (*c, scores.get(*c)))
        .collect();
    // Stable sort: equal scores keep canonical order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    (ranked[0].0, ranked[1].0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::catalog::QUESTION_COUNT;

    fn all_scale(value: i64) -> ResponseSet {
        let mut responses = ResponseSet::new();
        for q in &CATALOG {
            let answer = match q.kind {
                QuestionKind::Scale => Answer::Scale(value),
                QuestionKind::Choice(options) | QuestionKind::MultiChoice(options) => {
                    // Pick the option whose value matches the scale value,
                    // falling back to the first option.
                    let key = options
                        .iter()
                        .find(|(_, v)| *v == value as f64)
                        .map(|(k, _)| *k)
                        .unwrap_or(options[0].0);
                    Answer::Choice(key.to_string())
                }
            };
            responses.insert(q.id, answer);
        }
        responses
    }

    #[test]
    fn test_empty_responses_score_midpoint_everywhere() {
        let assessment = score(&ResponseSet::new());
        for category in Category::ALL {
            assert_eq!(assessment.scores.get(category), SCALE_MID);
        }
    }

    #[test]
    fn test_all_max_scores_five_and_labels_first_category() {
        let assessment = score(&all_scale(5));
        for category in Category::ALL {
            assert_eq!(assessment.scores.get(category), 5.0);
        }
        // Six-way tie resolves to the first category in canonical order.
        assert_eq!(assessment.primary, Category::Collaboration);
        assert_eq!(assessment.personality_label, "The Team Builder");
    }

    #[test]
    fn test_missing_answer_equals_explicit_midpoint() {
        let mut with_midpoint = all_scale(4);
        with_midpoint.insert(2, Answer::Scale(3));

        let mut with_missing = all_scale(4);
        with_missing.remove(&2);

        assert_eq!(score(&with_midpoint), score(&with_missing));
    }

    #[test]
    fn test_off_scale_answer_counts_as_midpoint() {
        let mut exact = all_scale(4);
        exact.insert(5, Answer::Scale(3));

        let mut off_scale = all_scale(4);
        off_scale.insert(5, Answer::Scale(42));

        assert_eq!(score(&exact), score(&off_scale));
    }

    #[test]
    fn test_wrong_shape_counts_as_midpoint() {
        let mut exact = all_scale(4);
        exact.insert(1, Answer::Scale(3));

        let mut wrong_shape = all_scale(4);
        wrong_shape.insert(1, Answer::Choice("leads_the_team".to_string()));

        assert_eq!(score(&exact), score(&wrong_shape));
    }

    #[test]
    fn test_multi_select_averages_known_options() {
        let mut responses = ResponseSet::new();
        responses.insert(
            16,
            Answer::Multi(vec![
                "puzzles".to_string(),           // 5.0
                "sorting_collections".to_string(), // 3.0
                "not_a_real_option".to_string(), // ignored
            ]),
        );
        let assessment = score(&responses);

        // Question 16 contributes (5.0 + 3.0) / 2 = 4.0 at weight 1.0;
        // the category's other three items default to the midpoint.
        let expected = (4.0 * 1.0 + 3.0 * 1.2 + 3.0 * 1.0 + 3.0 * 0.8) / (1.0 + 1.2 + 1.0 + 0.8);
        let got = assessment.scores.get(Category::CriticalThinking);
        assert!((got - expected).abs() < 1e-9, "got {got}, want {expected}");
    }

    #[test]
    fn test_determinism() {
        let responses = all_scale(4);
        assert_eq!(score(&responses), score(&responses));
    }

    #[test]
    fn test_scores_always_in_range() {
        for value in [1, 2, 3, 4, 5] {
            let assessment = score(&all_scale(value));
            for category in Category::ALL {
                let s = assessment.scores.get(category);
                assert!((1.0..=5.0).contains(&s), "score {s} out of range");
            }
        }
    }

    #[test]
    fn test_primary_category_tracks_strong_answers() {
        // Max out creativity, leave the rest neutral.
        let mut responses = ResponseSet::new();
        for q in CATALOG.iter().filter(|q| q.category == Category::Creativity) {
            responses.insert(q.id, Answer::Scale(5));
        }
        assert_eq!(responses.len(), QUESTION_COUNT / 6);

        let assessment = score(&responses);
        assert_eq!(assessment.primary, Category::Creativity);
        assert_eq!(assessment.personality_label, "The Imaginative Explorer");
        assert!(assessment.description.contains("imagining new possibilities"));
    }
}
