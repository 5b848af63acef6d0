//! Tests for the pure scoring engine.
//!
//! Covers the engine's contract: scores stay on the 1-5 scale, scoring
//! is deterministic, missing answers degrade to the midpoint, and the
//! label tie-break is stable.

use pretty_assertions::assert_eq;
use serde_json::json;

use sixc_assessment::scoring::{
    score, Answer, Category, ResponseSet, CATALOG, QUESTION_COUNT,
};

/// Response set answering every Likert item with `value` and leaving
/// categorical items unanswered.
fn likert_only(value: i64) -> ResponseSet {
    let mut responses = ResponseSet::new();
    for q in CATALOG.iter() {
        if matches!(q.kind, sixc_assessment::scoring::QuestionKind::Scale) {
            responses.insert(q.id, Answer::Scale(value));
        }
    }
    responses
}

#[test]
fn test_all_scores_stay_on_scale() {
    let sets = [
        ResponseSet::new(),
        likert_only(1),
        likert_only(5),
        {
            let mut r = ResponseSet::new();
            r.insert(1, Answer::Scale(5));
            r.insert(2, Answer::Scale(-7));
            r.insert(7, Answer::Choice("leads_the_team".to_string()));
            r.insert(16, Answer::Multi(vec!["puzzles".to_string()]));
            r.insert(99, Answer::Scale(5)); // unknown question id is ignored
            r
        },
    ];

    for responses in &sets {
        let assessment = score(responses);
        for category in Category::ALL {
            let s = assessment.scores.get(category);
            assert!((1.0..=5.0).contains(&s), "score {s} out of [1, 5]");
        }
    }
}

#[test]
fn test_identical_input_identical_output() {
    let responses = likert_only(4);
    let first = score(&responses);
    for _ in 0..5 {
        assert_eq!(score(&responses), first);
    }
}

#[test]
fn test_missing_answer_scores_as_midpoint() {
    let mut explicit = likert_only(5);
    explicit.insert(4, Answer::Scale(3));

    let mut missing = likert_only(5);
    missing.remove(&4);

    assert_eq!(score(&explicit), score(&missing));
}

#[test]
fn test_all_maximal_profile() {
    // Answer every question, categorical ones included, at the top of
    // the scale.
    let mut responses = likert_only(5);
    responses.insert(7, Answer::Choice("leads_the_team".to_string()));
    responses.insert(16, Answer::Multi(vec!["puzzles".to_string()]));
    assert_eq!(responses.len(), QUESTION_COUNT);

    let assessment = score(&responses);
    for category in Category::ALL {
        assert_eq!(assessment.scores.get(category), 5.0);
    }
    // All six categories tie; the tie-break designates the first
    // category in canonical order.
    assert_eq!(assessment.primary, Category::Collaboration);
    assert_eq!(assessment.secondary, Category::Communication);
    assert_eq!(assessment.personality_label, "The Team Builder");
}

#[test]
fn test_response_set_wire_format() {
    // The HTTP layer receives question ids as JSON object keys and a
    // mix of Likert and categorical answers.
    let raw = json!({
        "1": 4,
        "7": "joins_in",
        "16": ["puzzles", "building_sets"]
    });

    let responses: ResponseSet = serde_json::from_value(raw).unwrap();
    assert_eq!(responses.get(&1), Some(&Answer::Scale(4)));
    assert_eq!(responses.get(&7), Some(&Answer::Choice("joins_in".to_string())));
    assert_eq!(
        responses.get(&16),
        Some(&Answer::Multi(vec![
            "puzzles".to_string(),
            "building_sets".to_string()
        ]))
    );

    // Scoring the deserialized set works end to end.
    let assessment = score(&responses);
    assert!(assessment.scores.get(Category::Collaboration) > 3.0);
}

#[test]
fn test_strong_category_wins_label() {
    let mut responses = ResponseSet::new();
    for q in CATALOG.iter().filter(|q| q.category == Category::Citizenship) {
        responses.insert(q.id, Answer::Scale(5));
    }

    let assessment = score(&responses);
    assert_eq!(assessment.primary, Category::Citizenship);
    assert_eq!(assessment.personality_label, "The Community Helper");
    assert!(assessment
        .description
        .contains("caring for the wider community"));
}

#[test]
fn test_scores_serialize_with_category_names() {
    let assessment = score(&likert_only(4));
    let value = serde_json::to_value(&assessment.scores).unwrap();
    let map = value.as_object().unwrap();
    assert_eq!(map.len(), 6);
    assert!(map.contains_key("collaboration"));
    assert!(map.contains_key("critical_thinking"));
}
