//! Property tests for the SQI scorer, breakdown, and ranker.

use proptest::prelude::*;

use sqi_core::engine::compute_breakdown;
use sqi_core::model::{Attempt, Difficulty, Importance, QuestionType, StudentData};
use sqi_core::scoring::score_attempts;

fn importance() -> impl Strategy<Value = Importance> {
    prop_oneof![
        Just(Importance::A),
        Just(Importance::B),
        Just(Importance::C),
        "[D-Z]".prop_map(Importance::Other),
    ]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::E),
        Just(Difficulty::M),
        Just(Difficulty::H),
        "[a-z]{1,3}".prop_map(Difficulty::Other),
    ]
}

fn question_type() -> impl Strategy<Value = QuestionType> {
    prop_oneof![
        Just(QuestionType::Practical),
        Just(QuestionType::Theory),
        Just(QuestionType::Other("Oral".into())),
    ]
}

prop_compose! {
    fn attempt()(
        topic in prop::sample::select(vec!["Algebra", "Geometry", "Statistics"]),
        concept in prop::sample::select(vec!["Graphs", "Ratios", "Proofs", "Limits"]),
        importance in importance(),
        difficulty in difficulty(),
        question_type in question_type(),
        correct in any::<bool>(),
        marks in 0.0f64..20.0,
        neg_marks in 0.0f64..5.0,
        expected_time_sec in 1.0f64..300.0,
        time_spent_sec in 0.0f64..900.0,
        marked_review in any::<bool>(),
        revisits in prop_oneof![Just(0.0), Just(1.0), 0.0f64..4.0],
    ) -> Attempt {
        Attempt {
            topic: topic.to_string(),
            concept: concept.to_string(),
            importance,
            difficulty,
            question_type,
            case_based: false,
            correct,
            marks,
            neg_marks,
            expected_time_sec,
            time_spent_sec,
            marked_review,
            revisits,
        }
    }
}

fn student() -> impl Strategy<Value = StudentData> {
    prop::collection::vec(attempt(), 0..40).prop_map(|attempts| StudentData {
        student_id: "prop".into(),
        attempts,
    })
}

proptest! {
    #[test]
    fn score_is_bounded(attempts in prop::collection::vec(attempt(), 0..40)) {
        let sqi = score_attempts(&attempts);
        prop_assert!(sqi.is_finite());
        prop_assert!((0.0..=100.0).contains(&sqi), "sqi out of range: {sqi}");
    }

    #[test]
    fn breakdown_is_deterministic(data in student()) {
        let first = compute_breakdown(&data);
        let second = compute_breakdown(&data.clone());
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn every_attempt_lands_in_one_group(data in student()) {
        let out = compute_breakdown(&data);
        let topic_total: usize = out.topic_scores.iter().map(|t| t.attempt_count).sum();
        let concept_total: usize = out.concept_scores.iter().map(|c| c.attempt_count).sum();
        prop_assert_eq!(topic_total, data.attempts.len());
        prop_assert_eq!(concept_total, data.attempts.len());
        prop_assert!(out.topic_scores.iter().all(|t| t.attempt_count > 0));
        prop_assert!(out.concept_scores.iter().all(|c| c.attempt_count > 0));
        prop_assert_eq!(out.ranked_concepts.len(), out.concept_scores.len());
    }

    #[test]
    fn ranked_weights_are_bounded_and_sorted(data in student()) {
        let out = compute_breakdown(&data);
        for r in &out.ranked_concepts {
            prop_assert!((0.0..=1.0).contains(&r.weight), "weight out of range: {}", r.weight);
        }
        for pair in out.ranked_concepts.windows(2) {
            prop_assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn input_is_left_untouched(data in student()) {
        let before = data.clone();
        let _ = compute_breakdown(&data);
        prop_assert_eq!(before, data);
    }
}
