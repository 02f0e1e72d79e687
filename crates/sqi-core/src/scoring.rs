//! Attempt scoring.
//!
//! Turns any collection of attempts into a single SQI percentage in
//! `[0, 100]`. Each attempt contributes a weighted score and a weighted
//! ceiling; the percentage is their ratio after time, review, and revisit
//! adjustments have been applied to the weighted score only.

use serde::{Deserialize, Serialize};

use crate::model::{Attempt, Difficulty, Importance, QuestionType};

/// Time ratio above which the heavy slow-solving penalty applies.
pub const SLOW_RATIO: f64 = 2.0;
/// Time ratio above which the light slow-solving penalty applies.
pub const SLIGHTLY_SLOW_RATIO: f64 = 1.5;

const SLOW_PENALTY: f64 = 0.8;
const SLIGHTLY_SLOW_PENALTY: f64 = 0.9;
const REVIEW_PENALTY: f64 = 0.9;
const REVISIT_BONUS_FRACTION: f64 = 0.2;

/// Importance multiplier. Unknown tiers are neutral.
pub fn importance_weight(importance: &Importance) -> f64 {
    match importance {
        Importance::A => 1.0,
        Importance::B => 0.7,
        Importance::C => 0.5,
        Importance::Other(_) => 1.0,
    }
}

/// Difficulty multiplier. Unknown tiers are neutral.
pub fn difficulty_weight(difficulty: &Difficulty) -> f64 {
    match difficulty {
        Difficulty::E => 0.6,
        Difficulty::M => 1.0,
        Difficulty::H => 1.4,
        Difficulty::Other(_) => 1.0,
    }
}

/// Question-type multiplier. Unknown types are neutral.
pub fn type_weight(question_type: &QuestionType) -> f64 {
    match question_type {
        QuestionType::Practical => 1.1,
        QuestionType::Theory => 1.0,
        QuestionType::Other(_) => 1.0,
    }
}

/// How a single attempt moved the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptContribution {
    /// Final weighted score after every adjustment.
    pub weighted: f64,
    /// Weighted ceiling this attempt adds to the denominator.
    pub max_base: f64,
    /// Time ratio used for the penalty (`0.0` when undefined).
    pub time_ratio: f64,
    /// Multiplier from slow solving (`1.0` when none).
    pub time_penalty: f64,
    /// Multiplier from a wrong answer marked for review (`1.0` when none).
    pub review_penalty: f64,
    /// Additive bonus for a correct answer after revisiting.
    pub revisit_bonus: f64,
}

impl AttemptContribution {
    /// Score a single attempt.
    pub fn compute(attempt: &Attempt) -> Self {
        let base = if attempt.correct {
            attempt.marks
        } else {
            -attempt.neg_marks
        };

        let multiplier = importance_weight(&attempt.importance)
            * difficulty_weight(&attempt.difficulty)
            * type_weight(&attempt.question_type);

        let max_base = attempt.marks * multiplier;

        let time_ratio = attempt.time_ratio();
        let time_penalty = time_penalty(time_ratio);

        let review_penalty = if attempt.marked_review && !attempt.correct {
            REVIEW_PENALTY
        } else {
            1.0
        };

        let revisit_bonus = if attempt.revisits > 0.0 && attempt.correct {
            REVISIT_BONUS_FRACTION * attempt.marks
        } else {
            0.0
        };

        let weighted = base * multiplier * time_penalty * review_penalty + revisit_bonus;

        Self {
            weighted,
            max_base,
            time_ratio,
            time_penalty,
            review_penalty,
            revisit_bonus,
        }
    }
}

/// Multiplier for a given time ratio. First matching tier wins.
pub fn time_penalty(time_ratio: f64) -> f64 {
    if time_ratio > SLOW_RATIO {
        SLOW_PENALTY
    } else if time_ratio > SLIGHTLY_SLOW_RATIO {
        SLIGHTLY_SLOW_PENALTY
    } else {
        1.0
    }
}

/// Compute the SQI of a set of attempts.
///
/// The result is rounded to two decimals and clamped to `[0, 100]`. An empty
/// set, or one whose weighted ceiling is zero, scores `0.0`.
pub fn score_attempts<'a, I>(attempts: I) -> f64
where
    I: IntoIterator<Item = &'a Attempt>,
{
    let (total_weighted, max_possible) =
        attempts
            .into_iter()
            .fold((0.0f64, 0.0f64), |(total, max), attempt| {
                let c = AttemptContribution::compute(attempt);
                (total + c.weighted, max + c.max_base)
            });

    percentage(total_weighted, max_possible)
}

fn percentage(total_weighted: f64, max_possible: f64) -> f64 {
    if max_possible <= 0.0 {
        return 0.0;
    }
    let raw = total_weighted / max_possible * 100.0;
    if !raw.is_finite() {
        return 0.0;
    }
    round2(raw).clamp(0.0, 100.0)
}

/// Round to two decimal places using the exact decimal value of `value`.
///
/// Scaling by 100 first would round twice: `0.695` is stored just below
/// `0.695` and must give `0.69`, while `(0.695 * 100.0).round()` gives 70.
/// Exact midpoints (odd multiples of 1/8, such as `0.375`) round away from
/// zero.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let eighths = value * 8.0;
    let rounded = if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        (value * 100.0).round() / 100.0
    } else {
        // Float formatting is correctly rounded from the exact binary value.
        format!("{value:.2}").parse().unwrap_or(value)
    };

    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
