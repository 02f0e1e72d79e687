//! Concept ranking for the downstream summary.
//!
//! Each (topic, concept) group gets a priority weight in `[0, 1]` built from
//! four signals: whether the learner ever got it wrong, how important it is,
//! how slowly it was solved, and how weak the group's own SQI is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Attempt, Importance};
use crate::scoring::round2;

const WRONG_WEIGHT: f64 = 0.4;
const IMPORTANCE_WEIGHT: f64 = 0.25;
const TIME_WEIGHT: f64 = 0.2;
const DIAGNOSTIC_WEIGHT: f64 = 0.15;

const HIGH_IMPORTANCE_THRESHOLD: f64 = 0.9;
const LOW_SQI_THRESHOLD: f64 = 70.0;

const FAST_TIME_SCORE: f64 = 1.0;
const MEDIUM_TIME_SCORE: f64 = 0.7;
const SLOW_TIME_SCORE: f64 = 0.4;

/// Importance used for ranking. Kept apart from the scorer's multiplier table;
/// unknown tiers count as zero here.
fn ranking_importance(importance: &Importance) -> f64 {
    match importance {
        Importance::A => 1.0,
        Importance::B => 0.7,
        Importance::C => 0.5,
        Importance::Other(_) => 0.0,
    }
}

/// Why a concept was ranked where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankReason {
    #[serde(rename = "Wrong earlier")]
    WrongEarlier,
    #[serde(rename = "High importance (A)")]
    HighImportance,
    #[serde(rename = "Low diagnostic score")]
    LowDiagnosticScore,
    #[serde(rename = "Slow solving pattern")]
    SlowSolving,
}

impl RankReason {
    pub fn label(&self) -> &'static str {
        match self {
            RankReason::WrongEarlier => "Wrong earlier",
            RankReason::HighImportance => "High importance (A)",
            RankReason::LowDiagnosticScore => "Low diagnostic score",
            RankReason::SlowSolving => "Slow solving pattern",
        }
    }
}

impl fmt::Display for RankReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A concept group ready for ranking.
#[derive(Debug, Clone)]
pub struct ConceptGroup<'a> {
    pub topic: &'a str,
    pub concept: &'a str,
    /// The group's own SQI.
    pub sqi: f64,
    pub attempts: Vec<&'a Attempt>,
}

/// A ranked concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedConcept {
    pub topic: String,
    pub concept: String,
    /// Priority weight in `[0, 1]`, two decimals.
    pub weight: f64,
    pub reasons: Vec<RankReason>,
}

/// Intermediate signals for one concept group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSignals {
    pub wrong_at_least_once: bool,
    pub avg_importance: f64,
    pub avg_time_ratio: f64,
    pub time_score: f64,
    pub diagnostic_quality: f64,
}

impl RankSignals {
    pub fn compute(group: &ConceptGroup<'_>) -> Self {
        let avg_time_ratio = mean(&group.attempts, Attempt::time_ratio);

        Self {
            wrong_at_least_once: group.attempts.iter().any(|a| !a.correct),
            avg_importance: mean(&group.attempts, |a| ranking_importance(&a.importance)),
            avg_time_ratio,
            time_score: time_score(avg_time_ratio),
            diagnostic_quality: 1.0 - group.sqi / 100.0,
        }
    }

    /// Combined priority weight, rounded to two decimals.
    pub fn weight(&self) -> f64 {
        let wrong = if self.wrong_at_least_once { 1.0 } else { 0.0 };
        round2(
            WRONG_WEIGHT * wrong
                + IMPORTANCE_WEIGHT * self.avg_importance
                + TIME_WEIGHT * self.time_score
                + DIAGNOSTIC_WEIGHT * self.diagnostic_quality,
        )
    }
}

fn mean(attempts: &[&Attempt], f: impl Fn(&Attempt) -> f64) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    attempts.iter().map(|&a| f(a)).sum::<f64>() / attempts.len() as f64
}

/// Three-tier time score from an average time ratio.
pub fn time_score(avg_time_ratio: f64) -> f64 {
    if avg_time_ratio <= 1.0 {
        FAST_TIME_SCORE
    } else if avg_time_ratio > 1.5 {
        SLOW_TIME_SCORE
    } else {
        MEDIUM_TIME_SCORE
    }
}

/// Rank one concept group.
pub fn rank_concept(group: &ConceptGroup<'_>) -> RankedConcept {
    let signals = RankSignals::compute(group);

    let mut reasons = Vec::new();
    if signals.wrong_at_least_once {
        reasons.push(RankReason::WrongEarlier);
    }
    if signals.avg_importance >= HIGH_IMPORTANCE_THRESHOLD {
        reasons.push(RankReason::HighImportance);
    }
    if group.sqi < LOW_SQI_THRESHOLD {
        reasons.push(RankReason::LowDiagnosticScore);
    }
    if signals.time_score == SLOW_TIME_SCORE {
        reasons.push(RankReason::SlowSolving);
    }

    RankedConcept {
        topic: group.topic.to_string(),
        concept: group.concept.to_string(),
        weight: signals.weight(),
        reasons,
    }
}

/// Rank every group, highest weight first. Equal weights keep input order.
pub fn rank_concepts(groups: &[ConceptGroup<'_>]) -> Vec<RankedConcept> {
    let mut ranked: Vec<RankedConcept> = groups.iter().map(rank_concept).collect();
    ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    tracing::debug!(concepts = ranked.len(), "ranked concept groups");
    ranked
}
