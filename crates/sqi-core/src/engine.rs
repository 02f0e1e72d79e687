//! Breakdown aggregator.
//!
//! Scores a student's attempts overall, per topic, and per (topic, concept)
//! pair, then ranks the concept groups. Groups are listed in the order their
//! first attempt appears in the input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Attempt, StudentData};
use crate::ranking::{rank_concepts, ConceptGroup, RankedConcept};
use crate::scoring::score_attempts;

/// SQI of one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    pub sqi: f64,
    /// Attempts that fell into this topic.
    #[serde(skip)]
    pub attempt_count: usize,
}

/// SQI of one (topic, concept) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptScore {
    pub topic: String,
    pub concept: String,
    pub sqi: f64,
    /// Attempts that fell into this concept group.
    #[serde(skip)]
    pub attempt_count: usize,
}

/// Full engine output for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqiBreakdown {
    /// SQI over every attempt.
    pub overall: f64,
    pub topic_scores: Vec<TopicScore>,
    pub concept_scores: Vec<ConceptScore>,
    /// Concepts by remediation priority, highest first.
    pub ranked_concepts: Vec<RankedConcept>,
}

/// Stateless entry point for the SQI computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqiEngine;

impl SqiEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the breakdown for a student. See [`compute_breakdown`].
    pub fn compute(&self, data: &StudentData) -> SqiBreakdown {
        compute_breakdown(data)
    }
}

/// Attempts grouped by key, in first-occurrence order.
struct OrderedGroups<'a, K> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<&'a Attempt>)>,
}

impl<'a, K> OrderedGroups<'a, K>
where
    K: std::hash::Hash + Eq + Clone,
{
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn push(&mut self, key: K, attempt: &'a Attempt) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.index.insert(key.clone(), slot);
                self.groups.push((key, Vec::new()));
                slot
            }
        };
        self.groups[slot].1.push(attempt);
    }
}

/// Compute overall, per-topic, and per-concept SQI plus the ranked concepts.
pub fn compute_breakdown(data: &StudentData) -> SqiBreakdown {
    let overall = score_attempts(&data.attempts);

    let mut topics: OrderedGroups<'_, &str> = OrderedGroups::new();
    let mut concepts: OrderedGroups<'_, (&str, &str)> = OrderedGroups::new();

    for attempt in &data.attempts {
        topics.push(attempt.topic.as_str(), attempt);
        concepts.push((attempt.topic.as_str(), attempt.concept.as_str()), attempt);
    }

    tracing::debug!(
        student_id = %data.student_id,
        attempts = data.attempts.len(),
        topics = topics.groups.len(),
        concepts = concepts.groups.len(),
        "grouped attempts"
    );

    let topic_scores = topics
        .groups
        .iter()
        .map(|(topic, attempts)| TopicScore {
            topic: topic.to_string(),
            sqi: score_attempts(attempts.iter().copied()),
            attempt_count: attempts.len(),
        })
        .collect();

    let concept_groups: Vec<ConceptGroup<'_>> = concepts
        .groups
        .into_iter()
        .map(|((topic, concept), attempts)| ConceptGroup {
            topic,
            concept,
            sqi: score_attempts(attempts.iter().copied()),
            attempts,
        })
        .collect();

    let concept_scores = concept_groups
        .iter()
        .map(|g| ConceptScore {
            topic: g.topic.to_string(),
            concept: g.concept.to_string(),
            sqi: g.sqi,
            attempt_count: g.attempts.len(),
        })
        .collect();

    let ranked_concepts = rank_concepts(&concept_groups);

    SqiBreakdown {
        overall,
        topic_scores,
        concept_scores,
        ranked_concepts,
    }
}
