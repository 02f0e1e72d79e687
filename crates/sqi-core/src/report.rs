//! Summary payload: the export document handed to the summary customizer.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SqiConfig;
use crate::engine::{ConceptScore, SqiBreakdown, TopicScore};
use crate::ranking::RankedConcept;

/// Default file name for an exported payload.
pub const DEFAULT_PAYLOAD_FILE: &str = "summary_customizer_input.json";

/// A student's SQI breakdown wrapped for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub student_id: String,
    pub overall_sqi: f64,
    pub topic_scores: Vec<TopicScore>,
    pub concept_scores: Vec<ConceptScore>,
    pub ranked_concepts_for_summary: Vec<RankedConcept>,
    pub metadata: PayloadMetadata,
}

/// Provenance of an exported payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub diagnostic_prompt_version: String,
    /// When the payload was exported.
    pub computed_at: DateTime<Utc>,
    pub engine: String,
    /// Diagnostic prompt text from config. Rendered in summaries, not exported.
    #[serde(skip)]
    pub diagnostic_prompt: Option<String>,
}

impl PayloadMetadata {
    /// Metadata stamped with the current time.
    pub fn from_config(config: &SqiConfig) -> Self {
        Self {
            diagnostic_prompt_version: config.diagnostic_prompt_version.clone(),
            computed_at: Utc::now(),
            engine: config.engine.clone(),
            diagnostic_prompt: config.diagnostic_prompt.clone(),
        }
    }
}

impl SummaryPayload {
    /// Wrap a breakdown for export.
    pub fn new(student_id: &str, breakdown: &SqiBreakdown, metadata: PayloadMetadata) -> Self {
        Self {
            student_id: student_id.to_string(),
            overall_sqi: breakdown.overall,
            topic_scores: breakdown.topic_scores.clone(),
            concept_scores: breakdown.concept_scores.clone(),
            ranked_concepts_for_summary: breakdown.ranked_concepts.clone(),
            metadata,
        }
    }

    /// Keep only the `n` highest-priority ranked concepts.
    pub fn truncate_ranked(&mut self, n: usize) {
        self.ranked_concepts_for_summary.truncate(n);
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize summary payload")
    }

    /// Save the payload as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write payload to {}", path.display()))?;
        Ok(())
    }

    /// Load a payload from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display()))?;
        let payload: SummaryPayload =
            serde_json::from_str(&content).context("failed to parse payload JSON")?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_breakdown;
    use crate::model::StudentData;
    use crate::scoring::tests::attempt;

    fn make_payload() -> SummaryPayload {
        let mut wrong = attempt("Geometry", "Circles");
        wrong.correct = false;
        let data = StudentData {
            student_id: "S042".into(),
            attempts: vec![attempt("Algebra", "Linear"), wrong],
        };
        let breakdown = compute_breakdown(&data);
        SummaryPayload::new(
            &data.student_id,
            &breakdown,
            PayloadMetadata::from_config(&SqiConfig::default()),
        )
    }

    #[test]
    fn payload_uses_snake_case_export_keys() {
        let json = serde_json::to_value(make_payload()).unwrap();
        assert_eq!(json["student_id"], "S042");
        assert_eq!(json["overall_sqi"], 50.0);
        assert_eq!(json["topic_scores"].as_array().unwrap().len(), 2);
        assert_eq!(json["concept_scores"][1]["concept"], "Circles");
        assert_eq!(
            json["ranked_concepts_for_summary"][0]["reasons"][0],
            "Wrong earlier"
        );
        assert_eq!(json["metadata"]["diagnostic_prompt_version"], "v1");
        assert_eq!(json["metadata"]["engine"], "sqi-v0.1");
        assert!(json["metadata"]["computed_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn diagnostic_prompt_stays_out_of_json() {
        let config = SqiConfig {
            diagnostic_prompt: Some("Focus on weak concepts.".into()),
            ..SqiConfig::default()
        };
        let metadata = PayloadMetadata::from_config(&config);
        assert_eq!(
            metadata.diagnostic_prompt.as_deref(),
            Some("Focus on weak concepts.")
        );

        let json = serde_json::to_value(&metadata).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("diagnostic_prompt").is_none());
    }

    #[test]
    fn truncate_keeps_top_entries() {
        let mut payload = make_payload();
        payload.truncate_ranked(1);
        assert_eq!(payload.ranked_concepts_for_summary.len(), 1);
        assert_eq!(payload.ranked_concepts_for_summary[0].concept, "Circles");
    }

    #[test]
    fn json_roundtrip() {
        let payload = make_payload();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(DEFAULT_PAYLOAD_FILE);

        payload.save_json(&path).unwrap();
        let loaded = SummaryPayload::load_json(&path).unwrap();

        assert_eq!(loaded.student_id, "S042");
        assert_eq!(loaded.topic_scores.len(), 2);
        assert_eq!(loaded.metadata.computed_at, payload.metadata.computed_at);
    }
}
