//! JSON payload output.
//!
//! Pretty-printed with two-space indentation, the shape the summary
//! customizer reads.

use std::path::Path;

use anyhow::Result;

use sqi_core::report::SummaryPayload;

/// Render one payload as pretty JSON with a trailing newline.
pub fn generate_json(payload: &SummaryPayload) -> Result<String> {
    let mut json = payload.to_json_pretty()?;
    json.push('\n');
    Ok(json)
}

/// Render several payloads as one pretty JSON array.
pub fn generate_json_batch(payloads: &[SummaryPayload]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(payloads)?;
    json.push('\n');
    Ok(json)
}

/// Write a payload to a JSON file.
pub fn write_json_report(payload: &SummaryPayload, path: &Path) -> Result<()> {
    payload.save_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tests::make_test_payload;

    #[test]
    fn json_is_two_space_indented() {
        let json = generate_json(&make_test_payload()).unwrap();
        assert!(json.starts_with("{\n  \"student_id\": \"S001\""));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn batch_is_an_array() {
        let payloads = vec![make_test_payload(), make_test_payload()];
        let json = generate_json_batch(&payloads).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn json_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");

        write_json_report(&make_test_payload(), &path).unwrap();
        let loaded = SummaryPayload::load_json(&path).unwrap();
        assert_eq!(loaded.student_id, "S001");
    }
}
