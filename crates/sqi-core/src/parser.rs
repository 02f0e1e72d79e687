//! Student data JSON parser.
//!
//! Loads student attempt records from JSON text, files, and directories, and
//! checks them for data-quality issues the engine would silently absorb.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::LoadError;
use crate::model::{Attempt, StudentData};

/// Parse a JSON string into a `StudentData`.
///
/// The record must carry a non-empty string `student_id` and an `attempts`
/// array whose elements all match the attempt shape.
pub fn parse_student_data_str(content: &str) -> Result<StudentData, LoadError> {
    let value: Value = serde_json::from_str(content)?;

    let Value::Object(mut record) = value else {
        return Err(LoadError::InvalidSchema(
            "top-level value must be an object".into(),
        ));
    };

    let student_id = match record.remove("student_id") {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::String(_)) => {
            return Err(LoadError::InvalidSchema("student_id is empty".into()))
        }
        Some(_) => {
            return Err(LoadError::InvalidSchema(
                "student_id must be a string".into(),
            ))
        }
        None => return Err(LoadError::InvalidSchema("missing student_id".into())),
    };

    let raw_attempts = match record.remove("attempts") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(LoadError::InvalidSchema(
                "attempts must be an array".into(),
            ))
        }
        None => return Err(LoadError::InvalidSchema("missing attempts".into())),
    };

    let attempts = raw_attempts
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Attempt>(item)
                .map_err(|e| LoadError::InvalidSchema(format!("attempt {i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StudentData {
        student_id,
        attempts,
    })
}

/// Parse a single JSON file into a `StudentData`.
pub fn load_student_data(path: &Path) -> Result<StudentData, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_student_data_str(&content)
}

/// Recursively list all `.json` files under a directory, sorted by path.
pub fn student_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(student_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every student record under a directory, skipping files that fail.
pub fn load_student_directory(dir: &Path) -> Result<Vec<(PathBuf, StudentData)>> {
    let mut records = Vec::new();
    for path in student_files(dir)? {
        match load_student_data(&path) {
            Ok(data) => records.push((path, data)),
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
            }
        }
    }
    Ok(records)
}

/// A data-quality warning for a loaded record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// Index of the offending attempt, if the warning is about one.
    pub attempt_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn attempt(index: usize, message: impl Into<String>) -> Self {
        Self {
            attempt_index: Some(index),
            message: message.into(),
        }
    }
}

/// Check a record for values the engine tolerates but probably shouldn't see.
pub fn validate_student_data(data: &StudentData) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if data.attempts.is_empty() {
        warnings.push(ValidationWarning {
            attempt_index: None,
            message: "no attempts recorded".into(),
        });
    }

    for (i, a) in data.attempts.iter().enumerate() {
        if a.expected_time_sec <= 0.0 {
            warnings.push(ValidationWarning::attempt(
                i,
                "expected_time_sec must be positive; time penalty disabled",
            ));
        }
        if a.marks < 0.0 {
            warnings.push(ValidationWarning::attempt(i, "marks is negative"));
        }
        if a.neg_marks < 0.0 {
            warnings.push(ValidationWarning::attempt(i, "neg_marks is negative"));
        }
        if a.time_spent_sec < 0.0 {
            warnings.push(ValidationWarning::attempt(i, "time_spent_sec is negative"));
        }
        if a.revisits < 0.0 {
            warnings.push(ValidationWarning::attempt(i, "revisits is negative"));
        }
        if !a.importance.is_known() {
            warnings.push(ValidationWarning::attempt(
                i,
                format!("unrecognized importance '{}', treated as neutral", a.importance),
            ));
        }
        if !a.difficulty.is_known() {
            warnings.push(ValidationWarning::attempt(
                i,
                format!("unrecognized difficulty '{}', treated as neutral", a.difficulty),
            ));
        }
        if !a.question_type.is_known() {
            warnings.push(ValidationWarning::attempt(
                i,
                format!("unrecognized type '{}', treated as neutral", a.question_type),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Importance};

    const VALID_JSON: &str = r#"{
  "student_id": "S001",
  "attempts": [
    {
      "topic": "Algebra",
      "concept": "Linear equations",
      "importance": "A",
      "difficulty": "M",
      "type": "Theory",
      "case_based": false,
      "correct": true,
      "marks": 4,
      "neg_marks": 1,
      "expected_time_sec": 60,
      "time_spent_sec": 50,
      "marked_review": false,
      "revisits": 0
    },
    {
      "topic": "Geometry",
      "concept": "Circles",
      "importance": "B",
      "difficulty": "H",
      "type": "Practical",
      "case_based": true,
      "correct": false,
      "marks": 4,
      "neg_marks": 1,
      "expected_time_sec": 90,
      "time_spent_sec": 200,
      "marked_review": true,
      "revisits": 1
    }
  ]
}"#;

    #[test]
    fn parse_valid_json() {
        let data = parse_student_data_str(VALID_JSON).unwrap();
        assert_eq!(data.student_id, "S001");
        assert_eq!(data.attempts.len(), 2);
        assert_eq!(data.attempts[1].difficulty, Difficulty::H);
        assert!(validate_student_data(&data).is_empty());
    }

    #[test]
    fn parse_malformed_json() {
        let err = parse_student_data_str("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON format or schema."));
    }

    #[test]
    fn missing_student_id_is_schema_error() {
        let err = parse_student_data_str(r#"{"attempts": []}"#).unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("missing student_id"));
    }

    #[test]
    fn empty_student_id_is_schema_error() {
        let err = parse_student_data_str(r#"{"student_id": "", "attempts": []}"#).unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn whitespace_student_id_is_accepted() {
        let data = parse_student_data_str(r#"{"student_id": "  ", "attempts": []}"#).unwrap();
        assert_eq!(data.student_id, "  ");
    }

    #[test]
    fn fractional_revisits_are_accepted() {
        let json = VALID_JSON.replace(r#""revisits": 1"#, r#""revisits": 1.0"#);
        let data = parse_student_data_str(&json).unwrap();
        assert_eq!(data.attempts[1].revisits, 1.0);

        let mut data = data;
        data.attempts[1].revisits = -1.0;
        let warnings = validate_student_data(&data);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("revisits"));
    }

    #[test]
    fn non_array_attempts_is_schema_error() {
        let err =
            parse_student_data_str(r#"{"student_id": "S1", "attempts": {"a": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("attempts must be an array"));
    }

    #[test]
    fn bad_attempt_reports_its_index() {
        let json = r#"{"student_id": "S1", "attempts": [{"topic": "T"}]}"#;
        let err = parse_student_data_str(json).unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("attempt 0"));
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = parse_student_data_str("[]").unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn validate_flags_suspicious_values() {
        let mut data = parse_student_data_str(VALID_JSON).unwrap();
        data.attempts[0].expected_time_sec = 0.0;
        data.attempts[1].importance = Importance::Other("Z".into());
        data.attempts[1].neg_marks = -2.0;

        let warnings = validate_student_data(&data);
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0].attempt_index, Some(0));
        assert!(warnings[0].message.contains("expected_time_sec"));
        assert!(warnings.iter().any(|w| w.message.contains("'Z'")));
        assert!(warnings.iter().any(|w| w.message.contains("neg_marks")));
    }

    #[test]
    fn validate_flags_empty_record() {
        let data = StudentData {
            student_id: "S1".into(),
            attempts: vec![],
        };
        let warnings = validate_student_data(&data);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].attempt_index, None);
    }

    #[test]
    fn load_missing_file() {
        let err = load_student_data(Path::new("no/such/student.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn load_directory_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.json"), VALID_JSON).unwrap();
        std::fs::write(dir.path().join("bad.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("also-good.json"), VALID_JSON).unwrap();

        assert_eq!(student_files(dir.path()).unwrap().len(), 3);
        let records = load_student_directory(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|(_, d)| d.student_id == "S001"));
    }
}
