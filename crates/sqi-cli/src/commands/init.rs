//! The `sqi init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("sqi.toml").exists() {
        println!("sqi.toml already exists, skipping.");
    } else {
        std::fs::write("sqi.toml", SAMPLE_CONFIG)?;
        println!("Created sqi.toml");
    }

    std::fs::create_dir_all("sample-data")?;
    let sample_path = Path::new("sample-data/student.json");
    if sample_path.exists() {
        println!("sample-data/student.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_STUDENT)?;
        println!("Created sample-data/student.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: sqi validate --input sample-data/student.json");
    println!("  2. Run: sqi compute --input sample-data/student.json");
    println!("  3. Drop more student files into sample-data/ and pass the directory");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# sqi configuration

diagnostic_prompt_version = "v1"
engine = "sqi-v0.1"
output_dir = "./sqi-results"

# json, markdown, text, or a comma-separated mix; "all" writes every format
default_format = "json"

# Optional: keep the diagnostic prompt text next to its version tag.
# diagnostic_prompt = "${SQI_DIAGNOSTIC_PROMPT}"
"#;

const SAMPLE_STUDENT: &str = r#"{
  "student_id": "S100",
  "attempts": [
    {
      "topic": "Algebra",
      "concept": "Linear equations",
      "importance": "A",
      "difficulty": "M",
      "type": "Theory",
      "correct": true,
      "marks": 4,
      "neg_marks": 1,
      "expected_time_sec": 60,
      "time_spent_sec": 55
    },
    {
      "topic": "Algebra",
      "concept": "Quadratic equations",
      "importance": "A",
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
    },
    {
      "topic": "Geometry",
      "concept": "Circles",
      "importance": "B",
      "difficulty": "E",
      "type": "Theory",
      "correct": true,
      "marks": 2,
      "neg_marks": 0,
      "expected_time_sec": 45,
      "time_spent_sec": 40,
      "revisits": 1
    }
  ]
}
"#;
