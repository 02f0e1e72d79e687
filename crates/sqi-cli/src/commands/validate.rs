//! The `sqi validate` command.

use std::path::PathBuf;

use anyhow::Result;

use sqi_core::parser::{load_student_data, student_files, validate_student_data};

pub fn execute(input: PathBuf) -> Result<()> {
    let files = if input.is_dir() {
        student_files(&input)?
    } else {
        vec![input]
    };
    anyhow::ensure!(!files.is_empty(), "no .json student files found");

    let mut total_warnings = 0;
    let mut failed = 0;

    for path in &files {
        let data = match load_student_data(path) {
            Ok(data) => data,
            Err(e) => {
                println!("{}: ERROR: {e}", path.display());
                failed += 1;
                continue;
            }
        };

        println!(
            "Student: {} ({} attempts) [{}]",
            data.student_id,
            data.attempts.len(),
            path.display()
        );

        let warnings = validate_student_data(&data);
        for w in &warnings {
            let prefix = w
                .attempt_index
                .map(|i| format!("  [attempt {i}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) failed to load", files.len());
    }

    if total_warnings == 0 {
        println!("All student files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
