//! Markdown summary generator.
//!
//! Produces a human-readable summary of a payload: overall SQI, per-topic and
//! per-concept tables, and the ranked concepts with their reasons.

use std::path::Path;

use anyhow::Result;

use sqi_core::report::SummaryPayload;

/// Escape a string for use inside a Markdown table cell.
fn cell_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', " ")
}

/// Generate a Markdown summary from a payload.
pub fn generate_markdown(payload: &SummaryPayload) -> String {
    let mut md = String::new();

    md.push_str(&format!("# SQI summary: {}\n\n", cell_escape(&payload.student_id)));
    md.push_str(&format!(
        "Engine `{}` | prompt `{}` | computed {}\n\n",
        payload.metadata.engine,
        payload.metadata.diagnostic_prompt_version,
        payload.metadata.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(prompt) = &payload.metadata.diagnostic_prompt {
        md.push_str(&format!(
            "**Diagnostic prompt ({}):**\n\n",
            payload.metadata.diagnostic_prompt_version
        ));
        for line in prompt.lines() {
            md.push_str(&format!("> {line}\n"));
        }
        md.push('\n');
    }

    md.push_str(&format!("**Overall SQI:** {:.2}\n\n", payload.overall_sqi));

    if !payload.topic_scores.is_empty() {
        md.push_str("## Topics\n\n");
        md.push_str("| Topic | SQI |\n");
        md.push_str("|-------|-----|\n");
        for t in &payload.topic_scores {
            md.push_str(&format!("| {} | {:.2} |\n", cell_escape(&t.topic), t.sqi));
        }
        md.push('\n');
    }

    if !payload.concept_scores.is_empty() {
        md.push_str("## Concepts\n\n");
        md.push_str("| Topic | Concept | SQI |\n");
        md.push_str("|-------|---------|-----|\n");
        for c in &payload.concept_scores {
            md.push_str(&format!(
                "| {} | {} | {:.2} |\n",
                cell_escape(&c.topic),
                cell_escape(&c.concept),
                c.sqi
            ));
        }
        md.push('\n');
    }

    if !payload.ranked_concepts_for_summary.is_empty() {
        md.push_str("## Ranked concepts for summary\n\n");
        md.push_str("| # | Topic | Concept | Weight | Reasons |\n");
        md.push_str("|---|-------|---------|--------|---------|\n");
        for (i, r) in payload.ranked_concepts_for_summary.iter().enumerate() {
            let reasons = if r.reasons.is_empty() {
                "-".to_string()
            } else {
                r.reasons
                    .iter()
                    .map(|reason| reason.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            md.push_str(&format!(
                "| {} | {} | {} | {:.2} | {} |\n",
                i + 1,
                cell_escape(&r.topic),
                cell_escape(&r.concept),
                r.weight,
                reasons
            ));
        }
    }

    md
}

/// Write a Markdown summary to a file.
pub fn write_markdown_report(payload: &SummaryPayload, path: &Path) -> Result<()> {
    let md = generate_markdown(payload);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}
