//! The `sqi compute` command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use sqi_core::config::load_config_from;
use sqi_core::engine::{SqiBreakdown, SqiEngine};
use sqi_core::model::StudentData;
use sqi_core::parser::{load_student_data, load_student_directory, validate_student_data};
use sqi_core::report::{PayloadMetadata, SummaryPayload, DEFAULT_PAYLOAD_FILE};
use sqi_core::scoring::AttemptContribution;
use sqi_report::json::{generate_json, generate_json_batch, write_json_report};
use sqi_report::markdown::write_markdown_report;

pub struct ComputeArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub top: Option<usize>,
    pub explain: bool,
    pub stdout: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: ComputeArgs) -> Result<()> {
    if let Some(top) = args.top {
        anyhow::ensure!(top >= 1, "--top must be at least 1");
    }

    let config = load_config_from(args.config.as_deref())?;
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    let format = args.format.unwrap_or_else(|| config.default_format.clone());

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown", "text"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "json" | "markdown" | "md" | "text"),
            "unknown format: '{fmt}' (expected json, markdown, text, or all)"
        );
    }

    let students: Vec<(PathBuf, StudentData)> = if args.input.is_dir() {
        let records = load_student_directory(&args.input)?;
        anyhow::ensure!(
            !records.is_empty(),
            "no valid student files found in {}",
            args.input.display()
        );
        records
    } else {
        let data = load_student_data(&args.input)
            .with_context(|| format!("failed to load {}", args.input.display()))?;
        vec![(args.input.clone(), data)]
    };

    let engine = SqiEngine::new();
    let mut computed: Vec<(SummaryPayload, SqiBreakdown)> = Vec::with_capacity(students.len());

    for (_, student) in &students {
        for w in validate_student_data(student) {
            match w.attempt_index {
                Some(i) => tracing::warn!("{} attempt {i}: {}", student.student_id, w.message),
                None => tracing::warn!("{}: {}", student.student_id, w.message),
            }
        }

        let breakdown = engine.compute(student);
        tracing::info!(
            student_id = %student.student_id,
            overall = breakdown.overall,
            "computed SQI"
        );

        if args.explain {
            eprintln!("{}", explain_table(student));
        }
        eprintln!("{}", summary_tables(&student.student_id, &breakdown));

        let mut payload = SummaryPayload::new(
            &student.student_id,
            &breakdown,
            PayloadMetadata::from_config(&config),
        );
        if let Some(top) = args.top {
            payload.truncate_ranked(top);
        }
        computed.push((payload, breakdown));
    }

    if args.stdout {
        let json = match computed.as_slice() {
            [(single, _)] => generate_json(single)?,
            many => {
                let payloads: Vec<SummaryPayload> =
                    many.iter().map(|(payload, _)| payload.clone()).collect();
                generate_json_batch(&payloads)?
            }
        };
        print!("{json}");
        return Ok(());
    }

    let dirs = output_dirs(
        &output,
        students
            .iter()
            .map(|(source, data)| (source.as_path(), data.student_id.as_str())),
    )?;

    for ((payload, breakdown), dir) in computed.iter().zip(&dirs) {
        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = dir.join(DEFAULT_PAYLOAD_FILE);
                    write_json_report(payload, &path)?;
                    eprintln!("Payload saved to: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = dir.join("summary.md");
                    write_markdown_report(payload, &path)?;
                    eprintln!("Markdown summary: {}", path.display());
                }
                "text" => {
                    println!("{}", summary_tables(&payload.student_id, breakdown));
                }
                other => anyhow::bail!("unknown format: '{other}'"),
            }
        }
    }

    Ok(())
}

/// Output directory for each student, failing if two inputs would share one.
fn output_dirs<'a>(
    output: &Path,
    students: impl IntoIterator<Item = (&'a Path, &'a str)>,
) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<String, &Path> = HashMap::new();
    let mut dirs = Vec::new();
    for (source, student_id) in students {
        let stem = file_stem(student_id);
        if let Some(first) = claimed.insert(stem.clone(), source) {
            anyhow::bail!(
                "{} and {} would both write to {} (student_id '{}'); \
                 give each file a distinct student_id or use --stdout",
                first.display(),
                source.display(),
                output.join(&stem).display(),
                student_id
            );
        }
        dirs.push(output.join(stem));
    }
    Ok(dirs)
}

/// Turn a student ID into a safe directory name.
fn file_stem(student_id: &str) -> String {
    let stem: String = student_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "student".to_string()
    } else {
        stem
    }
}

fn summary_tables(student_id: &str, breakdown: &SqiBreakdown) -> String {
    let mut topics = Table::new();
    topics.set_header(vec!["Topic", "SQI", "Attempts"]);
    for t in &breakdown.topic_scores {
        topics.add_row(vec![
            Cell::new(&t.topic),
            Cell::new(format!("{:.2}", t.sqi)),
            Cell::new(t.attempt_count),
        ]);
    }

    let mut ranked = Table::new();
    ranked.set_header(vec!["Rank", "Topic", "Concept", "Weight", "Reasons"]);
    for (i, r) in breakdown.ranked_concepts.iter().enumerate() {
        let reasons: Vec<&str> = r.reasons.iter().map(|reason| reason.label()).collect();
        ranked.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.topic),
            Cell::new(&r.concept),
            Cell::new(format!("{:.2}", r.weight)),
            Cell::new(reasons.join(", ")),
        ]);
    }

    format!(
        "\nStudent {student_id}: overall SQI {:.2}\n{topics}\nRanked concepts for summary:\n{ranked}",
        breakdown.overall
    )
}

fn explain_table(student: &StudentData) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Topic",
        "Concept",
        "Correct",
        "Weighted",
        "Max",
        "Time ratio",
        "Time x",
        "Review x",
        "Bonus",
    ]);
    for (i, attempt) in student.attempts.iter().enumerate() {
        let c = AttemptContribution::compute(attempt);
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&attempt.topic),
            Cell::new(&attempt.concept),
            Cell::new(if attempt.correct { "yes" } else { "no" }),
            Cell::new(format!("{:.3}", c.weighted)),
            Cell::new(format!("{:.3}", c.max_base)),
            Cell::new(format!("{:.2}", c.time_ratio)),
            Cell::new(format!("{:.1}", c.time_penalty)),
            Cell::new(format!("{:.1}", c.review_penalty)),
            Cell::new(format!("{:.2}", c.revisit_bonus)),
        ]);
    }
    table
}
