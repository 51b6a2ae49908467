//! # CLI Module
//!
//! Command definitions and handlers.
//!
//! Every handler reads its JSON snapshots, runs the core, and writes either
//! human-readable text or JSON to the given writer. Handlers take the
//! resolved [`AppConfig`] explicitly; there is no global state.

use crate::config::AppConfig;
use crate::error::CliError;
use crate::output::render_table;
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use transcript_core::{
    AssessmentItem, JoinedSubject, JoinedSubjectId, SectionKind, ShapedSection, StatusRecord,
    Syllabus, TranscriptReport, WeightCheck, check_weights, classify,
    compute_final_grade_with_precision, partition,
};

// =============================================================================
// COMMAND LINE
// =============================================================================

/// Transcript grade and status calculator.
#[derive(Debug, Parser)]
#[command(name = "transcript", version, about)]
pub struct Cli {
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML).
    #[arg(long, global = true, env = "TRANSCRIPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log more.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the weighted final grade of an assessment set.
    Grade {
        /// JSON array of assessment items.
        items: PathBuf,
    },

    /// Show whether assessment weights add up to 100.
    CheckWeights {
        /// JSON array of assessment items.
        items: PathBuf,
    },

    /// Look up the status of one joined subject.
    Classify {
        /// JSON array of status records.
        statuses: PathBuf,

        /// Joined subject id.
        #[arg(long)]
        subject: String,
    },

    /// Partition joined subjects by status and summarise them.
    Transcript {
        /// JSON array of joined subjects.
        #[arg(long)]
        subjects: PathBuf,

        /// JSON array of status records.
        #[arg(long)]
        statuses: PathBuf,

        /// Group subjects by semester.
        #[arg(long)]
        by_semester: bool,
    },

    /// Shape the sections of a syllabus for display.
    Syllabus {
        /// JSON syllabus document.
        file: PathBuf,

        /// Only this section.
        #[arg(long, value_enum)]
        section: Option<SectionArg>,
    },
}

/// Section selector for `syllabus --section`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    Assessments,
    Materials,
    Outcomes,
    Sessions,
}

impl From<SectionArg> for SectionKind {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Assessments => Self::Assessments,
            SectionArg::Materials => Self::LearningMaterials,
            SectionArg::Outcomes => Self::LearningOutcomes,
            SectionArg::Sessions => Self::Sessions,
        }
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli, config: &AppConfig, out: &mut dyn Write) -> Result<(), CliError> {
    match &cli.command {
        Commands::Grade { items } => cmd_grade(config, items, cli.json, out),
        Commands::CheckWeights { items } => cmd_check_weights(items, cli.json, out),
        Commands::Classify { statuses, subject } => {
            cmd_classify(statuses, subject, cli.json, out)
        }
        Commands::Transcript {
            subjects,
            statuses,
            by_semester,
        } => cmd_transcript(subjects, statuses, *by_semester, cli.json, out),
        Commands::Syllabus { file, section } => {
            cmd_syllabus(config, file, section.map(SectionKind::from), cli.json, out)
        }
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// Read and deserialize a JSON snapshot file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "loaded snapshot");
    Ok(value)
}

fn write_json(out: &mut dyn Write, value: &impl serde::Serialize) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// GRADE
// =============================================================================

/// `transcript grade <ITEMS>`
pub fn cmd_grade(
    config: &AppConfig,
    items_path: &Path,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let items: Vec<AssessmentItem> = load_json(items_path)?;
    let grade = compute_final_grade_with_precision(&items, config.grading.decimals);
    let check = check_weights(&items);

    info!(items = items.len(), %grade, "computed final grade");
    if let WeightCheck::Discrepancy { total } = check {
        warn!(%total, "assessment weights do not add up to 100");
    }

    if json {
        return write_json(
            out,
            &json!({
                "grade": grade,
                "items": items.len(),
                "weightTotal": check.total(),
                "weightCheck": check,
            }),
        );
    }

    writeln!(out, "Final grade: {}%", grade)?;
    if let WeightCheck::Discrepancy { total } = check {
        writeln!(out, "Note: weights total {} (expected 100)", total)?;
    }
    Ok(())
}

/// `transcript check-weights <ITEMS>`
pub fn cmd_check_weights(items_path: &Path, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let items: Vec<AssessmentItem> = load_json(items_path)?;
    let check = check_weights(&items);

    if json {
        return write_json(out, &json!({ "total": check.total(), "check": check }));
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            let category = if item.category.is_empty() {
                "-".to_string()
            } else {
                item.category.clone()
            };
            vec![category, format!("{}%", item.weight)]
        })
        .collect();
    out.write_all(render_table(&["Category", "Weight"], &rows).as_bytes())?;

    match check {
        WeightCheck::Balanced => writeln!(out, "Weight total: 100 (balanced)")?,
        WeightCheck::Discrepancy { total } => {
            writeln!(out, "Weight total: {} (discrepancy, expected 100)", total)?;
        }
    }
    Ok(())
}

// =============================================================================
// CLASSIFY
// =============================================================================

/// `transcript classify <STATUSES> --subject <ID>`
pub fn cmd_classify(
    statuses_path: &Path,
    subject: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let id = JoinedSubjectId::new(subject.trim());
    if id.is_empty() {
        return Err(CliError::InvalidArgument("--subject must not be empty".to_string()));
    }

    let records: Vec<StatusRecord> = load_json(statuses_path)?;
    let status = classify(&id, &records);
    debug!(subject = %id, ?status, records = records.len(), "classified subject");

    if json {
        return write_json(out, &json!({ "joinedSubjectId": id, "status": status }));
    }

    match status {
        Some(status) => writeln!(out, "{}", status)?,
        None => writeln!(out, "UNKNOWN")?,
    }
    Ok(())
}

// =============================================================================
// TRANSCRIPT
// =============================================================================

/// `transcript transcript --subjects <F> --statuses <F> [--by-semester]`
pub fn cmd_transcript(
    subjects_path: &Path,
    statuses_path: &Path,
    by_semester: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let subjects: Vec<JoinedSubject> = load_json(subjects_path)?;
    let records: Vec<StatusRecord> = load_json(statuses_path)?;

    let partition = partition(&subjects, &records);
    let summary = partition.summary();
    info!(
        total = summary.total,
        passed = summary.passed,
        in_progress = summary.in_progress,
        not_passed = summary.not_passed,
        "partitioned transcript"
    );
    if summary.unknown > 0 {
        warn!(count = summary.unknown, "subjects without a recognised status");
    }

    if json {
        return if by_semester {
            write_json(
                out,
                &json!({ "summary": summary, "semesters": partition.by_semester() }),
            )
        } else {
            write_json(out, &json!({ "summary": summary, "partition": partition }))
        };
    }

    if !by_semester {
        let report = TranscriptReport::from_partition(&partition);
        out.write_all(report.to_text().as_bytes())?;
        return Ok(());
    }

    for group in partition.by_semester() {
        let name = if group.semester_name.is_empty() {
            "(no semester)"
        } else {
            group.semester_name
        };
        writeln!(out, "== {} ==", name)?;

        let rows: Vec<Vec<String>> = group
            .subjects
            .iter()
            .map(|entry| {
                vec![
                    entry.subject.subject_code.clone(),
                    entry.subject.subject_version_code.clone(),
                    entry.subject.credits.to_string(),
                    entry
                        .status
                        .map_or_else(|| "UNKNOWN".to_string(), |s| s.to_string()),
                ]
            })
            .collect();
        out.write_all(render_table(&["Code", "Version", "Credits", "Status"], &rows).as_bytes())?;
        writeln!(out, "Credits earned: {}", group.credits_passed())?;
        writeln!(out)?;
    }
    writeln!(
        out,
        "Total: {} earned of {} credits",
        summary.credits_passed, summary.credits_total
    )?;
    Ok(())
}

// =============================================================================
// SYLLABUS
// =============================================================================

/// `transcript syllabus <FILE> [--section <KIND>]`
pub fn cmd_syllabus(
    config: &AppConfig,
    file: &Path,
    section: Option<SectionKind>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let syllabus: Syllabus = load_json(file)?;
    let sections: Vec<ShapedSection> = match section {
        Some(kind) => vec![syllabus.section(kind)],
        None => syllabus.shape_all(),
    };
    debug!(syllabus = %syllabus.id, sections = sections.len(), "shaped syllabus");

    if json {
        return write_json(out, &sections);
    }

    if !syllabus.subject_version_code.is_empty() {
        writeln!(out, "Syllabus {}", syllabus.subject_version_code)?;
        writeln!(out)?;
    }
    for section in &sections {
        writeln!(out, "== {} ({}) ==", section.kind, section.shaped.len())?;
        if section.shaped.is_empty() {
            writeln!(out, "{}", config.display.empty_placeholder)?;
        } else {
            let rows: Vec<Vec<String>> = section
                .shaped
                .rows()
                .iter()
                .map(|row| row.cells.clone())
                .collect();
            out.write_all(render_table(section.headers, &rows).as_bytes())?;
        }
        writeln!(out)?;
    }
    Ok(())
}
