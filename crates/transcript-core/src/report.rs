//! # Report Module
//!
//! Plain-text transcript report built from a [`Partition`].
//!
//! Unknown subjects get their own section so they are never mistaken for
//! one of the three known states.

use crate::{Decimal, JoinedSubject, Partition, TranscriptSummary};
use serde::Serialize;

/// One subject line of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub subject_code: String,
    pub subject_version_code: String,
    pub semester_name: String,
    pub credits: Decimal,
}

impl From<&JoinedSubject> for ReportLine {
    fn from(subject: &JoinedSubject) -> Self {
        Self {
            subject_code: subject.subject_code.clone(),
            subject_version_code: subject.subject_version_code.clone(),
            semester_name: subject.semester_name.clone(),
            credits: subject.credits,
        }
    }
}

impl ReportLine {
    fn render(&self) -> String {
        let code = if self.subject_code.is_empty() {
            "(no code)"
        } else {
            self.subject_code.as_str()
        };
        let mut details = vec![format!("{} cr", self.credits)];
        if !self.subject_version_code.is_empty() {
            details.push(self.subject_version_code.clone());
        }
        if !self.semester_name.is_empty() {
            details.push(self.semester_name.clone());
        }
        format!("{} [{}]", code, details.join(", "))
    }
}

/// An owned, render-ready transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptReport {
    pub passed: Vec<ReportLine>,
    pub in_progress: Vec<ReportLine>,
    pub not_passed: Vec<ReportLine>,
    pub unknown: Vec<ReportLine>,
    pub summary: TranscriptSummary,
}

impl TranscriptReport {
    /// Build a report from a partition, keeping bucket order.
    #[must_use]
    pub fn from_partition(partition: &Partition<'_>) -> Self {
        let lines = |subjects: &[&JoinedSubject]| -> Vec<ReportLine> {
            subjects.iter().map(|s| ReportLine::from(*s)).collect()
        };
        Self {
            passed: lines(&partition.passed),
            in_progress: lines(&partition.in_progress),
            not_passed: lines(&partition.not_passed),
            unknown: lines(&partition.unknown),
            summary: partition.summary(),
        }
    }

    /// Check if the report has any subject at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }

    /// Format as plain text with the standard template.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        push_section(&mut output, "PASSED", &self.passed);
        output.push_str("├─────────────────────────────────────┤\n");
        push_section(&mut output, "IN-PROGRESS", &self.in_progress);
        output.push_str("├─────────────────────────────────────┤\n");
        push_section(&mut output, "NOT PASSED", &self.not_passed);
        output.push_str("├─────────────────────────────────────┤\n");
        push_section(&mut output, "UNKNOWN (no status yet)", &self.unknown);
        output.push_str("├─────────────────────────────────────┤\n");

        let s = &self.summary;
        output.push_str("│ SUMMARY\n");
        output.push_str(&format!(
            "│ - subjects: {} total, {} passed, {} in progress, {} not passed, {} unknown\n",
            s.total, s.passed, s.in_progress, s.not_passed, s.unknown
        ));
        output.push_str(&format!(
            "│ - credits: {} earned of {} ({} in progress)\n",
            s.credits_passed, s.credits_total, s.credits_in_progress
        ));
        output.push_str("└─────────────────────────────────────┘\n");

        output
    }
}

fn push_section(output: &mut String, title: &str, lines: &[ReportLine]) {
    output.push_str(&format!("│ {} ({})\n", title, lines.len()));
    if lines.is_empty() {
        output.push_str("│ - (none)\n");
    } else {
        for line in lines {
            output.push_str(&format!("│ - {}\n", line.render()));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StatusRecord, partition};

    fn fixture() -> (Vec<JoinedSubject>, Vec<StatusRecord>) {
        let mut csd = JoinedSubject::new("1", "CSD201").with_credits(Decimal::from_int(3));
        csd.subject_version_code = "CSD201_V2".to_string();
        csd.semester_name = "Summer 2025".to_string();
        let subjects = vec![
            csd,
            JoinedSubject::new("2", "SWE201c").with_credits(Decimal::from_int(3)),
            JoinedSubject::new("3", "").with_credits(Decimal::from_int(2)),
        ];
        let records = vec![
            StatusRecord::new("1", "PASSED"),
            StatusRecord::new("2", "NOT PASSED"),
        ];
        (subjects, records)
    }

    #[test]
    fn report_keeps_buckets() {
        let (subjects, records) = fixture();
        let report = TranscriptReport::from_partition(&partition(&subjects, &records));

        assert!(!report.is_empty());
        assert_eq!(report.passed.len(), 1);
        assert_eq!(report.not_passed[0].subject_code, "SWE201c");
        assert_eq!(report.unknown.len(), 1);
        assert!(report.in_progress.is_empty());
    }

    #[test]
    fn to_text_format() {
        let (subjects, records) = fixture();
        let text = TranscriptReport::from_partition(&partition(&subjects, &records)).to_text();

        assert!(text.contains("PASSED (1)"));
        assert!(text.contains("CSD201 [3 cr, CSD201_V2, Summer 2025]"));
        assert!(text.contains("IN-PROGRESS (0)"));
        assert!(text.contains("- (none)"));
        assert!(text.contains("UNKNOWN (no status yet) (1)"));
        assert!(text.contains("(no code) [2 cr]"));
        assert!(text.contains("credits: 3 earned of 8"));
    }

    #[test]
    fn empty_report() {
        let report = TranscriptReport::from_partition(&partition(&[], &[]));
        assert!(report.is_empty());
        assert!(report.to_text().contains("0 total"));
    }
}
