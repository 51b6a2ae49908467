//! # Transcript Module
//!
//! Aggregation of joined subjects into status buckets and summary counts.
//!
//! Guarantees:
//! - Every subject lands in at most one of passed / in-progress / not-passed
//! - Subjects with unknown status land in none of them, but stay in `all`
//! - Every bucket keeps the source order; nothing is sorted
//! - Same input, same output

use crate::status::StatusIndex;
use crate::{Decimal, JoinedSubjectId, StatusRecord, SubjectStatus, lenient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// JOINED SUBJECT
// =============================================================================

/// A student's enrollment in one subject version during one semester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinedSubject {
    pub id: JoinedSubjectId,
    #[serde(deserialize_with = "lenient::text")]
    pub subject_code: String,
    #[serde(deserialize_with = "lenient::text")]
    pub subject_version_code: String,
    pub credits: Decimal,
    #[serde(deserialize_with = "lenient::text")]
    pub semester_study_block_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub semester_name: String,
}

impl JoinedSubject {
    #[must_use]
    pub fn new(id: impl Into<JoinedSubjectId>, subject_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject_code: subject_code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_credits(mut self, credits: Decimal) -> Self {
        self.credits = credits;
        self
    }

    #[must_use]
    pub fn in_semester(mut self, semester_name: impl Into<String>) -> Self {
        self.semester_name = semester_name.into();
        self
    }
}

/// A subject paired with its looked-up status (`None` = unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedSubject<'a> {
    #[serde(flatten)]
    pub subject: &'a JoinedSubject,
    pub status: Option<SubjectStatus>,
}

// =============================================================================
// PARTITION
// =============================================================================

/// Subjects split by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition<'a> {
    pub passed: Vec<&'a JoinedSubject>,
    pub in_progress: Vec<&'a JoinedSubject>,
    pub not_passed: Vec<&'a JoinedSubject>,
    /// Everything that is in progress or not passed, in source order.
    pub other: Vec<&'a JoinedSubject>,
    /// Subjects the status service has no recognised answer for.
    pub unknown: Vec<&'a JoinedSubject>,
    /// The unfiltered input with each subject's status.
    pub all: Vec<ClassifiedSubject<'a>>,
}

/// Split `subjects` by the status each one has in `records`.
#[must_use]
pub fn partition<'a>(subjects: &'a [JoinedSubject], records: &[StatusRecord]) -> Partition<'a> {
    let index = StatusIndex::new(records);
    let mut out = Partition {
        all: Vec::with_capacity(subjects.len()),
        ..Partition::default()
    };

    for subject in subjects {
        let status = index.classify(&subject.id);
        match status {
            Some(SubjectStatus::Passed) => out.passed.push(subject),
            Some(SubjectStatus::InProgress) => {
                out.in_progress.push(subject);
                out.other.push(subject);
            }
            Some(SubjectStatus::NotPassed) => {
                out.not_passed.push(subject);
                out.other.push(subject);
            }
            None => out.unknown.push(subject),
        }
        out.all.push(ClassifiedSubject { subject, status });
    }

    out
}

impl<'a> Partition<'a> {
    /// The bucket for one known status.
    #[must_use]
    pub fn bucket(&self, status: SubjectStatus) -> &[&'a JoinedSubject] {
        match status {
            SubjectStatus::Passed => &self.passed,
            SubjectStatus::InProgress => &self.in_progress,
            SubjectStatus::NotPassed => &self.not_passed,
        }
    }

    /// Counts and credit totals per bucket.
    #[must_use]
    pub fn summary(&self) -> TranscriptSummary {
        let credits =
            |subjects: &[&JoinedSubject]| -> Decimal { subjects.iter().map(|s| s.credits).sum() };
        TranscriptSummary {
            total: self.all.len(),
            passed: self.passed.len(),
            in_progress: self.in_progress.len(),
            not_passed: self.not_passed.len(),
            unknown: self.unknown.len(),
            credits_passed: credits(&self.passed),
            credits_in_progress: credits(&self.in_progress),
            credits_not_passed: credits(&self.not_passed),
            credits_total: self.all.iter().map(|c| c.subject.credits).sum(),
        }
    }

    /// Group `all` by semester name in order of first appearance.
    ///
    /// Subjects without a semester share a group with an empty name.
    #[must_use]
    pub fn by_semester(&self) -> Vec<SemesterGroup<'a>> {
        let mut groups: Vec<SemesterGroup<'a>> = Vec::new();
        let mut positions: BTreeMap<&'a str, usize> = BTreeMap::new();

        for entry in &self.all {
            let name = entry.subject.semester_name.as_str();
            let position = *positions.entry(name).or_insert_with(|| {
                groups.push(SemesterGroup {
                    semester_name: name,
                    subjects: Vec::new(),
                });
                groups.len() - 1
            });
            if let Some(group) = groups.get_mut(position) {
                group.subjects.push(*entry);
            }
        }

        groups
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Counts and credit totals of a [`Partition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSummary {
    pub total: usize,
    pub passed: usize,
    pub in_progress: usize,
    pub not_passed: usize,
    pub unknown: usize,
    pub credits_passed: Decimal,
    pub credits_in_progress: Decimal,
    pub credits_not_passed: Decimal,
    /// Credits of every subject, unknown ones included.
    pub credits_total: Decimal,
}

/// Subjects of one semester, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterGroup<'a> {
    pub semester_name: &'a str,
    pub subjects: Vec<ClassifiedSubject<'a>>,
}

impl SemesterGroup<'_> {
    /// Credits earned (passed) in this semester.
    #[must_use]
    pub fn credits_passed(&self) -> Decimal {
        self.subjects
            .iter()
            .filter(|c| c.status == Some(SubjectStatus::Passed))
            .map(|c| c.subject.credits)
            .sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================
