//! # Status Module
//!
//! Classification of joined subjects using externally supplied status records.
//!
//! The engine never derives a status itself. The status service is the
//! ground truth; this module only looks its answer up. A subject without a
//! recognised status is *unknown* (`None`), which is kept distinct from the
//! three known states and never defaulted to one of them.

use crate::{JoinedSubjectId, lenient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// SUBJECT STATUS
// =============================================================================

/// The closed set of subject states reported by the status service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubjectStatus {
    #[serde(rename = "PASSED")]
    Passed,
    #[serde(rename = "IN-PROGRESS")]
    InProgress,
    #[serde(rename = "NOT PASSED")]
    NotPassed,
}

impl SubjectStatus {
    /// All states in display order.
    pub const ALL: [Self; 3] = [Self::Passed, Self::InProgress, Self::NotPassed];

    /// The wire string, exactly as the status service sends it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::InProgress => "IN-PROGRESS",
            Self::NotPassed => "NOT PASSED",
        }
    }

    /// Match a wire string verbatim. Anything else is `None`.
    #[must_use]
    pub fn from_wire(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == status)
    }
}

impl fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STATUS RECORD
// =============================================================================

/// One answer from the status service.
///
/// `status` is kept as the raw string so that an unexpected value reads as
/// unknown instead of rejecting the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusRecord {
    pub joined_subject_id: JoinedSubjectId,
    #[serde(deserialize_with = "lenient::verbatim_text")]
    pub status: String,
}

impl StatusRecord {
    #[must_use]
    pub fn new(joined_subject_id: impl Into<JoinedSubjectId>, status: impl Into<String>) -> Self {
        Self {
            joined_subject_id: joined_subject_id.into(),
            status: status.into(),
        }
    }

    /// Parsed status, or `None` if the raw string is not a known state.
    #[must_use]
    pub fn subject_status(&self) -> Option<SubjectStatus> {
        SubjectStatus::from_wire(&self.status)
    }
}

/// Look up the status of one joined subject.
///
/// Returns the status of the FIRST record whose `joinedSubjectId` matches,
/// or `None` when there is no such record. If that first record carries an
/// unrecognised status the result is `None` as well; later records for the
/// same id are not consulted. An empty id never matches.
#[must_use]
pub fn classify(joined_subject_id: &JoinedSubjectId, records: &[StatusRecord]) -> Option<SubjectStatus> {
    if joined_subject_id.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|record| &record.joined_subject_id == joined_subject_id)
        .and_then(StatusRecord::subject_status)
}

// =============================================================================
// STATUS INDEX
// =============================================================================

/// Pre-built lookup over a set of status records.
///
/// Same answers as [`classify`], built once so that classifying many
/// subjects is not quadratic. Uses BTreeMap for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct StatusIndex<'a> {
    by_id: BTreeMap<&'a str, &'a StatusRecord>,
}

impl<'a> StatusIndex<'a> {
    /// Index `records`, keeping the first record seen for each id.
    #[must_use]
    pub fn new(records: &'a [StatusRecord]) -> Self {
        let mut by_id = BTreeMap::new();
        for record in records {
            if record.joined_subject_id.is_empty() {
                continue;
            }
            by_id.entry(record.joined_subject_id.as_str()).or_insert(record);
        }
        Self { by_id }
    }

    /// Look up the status of one joined subject.
    #[must_use]
    pub fn classify(&self, joined_subject_id: &JoinedSubjectId) -> Option<SubjectStatus> {
        self.by_id
            .get(joined_subject_id.as_str())
            .and_then(|record| record.subject_status())
    }

    /// Number of distinct subject ids with a record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn id(s: &str) -> JoinedSubjectId {
        JoinedSubjectId::new(s)
    }

    #[test]
    fn classify_without_records_is_unknown() {
        assert_eq!(classify(&id("js-1"), &[]), None);
    }

    #[test]
    fn classify_returns_matching_status() {
        let records = vec![
            StatusRecord::new("js-1", "PASSED"),
            StatusRecord::new("js-2", "IN-PROGRESS"),
            StatusRecord::new("js-3", "NOT PASSED"),
        ];
        assert_eq!(classify(&id("js-1"), &records), Some(SubjectStatus::Passed));
        assert_eq!(classify(&id("js-2"), &records), Some(SubjectStatus::InProgress));
        assert_eq!(classify(&id("js-3"), &records), Some(SubjectStatus::NotPassed));
        assert_eq!(classify(&id("js-4"), &records), None);
    }

    #[test]
    fn first_matching_record_wins() {
        let records = vec![
            StatusRecord::new("js-1", "NOT PASSED"),
            StatusRecord::new("js-1", "PASSED"),
        ];
        assert_eq!(classify(&id("js-1"), &records), Some(SubjectStatus::NotPassed));
    }

    #[test]
    fn unrecognised_first_record_is_unknown() {
        let records = vec![
            StatusRecord::new("js-1", "passed"),
            StatusRecord::new("js-1", "PASSED"),
        ];
        assert_eq!(classify(&id("js-1"), &records), None);
    }

    #[test]
    fn empty_id_never_matches() {
        let records = vec![StatusRecord::new("", "PASSED")];
        assert_eq!(classify(&id(""), &records), None);
        assert!(StatusIndex::new(&records).is_empty());
    }

    #[test]
    fn index_agrees_with_linear_lookup() {
        let records = vec![
            StatusRecord::new("a", "PASSED"),
            StatusRecord::new("b", "bogus"),
            StatusRecord::new("a", "NOT PASSED"),
            StatusRecord::new("c", "IN-PROGRESS"),
        ];
        let index = StatusIndex::new(&records);
        assert_eq!(index.len(), 3);
        for key in ["a", "b", "c", "d"] {
            assert_eq!(index.classify(&id(key)), classify(&id(key), &records));
        }
    }

    #[test]
    fn wire_strings_round_trip_through_serde() {
        let json = serde_json::to_string(&SubjectStatus::NotPassed).unwrap();
        assert_eq!(json, r#""NOT PASSED""#);
        let parsed: SubjectStatus = serde_json::from_str(r#""IN-PROGRESS""#).unwrap();
        assert_eq!(parsed, SubjectStatus::InProgress);
    }

    #[test]
    fn records_accept_numeric_ids() {
        let records: Vec<StatusRecord> =
            serde_json::from_str(r#"[{"joinedSubjectId": 12, "status": "PASSED"}]"#).unwrap();
        assert_eq!(classify(&id("12"), &records), Some(SubjectStatus::Passed));
    }

    #[test]
    fn padded_status_strings_are_unknown() {
        let records: Vec<StatusRecord> = serde_json::from_str(
            r#"[{"joinedSubjectId": 1, "status": "  PASSED\n"}, {"joinedSubjectId": 2, "status": " PASSED"}]"#,
        )
        .unwrap();
        assert_eq!(records[0].status, "  PASSED\n");
        assert_eq!(classify(&id("1"), &records), None);
        assert_eq!(classify(&id("2"), &records), None);
        assert_eq!(StatusIndex::new(&records).classify(&id("2")), None);
    }
}
