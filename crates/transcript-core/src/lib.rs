//! # Transcript Core
//!
//! The deterministic Grade & Status Engine.
//!
//! Everything here is a pure function over borrowed snapshots supplied by an
//! external data-fetching layer:
//!
//! - [`assessment`] computes weighted grades from scored items.
//! - [`status`] classifies joined subjects using externally supplied status records.
//! - [`transcript`] partitions subjects into passed / in-progress / not-passed buckets.
//! - [`syllabus`] shapes syllabus sections into display rows.
//! - [`report`] renders a partition as plain text.
//!
//! ## Constraints
//!
//! - No I/O, no async, no logging
//! - No floating-point arithmetic; all numbers are [`Decimal`]
//! - Nothing fails: malformed numeric input degrades to 0

pub mod assessment;
pub mod decimal;
mod lenient;
pub mod report;
pub mod status;
pub mod syllabus;
pub mod transcript;

pub use assessment::{
    AssessmentItem, FinalGrade, WeightCheck, check_weights, compute_final_grade,
    compute_final_grade_with_precision, weight_total,
};
pub use decimal::{Decimal, DecimalError};
pub use report::TranscriptReport;
pub use status::{StatusIndex, StatusRecord, SubjectStatus, classify};
pub use syllabus::{
    DisplayRow, SectionKind, Shaped, ShapedSection, Syllabus, SyllabusSection, shape,
    shape_section,
};
pub use transcript::{
    ClassifiedSubject, JoinedSubject, Partition, SemesterGroup, TranscriptSummary, partition,
};

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Identifier of a backend record (joined subject, syllabus, section row).
///
/// The backend emits ids either as JSON strings or as integers, so both are
/// accepted and compared by their canonical string form. Whole-valued floats
/// (`1.0`) read as the integer. A missing, `null`, fractional, boolean or
/// structured id deserializes to the empty id, which never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// Identifier of a [`JoinedSubject`].
pub type JoinedSubjectId = RecordId;

impl RecordId {
    /// Create an id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id is empty (absent in the source record).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordIdVisitor;

        impl<'de> Visitor<'de> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                Ok(RecordId::new(v.trim()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                Ok(RecordId(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RecordId, E> {
                // Display never uses an exponent, so a whole value has no '.'.
                let text = v.to_string();
                if v.is_finite() && !text.contains('.') {
                    Ok(RecordId(if text == "-0" { "0".to_string() } else { text }))
                } else {
                    Ok(RecordId::default())
                }
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<RecordId, E> {
                Ok(RecordId::default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<RecordId, E> {
                Ok(RecordId::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<RecordId, E> {
                Ok(RecordId::default())
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<RecordId, D::Error> {
                RecordId::deserialize(d)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RecordId, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(RecordId::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RecordId, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(RecordId::default())
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn record_id_accepts_strings_and_integers() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"["js-1", 42, null, " 7 "]"#).unwrap();
        assert_eq!(ids[0], RecordId::new("js-1"));
        assert_eq!(ids[1], RecordId::from(42));
        assert!(ids[2].is_empty());
        assert_eq!(ids[3].as_str(), "7");
    }

    #[test]
    fn odd_id_shapes_degrade_to_the_empty_id() {
        let ids: Vec<RecordId> =
            serde_json::from_str(r#"[1.0, 2.5, true, [3], {"id": 4}, -0.0]"#).unwrap();
        assert_eq!(ids[0], RecordId::from(1));
        assert!(ids[1].is_empty());
        assert!(ids[2].is_empty());
        assert!(ids[3].is_empty());
        assert!(ids[4].is_empty());
        assert_eq!(ids[5].as_str(), "0");
    }

    #[test]
    fn one_float_id_does_not_reject_the_snapshot() {
        let subjects: Vec<JoinedSubject> = serde_json::from_str(
            r#"[
                {"id": 1.0, "subjectCode": "MAT101"},
                {"id": 2, "subjectCode": "PHY101"},
                {"id": 3.5, "subjectCode": "CHE101"}
            ]"#,
        )
        .unwrap();
        let records: Vec<StatusRecord> = serde_json::from_str(
            r#"[{"joinedSubjectId": 1, "status": "PASSED"}, {"joinedSubjectId": 2.0, "status": "NOT PASSED"}]"#,
        )
        .unwrap();

        assert_eq!(subjects.len(), 3);
        let parts = partition(&subjects, &records);
        assert_eq!(parts.passed.len(), 1);
        assert_eq!(parts.not_passed.len(), 1);
        assert_eq!(parts.unknown.len(), 1);
        assert_eq!(parts.unknown[0].subject_code, "CHE101");
    }

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        let numeric: RecordId = serde_json::from_str("15").unwrap();
        let text: RecordId = serde_json::from_str(r#""15""#).unwrap();
        assert_eq!(numeric, text);
    }
}
