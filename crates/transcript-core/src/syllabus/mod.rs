//! # Syllabus Module
//!
//! Presentation adapter for syllabus sections.
//!
//! Every section kind follows one contract:
//! - `None` or an empty list shapes to [`Shaped::Empty`]
//! - Otherwise one [`DisplayRow`] per record, in input order
//!
//! No business computation happens here. Absent values render as `"-"`.

mod sections;

pub use sections::{
    Assessment, LearningMaterial, LearningOutcome, MISSING, Session, SyllabusSection,
};

use crate::{RecordId, lenient};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// SECTION KIND
// =============================================================================

/// The four section kinds attached to a syllabus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Assessments,
    LearningMaterials,
    LearningOutcomes,
    Sessions,
}

impl SectionKind {
    /// All kinds in display order.
    pub const ALL: [Self; 4] = [
        Self::Assessments,
        Self::LearningMaterials,
        Self::LearningOutcomes,
        Self::Sessions,
    ];

    /// Human-readable section title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Assessments => "Assessments",
            Self::LearningMaterials => "Learning materials",
            Self::LearningOutcomes => "Learning outcomes",
            Self::Sessions => "Sessions",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// =============================================================================
// SHAPED OUTPUT
// =============================================================================

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// Shaped section content: the empty sentinel or the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rows", rename_all = "camelCase")]
pub enum Shaped {
    /// Nothing to show; the renderer shows its placeholder.
    Empty,
    Rows(Vec<DisplayRow>),
}

impl Shaped {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The rows, or an empty slice for the sentinel.
    #[must_use]
    pub fn rows(&self) -> &[DisplayRow] {
        match self {
            Self::Empty => &[],
            Self::Rows(rows) => rows,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().len()
    }
}

/// A shaped section with its kind and column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapedSection {
    pub kind: SectionKind,
    pub headers: &'static [&'static str],
    pub shaped: Shaped,
}

/// Shape raw section records into display rows.
#[must_use]
pub fn shape<S: SyllabusSection>(raw: Option<&[S]>) -> Shaped {
    match raw {
        None | Some([]) => Shaped::Empty,
        Some(records) => Shaped::Rows(
            records
                .iter()
                .map(|record| DisplayRow {
                    id: record.id().clone(),
                    cells: record.cells(),
                })
                .collect(),
        ),
    }
}

/// Shape raw section records, keeping the kind and headers alongside.
#[must_use]
pub fn shape_section<S: SyllabusSection>(raw: Option<&[S]>) -> ShapedSection {
    ShapedSection {
        kind: S::KIND,
        headers: S::headers(),
        shaped: shape(raw),
    }
}

// =============================================================================
// SYLLABUS DOCUMENT
// =============================================================================

/// A syllabus with all of its sections, as one snapshot.
///
/// A missing or `null` section is kept as `None`; both it and an empty list
/// shape to the same sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Syllabus {
    pub id: RecordId,
    #[serde(deserialize_with = "lenient::text")]
    pub subject_version_code: String,
    pub assessments: Option<Vec<Assessment>>,
    pub learning_materials: Option<Vec<LearningMaterial>>,
    pub learning_outcomes: Option<Vec<LearningOutcome>>,
    pub sessions: Option<Vec<Session>>,
}

impl Syllabus {
    /// Shape one section.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> ShapedSection {
        match kind {
            SectionKind::Assessments => shape_section(self.assessments.as_deref()),
            SectionKind::LearningMaterials => shape_section(self.learning_materials.as_deref()),
            SectionKind::LearningOutcomes => shape_section(self.learning_outcomes.as_deref()),
            SectionKind::Sessions => shape_section(self.sessions.as_deref()),
        }
    }

    /// Shape every section in display order.
    #[must_use]
    pub fn shape_all(&self) -> Vec<ShapedSection> {
        SectionKind::ALL.into_iter().map(|kind| self.section(kind)).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn outcome(id: &str, code: &str) -> LearningOutcome {
        LearningOutcome {
            id: RecordId::new(id),
            syllabus_id: RecordId::new("syl-1"),
            outcome_code: Some(code.to_string()),
            description: None,
        }
    }

    #[test]
    fn none_and_empty_share_the_sentinel() {
        let none = shape::<Session>(None);
        let empty = shape::<Session>(Some(&[]));
        assert_eq!(none, Shaped::Empty);
        assert_eq!(none, empty);
        assert!(none.rows().is_empty());
    }

    #[test]
    fn one_row_per_record_in_order() {
        let outcomes = vec![outcome("3", "LO3"), outcome("1", "LO1"), outcome("2", "LO2")];
        let shaped = shape(Some(outcomes.as_slice()));

        assert_eq!(shaped.len(), 3);
        let ids: Vec<&str> = shaped.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(shaped.rows()[0].cells, vec!["LO3".to_string(), MISSING.to_string()]);
    }

    #[test]
    fn cells_match_header_count() {
        let assessment = Assessment::default();
        let material = LearningMaterial::default();
        let session = Session::default();
        assert_eq!(assessment.cells().len(), Assessment::headers().len());
        assert_eq!(material.cells().len(), LearningMaterial::headers().len());
        assert_eq!(session.cells().len(), Session::headers().len());
        assert_eq!(outcome("1", "LO1").cells().len(), LearningOutcome::headers().len());
    }

    #[test]
    fn assessment_cells_format_units() {
        let assessment: Assessment = serde_json::from_str(
            r#"{"id": 4, "syllabusId": 1, "category": "Final exam", "weight": 40,
                "quantity": 1, "duration": 60, "questionType": "Multiple choice"}"#,
        )
        .unwrap();
        assert_eq!(
            assessment.cells(),
            vec!["Final exam", "40%", "1", "60 min", "Multiple choice", "-"]
        );
    }

    #[test]
    fn syllabus_document_shapes_every_section() {
        let syllabus: Syllabus = serde_json::from_str(
            r#"{
                "id": "syl-1",
                "subjectVersionCode": "PRF192_V1",
                "assessments": [],
                "learningMaterials": null,
                "learningOutcomes": [{"id": 1, "outcomeCode": "LO1", "description": "Basics"}],
                "sessions": [{"id": 10, "sessionNumber": 1, "topic": "Intro", "studentTasks": ""}]
            }"#,
        )
        .unwrap();

        let sections = syllabus.shape_all();
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());

        assert!(sections[0].shaped.is_empty());
        assert!(sections[1].shaped.is_empty());
        assert_eq!(sections[2].shaped.len(), 1);
        assert_eq!(
            sections[3].shaped.rows()[0].cells,
            vec!["1", "Intro", "-", "-", "-"]
        );
    }

    #[test]
    fn missing_sections_are_none() {
        let syllabus: Syllabus = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert!(syllabus.sessions.is_none());
        assert!(syllabus.section(SectionKind::Sessions).shaped.is_empty());
    }

    #[test]
    fn sentinel_serializes_with_state_tag() {
        let json = serde_json::to_value(shape::<Assessment>(None)).unwrap();
        assert_eq!(json["state"], "empty");
    }
}
