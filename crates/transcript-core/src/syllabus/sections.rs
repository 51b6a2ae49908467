//! The four syllabus section record types.

use crate::{Decimal, RecordId, lenient};
use serde::{Deserialize, Serialize};

use super::SectionKind;

/// Placeholder cell for an absent value.
pub const MISSING: &str = "-";

/// A record type that can be shaped into display rows.
pub trait SyllabusSection {
    /// Which section this record belongs to.
    const KIND: SectionKind;

    /// Column headers, in cell order.
    fn headers() -> &'static [&'static str];

    /// Record id, used as the row key.
    fn id(&self) -> &RecordId;

    /// One cell per header.
    fn cells(&self) -> Vec<String>;
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

fn opt_count(value: Option<u32>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

// =============================================================================
// ASSESSMENT
// =============================================================================

/// A planned assessment component of a syllabus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assessment {
    pub id: RecordId,
    pub syllabus_id: RecordId,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub category: Option<String>,
    /// Weight as a percentage (0-100).
    pub weight: Decimal,
    #[serde(deserialize_with = "lenient::count_opt")]
    pub quantity: Option<u32>,
    /// Duration in minutes.
    #[serde(deserialize_with = "lenient::count_opt")]
    pub duration: Option<u32>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub question_type: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub completion_criteria: Option<String>,
}

impl SyllabusSection for Assessment {
    const KIND: SectionKind = SectionKind::Assessments;

    fn headers() -> &'static [&'static str] {
        &["Category", "Weight", "Quantity", "Duration", "Question type", "Completion criteria"]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            opt(self.category.as_deref()),
            format!("{}%", self.weight),
            opt_count(self.quantity),
            self.duration.map_or_else(|| MISSING.to_string(), |d| format!("{d} min")),
            opt(self.question_type.as_deref()),
            opt(self.completion_criteria.as_deref()),
        ]
    }
}

// =============================================================================
// LEARNING MATERIAL
// =============================================================================

/// A book or other resource listed by a syllabus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningMaterial {
    pub id: RecordId,
    pub syllabus_id: RecordId,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub material_description: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub publisher: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub published_date: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub edition: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub isbn: Option<String>,
    #[serde(deserialize_with = "lenient::flag_opt")]
    pub is_main_material: Option<bool>,
}

impl SyllabusSection for LearningMaterial {
    const KIND: SectionKind = SectionKind::LearningMaterials;

    fn headers() -> &'static [&'static str] {
        &["Description", "Author", "Publisher", "Published", "Edition", "ISBN", "Main"]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            opt(self.material_description.as_deref()),
            opt(self.author.as_deref()),
            opt(self.publisher.as_deref()),
            opt(self.published_date.as_deref()),
            opt(self.edition.as_deref()),
            opt(self.isbn.as_deref()),
            match self.is_main_material {
                Some(true) => "yes".to_string(),
                Some(false) => "no".to_string(),
                None => MISSING.to_string(),
            },
        ]
    }
}

// =============================================================================
// LEARNING OUTCOME
// =============================================================================

/// A course learning outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningOutcome {
    pub id: RecordId,
    pub syllabus_id: RecordId,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub outcome_code: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub description: Option<String>,
}

impl SyllabusSection for LearningOutcome {
    const KIND: SectionKind = SectionKind::LearningOutcomes;

    fn headers() -> &'static [&'static str] {
        &["Code", "Description"]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            opt(self.outcome_code.as_deref()),
            opt(self.description.as_deref()),
        ]
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One teaching session of a syllabus schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub id: RecordId,
    pub syllabus_id: RecordId,
    #[serde(deserialize_with = "lenient::count_opt")]
    pub session_number: Option<u32>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub topic: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub learning_teaching_type: Option<String>,
    /// Outcome codes covered, as the backend joins them (e.g. "LO1, LO2").
    #[serde(deserialize_with = "lenient::text_opt")]
    pub learning_outcomes: Option<String>,
    #[serde(deserialize_with = "lenient::text_opt")]
    pub student_tasks: Option<String>,
}

impl SyllabusSection for Session {
    const KIND: SectionKind = SectionKind::Sessions;

    fn headers() -> &'static [&'static str] {
        &["No.", "Topic", "Type", "Outcomes", "Student tasks"]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            opt_count(self.session_number),
            opt(self.topic.as_deref()),
            opt(self.learning_teaching_type.as_deref()),
            opt(self.learning_outcomes.as_deref()),
            opt(self.student_tasks.as_deref()),
        ]
    }
}
