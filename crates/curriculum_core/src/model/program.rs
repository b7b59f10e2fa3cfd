//! Educational program domain model.
//!
//! # Invariants
//! - `name` is never blank once persisted.
//! - `courses` holds each member course once, ordered by course id.

use super::course::{Course, CourseId};
use super::{normalize_description, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Store-assigned program identifier.
pub type ProgramId = i64;

/// Persisted program record joined with its member courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub description: Option<String>,
    pub total_duration_weeks: u32,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Program {
    /// Identifiers of the member courses.
    pub fn course_ids(&self) -> BTreeSet<CourseId> {
        self.courses.iter().map(|course| course.id).collect()
    }

    pub fn contains_course(&self, course_id: CourseId) -> bool {
        self.courses.iter().any(|course| course.id == course_id)
    }

    /// Sum of `total_hours` across member courses.
    pub fn total_hours(&self) -> u64 {
        self.courses
            .iter()
            .map(|course| u64::from(course.total_hours))
            .sum()
    }
}

/// Write model for program create and full-replace update.
///
/// `course_ids` semantics:
/// - create: `None` and `Some(vec![])` both mean "no courses".
/// - update: `None` leaves membership untouched; `Some(ids)` resyncs the
///   membership to exactly the known courses in `ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_duration_weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_ids: Option<Vec<CourseId>>,
}

impl ProgramDraft {
    pub fn new(name: impl Into<String>, total_duration_weeks: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            total_duration_weeks,
            course_ids: None,
        }
    }

    /// Sets the target course set.
    pub fn with_courses(mut self, course_ids: impl IntoIterator<Item = CourseId>) -> Self {
        self.course_ids = Some(course_ids.into_iter().collect());
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankProgramName);
        }
        Ok(())
    }

    /// Validates and returns the draft with trimmed text fields.
    pub fn normalized(self) -> Result<Self, ModelValidationError> {
        self.validate()?;
        Ok(Self {
            name: self.name.trim().to_string(),
            description: normalize_description(self.description),
            ..self
        })
    }

    /// Deduplicated target course set, if one was given.
    pub fn target_course_ids(&self) -> Option<BTreeSet<CourseId>> {
        self.course_ids
            .as_ref()
            .map(|ids| ids.iter().copied().collect())
    }
}
