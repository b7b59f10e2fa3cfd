//! Domain model for courses, programs and their membership.
//!
//! # Responsibility
//! - Define the canonical read models (`Course`, `Program`) returned by the
//!   store and the write models (`CourseDraft`, `ProgramDraft`) accepted by it.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - A `Program` read model lists its courses ordered by course id.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course;
pub mod program;

/// Field-level validation failure for drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Course title is empty after trimming.
    BlankCourseTitle,
    /// Program name is empty after trimming.
    BlankProgramName,
    /// Difficulty label is not one of the known levels.
    UnknownDifficulty(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCourseTitle => write!(f, "course title must not be blank"),
            Self::BlankProgramName => write!(f, "program name must not be blank"),
            Self::UnknownDifficulty(value) => write!(
                f,
                "unknown difficulty `{value}`; expected beginner|intermediate|advanced"
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Trims optional free text and collapses blank values to `None`.
pub(crate) fn normalize_description(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
