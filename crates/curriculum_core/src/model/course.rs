//! Course domain model.
//!
//! # Invariants
//! - `title` is never blank once persisted.
//! - Hour counts are unsigned; `total_hours >= lecture_hours + practice_hours`
//!   is advisory only and checked through [`CourseDraft::has_consistent_hours`].

use super::{normalize_description, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned course identifier.
pub type CourseId = i64;

/// Difficulty level of a course.
///
/// Serialized in snake_case. Input goes through [`Difficulty::parse`] on
/// every path, so it is case-insensitive and accepts the Russian labels used
/// by the first API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All levels from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Stable storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parses a storage/wire label or one of its legacy aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "beginner" | "начальный" => Some(Self::Beginner),
            "intermediate" | "средний" => Some(Self::Intermediate),
            "advanced" | "продвинутый" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Difficulty {
    type Err = ModelValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| ModelValidationError::UnknownDifficulty(value.to_string()))
    }
}

/// Persisted course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub total_hours: u32,
    pub lecture_hours: u32,
    pub practice_hours: u32,
    pub difficulty: Difficulty,
    pub has_online: bool,
}

impl Course {
    /// Returns the mutable fields of this record as a draft.
    ///
    /// Used by callers that edit a subset of fields and send a full replace.
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            total_hours: self.total_hours,
            lecture_hours: self.lecture_hours,
            practice_hours: self.practice_hours,
            difficulty: self.difficulty,
            has_online: self.has_online,
        }
    }
}

/// Write model for course create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_hours: u32,
    #[serde(default)]
    pub lecture_hours: u32,
    #[serde(default)]
    pub practice_hours: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub has_online: bool,
}

impl CourseDraft {
    /// Creates a draft with no hour breakdown, no description and no online
    /// version.
    pub fn new(title: impl Into<String>, total_hours: u32, difficulty: Difficulty) -> Self {
        Self {
            title: title.into(),
            description: None,
            total_hours,
            lecture_hours: 0,
            practice_hours: 0,
            difficulty,
            has_online: false,
        }
    }

    /// Checks field-level rules without modifying the draft.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::BlankCourseTitle);
        }
        Ok(())
    }

    /// Validates and returns the draft with trimmed text fields.
    pub fn normalized(self) -> Result<Self, ModelValidationError> {
        self.validate()?;
        Ok(Self {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description),
            ..self
        })
    }

    /// Lecture plus practice hours, saturating on overflow.
    pub fn scheduled_hours(&self) -> u32 {
        self.lecture_hours.saturating_add(self.practice_hours)
    }

    /// Whether the breakdown fits inside `total_hours`.
    pub fn has_consistent_hours(&self) -> bool {
        self.scheduled_hours() <= self.total_hours
    }
}
