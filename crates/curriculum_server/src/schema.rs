//! Request and response shapes specific to the HTTP boundary.
//!
//! Domain payloads (`Course`, `CourseDraft`, `Program`, `ProgramDraft`) are
//! serialized directly from `curriculum_core`.

use serde::{Deserialize, Serialize};

/// `?skip=&limit=` query for list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// Confirmation body for membership mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
