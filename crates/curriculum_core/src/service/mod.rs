//! Core use-case services.
//!
//! # Responsibility
//! - Validate drafts and normalize pagination before calling repositories.
//! - Emit one structured log event per mutation.
//! - Keep HTTP/CLI layers decoupled from storage details.

use crate::model::ModelValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course_service;
pub mod membership_service;
pub mod program_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for course/program/membership use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Draft failed field-level validation.
    Validation(ModelValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ModelValidationError> for ServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// A page of list results with the limit that was actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: u32,
    pub applied_limit: u32,
}
