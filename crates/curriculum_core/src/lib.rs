//! Core domain logic for the curriculum service: courses, educational
//! programs, and the membership association between them.
//! This crate is the single source of truth for membership invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::course::{Course, CourseDraft, CourseId, Difficulty};
pub use model::program::{Program, ProgramDraft, ProgramId};
pub use model::ModelValidationError;
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::membership_repo::{
    plan_resync, MembershipOutcome, MembershipRepository, ResyncOutcome,
    SqliteMembershipRepository,
};
pub use repo::program_repo::{ProgramRepository, ProgramWrite, SqliteProgramRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::course_service::CourseService;
pub use service::membership_service::MembershipService;
pub use service::program_service::ProgramService;
pub use service::{Page, ServiceError, ServiceResult};

/// Minimal liveness probe, independent of any store.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
