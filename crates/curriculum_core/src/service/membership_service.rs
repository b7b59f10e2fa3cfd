//! Membership use-case service.
//!
//! # Invariants
//! - Add/remove never fail for missing referents or no-op changes; the
//!   outcome says which case happened.
//! - Resync is the only bulk mutation and is always a single set diff.

use crate::model::course::{Course, CourseId};
use crate::model::program::{Program, ProgramId};
use crate::repo::membership_repo::{MembershipOutcome, MembershipRepository, ResyncOutcome};
use crate::repo::RepoResult;
use log::info;
use std::collections::BTreeSet;

/// Membership service facade over repository implementations.
pub struct MembershipService<R: MembershipRepository> {
    repo: R,
}

impl<R: MembershipRepository> MembershipService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Links a course to a program.
    pub fn add_membership(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> RepoResult<MembershipOutcome> {
        let outcome = self.repo.add_membership(program_id, course_id)?;
        log_outcome("membership_add", program_id, course_id, outcome);
        Ok(outcome)
    }

    /// Unlinks a course from a program.
    pub fn remove_membership(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> RepoResult<MembershipOutcome> {
        let outcome = self.repo.remove_membership(program_id, course_id)?;
        log_outcome("membership_remove", program_id, course_id, outcome);
        Ok(outcome)
    }

    pub fn programs_containing(&self, course_id: CourseId) -> RepoResult<Vec<Program>> {
        self.repo.programs_containing(course_id)
    }

    /// Courses that can still be added to the program.
    ///
    /// `None` means the program does not exist.
    pub fn courses_not_in(&self, program_id: ProgramId) -> RepoResult<Option<Vec<Course>>> {
        self.repo.courses_not_in(program_id)
    }

    /// Replaces the program's membership with `target`.
    pub fn resync_memberships(
        &self,
        program_id: ProgramId,
        target: impl IntoIterator<Item = CourseId>,
    ) -> RepoResult<Option<ResyncOutcome>> {
        let target: BTreeSet<CourseId> = target.into_iter().collect();
        let outcome = self.repo.resync_memberships(program_id, &target)?;
        if let Some(outcome) = &outcome {
            info!(
                "event=membership_resync module=membership_service status=ok program_id={program_id} added={} removed={} ignored={}",
                outcome.added.len(),
                outcome.removed.len(),
                outcome.ignored.len()
            );
        }
        Ok(outcome)
    }
}

fn log_outcome(event: &str, program_id: ProgramId, course_id: CourseId, outcome: MembershipOutcome) {
    let status = match outcome {
        MembershipOutcome::Applied => "ok",
        MembershipOutcome::Unchanged => "unchanged",
        MembershipOutcome::ProgramNotFound => "program_not_found",
        MembershipOutcome::CourseNotFound => "course_not_found",
    };
    info!(
        "event={event} module=membership_service status={status} program_id={program_id} course_id={course_id}"
    );
}
