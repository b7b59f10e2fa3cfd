//! Program use-case service.
//!
//! # Invariants
//! - Drafts are validated and trimmed before any write.
//! - Unknown course ids in a requested set never fail the call; they are
//!   logged and returned in [`ResyncOutcome::ignored`].

use crate::model::program::{Program, ProgramDraft, ProgramId};
use crate::repo::membership_repo::ResyncOutcome;
use crate::repo::program_repo::{ProgramRepository, ProgramWrite};
use crate::repo::{ListQuery, RepoResult};
use crate::service::{Page, ServiceResult};
use log::{info, warn};

/// Program service facade over repository implementations.
pub struct ProgramService<R: ProgramRepository> {
    repo: R,
}

impl<R: ProgramRepository> ProgramService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new program with its initial courses.
    pub fn create_program(&self, draft: ProgramDraft) -> ServiceResult<ProgramWrite> {
        let draft = draft.normalized()?;
        let write = self.repo.create_program(&draft)?;
        log_resync("program_create", write.program.id, write.resync.as_ref());
        Ok(write)
    }

    pub fn get_program(&self, id: ProgramId) -> RepoResult<Option<Program>> {
        self.repo.get_program(id)
    }

    /// Lists programs by id with normalized pagination.
    pub fn list_programs(&self, offset: u32, limit: Option<u32>) -> RepoResult<Page<Program>> {
        let query = ListQuery::new(offset, limit);
        let items = self.repo.list_programs(&query)?;
        Ok(Page {
            items,
            offset,
            applied_limit: query.applied_limit(),
        })
    }

    /// Replaces program fields and optionally resyncs membership.
    ///
    /// `Ok(None)` when the program is unknown.
    pub fn update_program(
        &self,
        id: ProgramId,
        draft: ProgramDraft,
    ) -> ServiceResult<Option<ProgramWrite>> {
        let draft = draft.normalized()?;
        let write = self.repo.update_program(id, &draft)?;
        match &write {
            Some(write) => log_resync("program_update", id, write.resync.as_ref()),
            None => info!(
                "event=program_update module=program_service status=not_found program_id={id}"
            ),
        }
        Ok(write)
    }

    /// Deletes a program and its memberships; courses are kept.
    pub fn delete_program(&self, id: ProgramId) -> RepoResult<bool> {
        let deleted = self.repo.delete_program(id)?;
        info!(
            "event=program_delete module=program_service status={} program_id={id}",
            if deleted { "ok" } else { "not_found" }
        );
        Ok(deleted)
    }
}

fn log_resync(event: &str, id: ProgramId, resync: Option<&ResyncOutcome>) {
    let Some(resync) = resync else {
        info!("event={event} module=program_service status=ok program_id={id}");
        return;
    };

    info!(
        "event={event} module=program_service status=ok program_id={id} added={:?} removed={:?}",
        resync.added, resync.removed
    );
    if !resync.ignored.is_empty() {
        warn!(
            "event={event} module=program_service status=warn program_id={id} ignored_course_ids={:?}",
            resync.ignored
        );
    }
}
