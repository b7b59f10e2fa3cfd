//! Course use-case service.
//!
//! # Invariants
//! - Drafts are validated and trimmed before any write.
//! - Deleting a course always cascades through the repository; the service
//!   never deletes membership on its own.

use crate::model::course::{Course, CourseDraft, CourseId};
use crate::repo::course_repo::CourseRepository;
use crate::repo::{ListQuery, RepoResult};
use crate::service::{Page, ServiceResult};
use log::{info, warn};

/// Course service facade over repository implementations.
pub struct CourseService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> CourseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new course.
    pub fn create_course(&self, draft: CourseDraft) -> ServiceResult<Course> {
        let draft = draft.normalized()?;
        warn_on_inconsistent_hours(&draft, None);
        let course = self.repo.create_course(&draft)?;
        info!(
            "event=course_create module=course_service status=ok course_id={}",
            course.id
        );
        Ok(course)
    }

    pub fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        self.repo.get_course(id)
    }

    /// Lists courses by id with normalized pagination.
    pub fn list_courses(&self, offset: u32, limit: Option<u32>) -> RepoResult<Page<Course>> {
        let query = ListQuery::new(offset, limit);
        let items = self.repo.list_courses(&query)?;
        Ok(Page {
            items,
            offset,
            applied_limit: query.applied_limit(),
        })
    }

    /// Replaces every mutable field. `Ok(None)` when the course is unknown.
    pub fn update_course(&self, id: CourseId, draft: CourseDraft) -> ServiceResult<Option<Course>> {
        let draft = draft.normalized()?;
        warn_on_inconsistent_hours(&draft, Some(id));
        let updated = self.repo.update_course(id, &draft)?;
        match &updated {
            Some(_) => info!("event=course_update module=course_service status=ok course_id={id}"),
            None => info!(
                "event=course_update module=course_service status=not_found course_id={id}"
            ),
        }
        Ok(updated)
    }

    /// Deletes a course and all its memberships. `false` when unknown.
    pub fn delete_course(&self, id: CourseId) -> RepoResult<bool> {
        let deleted = self.repo.delete_course(id)?;
        info!(
            "event=course_delete module=course_service status={} course_id={id}",
            if deleted { "ok" } else { "not_found" }
        );
        Ok(deleted)
    }
}

fn warn_on_inconsistent_hours(draft: &CourseDraft, id: Option<CourseId>) {
    if draft.has_consistent_hours() {
        return;
    }
    warn!(
        "event=course_hours_inconsistent module=course_service status=warn course_id={} total_hours={} scheduled_hours={}",
        id.map_or_else(|| "new".to_string(), |value| value.to_string()),
        draft.total_hours,
        draft.scheduled_hours()
    );
}
