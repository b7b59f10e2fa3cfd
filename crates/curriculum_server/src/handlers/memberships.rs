//! Single-pair membership handlers and the available-courses query.

use axum::extract::{Path, State};
use axum::Json;
use curriculum_core::{
    Course, CourseId, MembershipOutcome, MembershipService, ProgramId,
    SqliteMembershipRepository,
};
use rusqlite::Connection;

use crate::error::ApiError;
use crate::schema::MessageResponse;
use crate::state::AppState;

fn membership_service(
    conn: &Connection,
) -> Result<MembershipService<SqliteMembershipRepository<'_>>, ApiError> {
    Ok(MembershipService::new(SqliteMembershipRepository::try_new(conn)?))
}

/// Maps a non-applied outcome to the matching error.
fn outcome_error(
    outcome: MembershipOutcome,
    program_id: ProgramId,
    course_id: CourseId,
    unchanged: &str,
) -> ApiError {
    match outcome {
        MembershipOutcome::ProgramNotFound => ApiError::program_not_found(program_id),
        MembershipOutcome::CourseNotFound => ApiError::course_not_found(course_id),
        MembershipOutcome::Unchanged | MembershipOutcome::Applied => ApiError::Conflict(format!(
            "course {course_id} {unchanged} program {program_id}"
        )),
    }
}

/// `POST /programs/{id}/courses/{course_id}`
pub async fn add_course(
    State(state): State<AppState>,
    Path((program_id, course_id)): Path<(ProgramId, CourseId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state
        .with_conn(|conn| Ok(membership_service(conn)?.add_membership(program_id, course_id)?))
        .await?;
    if !outcome.is_applied() {
        return Err(outcome_error(
            outcome,
            program_id,
            course_id,
            "is already in",
        ));
    }
    Ok(Json(MessageResponse::new("course added to program")))
}

/// `DELETE /programs/{id}/courses/{course_id}`
pub async fn remove_course(
    State(state): State<AppState>,
    Path((program_id, course_id)): Path<(ProgramId, CourseId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state
        .with_conn(|conn| {
            Ok(membership_service(conn)?.remove_membership(program_id, course_id)?)
        })
        .await?;
    if !outcome.is_applied() {
        return Err(outcome_error(outcome, program_id, course_id, "is not in"));
    }
    Ok(Json(MessageResponse::new("course removed from program")))
}

/// `GET /programs/{id}/available-courses`
///
/// Courses that could still be added to the program.
pub async fn available_courses(
    State(state): State<AppState>,
    Path(program_id): Path<ProgramId>,
) -> Result<Json<Vec<Course>>, ApiError> {
    state
        .with_conn(|conn| Ok(membership_service(conn)?.courses_not_in(program_id)?))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::program_not_found(program_id))
}
