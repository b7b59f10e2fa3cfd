//! Course handlers (CRUD plus the reverse membership lookup).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use curriculum_core::{
    Course, CourseDraft, CourseId, CourseService, MembershipService, Program,
    SqliteCourseRepository, SqliteMembershipRepository,
};
use rusqlite::Connection;

use crate::error::ApiError;
use crate::schema::Pagination;
use crate::state::AppState;

fn course_service(conn: &Connection) -> Result<CourseService<SqliteCourseRepository<'_>>, ApiError> {
    Ok(CourseService::new(SqliteCourseRepository::try_new(conn)?))
}

/// `POST /courses`
pub async fn create_course(
    State(state): State<AppState>,
    body: Result<Json<CourseDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let Json(draft) = body?;
    let course = state
        .with_conn(|conn| Ok(course_service(conn)?.create_course(draft)?))
        .await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// `GET /courses?skip=&limit=`
pub async fn list_courses(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let page = state
        .with_conn(|conn| Ok(course_service(conn)?.list_courses(page.skip, page.limit)?))
        .await?;
    Ok(Json(page.items))
}

/// `GET /courses/{id}`
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>, ApiError> {
    state
        .with_conn(|conn| course_service(conn)?.get_course(id).map_err(ApiError::from))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::course_not_found(id))
}

/// `PUT /courses/{id}`
///
/// Full replacement of every mutable field.
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    body: Result<Json<CourseDraft>, JsonRejection>,
) -> Result<Json<Course>, ApiError> {
    let Json(draft) = body?;
    state
        .with_conn(|conn| Ok(course_service(conn)?.update_course(id, draft)?))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::course_not_found(id))
}

/// `DELETE /courses/{id}`
///
/// Removes the course from every program that contained it.
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .with_conn(|conn| Ok(course_service(conn)?.delete_course(id)?))
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::course_not_found(id))
    }
}

/// `GET /courses/{id}/programs`
pub async fn course_programs(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Vec<Program>>, ApiError> {
    let programs = state
        .with_conn(|conn| {
            if course_service(conn)?.get_course(id)?.is_none() {
                return Err(ApiError::course_not_found(id));
            }
            let memberships =
                MembershipService::new(SqliteMembershipRepository::try_new(conn)?);
            Ok(memberships.programs_containing(id)?)
        })
        .await?;
    Ok(Json(programs))
}
