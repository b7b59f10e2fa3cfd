//! Program handlers (CRUD with bulk membership resync).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use curriculum_core::{Program, ProgramDraft, ProgramId, ProgramService, SqliteProgramRepository};
use rusqlite::Connection;

use crate::error::ApiError;
use crate::schema::Pagination;
use crate::state::AppState;

fn program_service(
    conn: &Connection,
) -> Result<ProgramService<SqliteProgramRepository<'_>>, ApiError> {
    Ok(ProgramService::new(SqliteProgramRepository::try_new(conn)?))
}

/// `POST /programs`
///
/// Unknown ids in `course_ids` are skipped.
pub async fn create_program(
    State(state): State<AppState>,
    body: Result<Json<ProgramDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Program>), ApiError> {
    let Json(draft) = body?;
    let write = state
        .with_conn(|conn| Ok(program_service(conn)?.create_program(draft)?))
        .await?;
    Ok((StatusCode::CREATED, Json(write.program)))
}

/// `GET /programs?skip=&limit=`
pub async fn list_programs(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Program>>, ApiError> {
    let page = state
        .with_conn(|conn| Ok(program_service(conn)?.list_programs(page.skip, page.limit)?))
        .await?;
    Ok(Json(page.items))
}

/// `GET /programs/{id}`
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<ProgramId>,
) -> Result<Json<Program>, ApiError> {
    state
        .with_conn(|conn| program_service(conn)?.get_program(id).map_err(ApiError::from))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::program_not_found(id))
}

/// `PUT /programs/{id}`
///
/// Replaces the scalar fields. Membership is resynced only when the body
/// carries `course_ids`.
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<ProgramId>,
    body: Result<Json<ProgramDraft>, JsonRejection>,
) -> Result<Json<Program>, ApiError> {
    let Json(draft) = body?;
    state
        .with_conn(|conn| Ok(program_service(conn)?.update_program(id, draft)?))
        .await?
        .map(|write| Json(write.program))
        .ok_or_else(|| ApiError::program_not_found(id))
}

/// `DELETE /programs/{id}`
///
/// Member courses are left intact.
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<ProgramId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .with_conn(|conn| Ok(program_service(conn)?.delete_program(id)?))
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::program_not_found(id))
    }
}
