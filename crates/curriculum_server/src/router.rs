//! Router assembly for the curriculum HTTP API.
//!
//! [`build_router`] wires handlers to routes (axum 0.8 `/{param}` syntax)
//! with CORS and request tracing layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete router.
///
/// CORS is permissive. `TraceLayer` events are forwarded to the `log`
/// backend through the `tracing/log` feature.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Courses
        .route(
            "/courses",
            get(handlers::courses::list_courses).post(handlers::courses::create_course),
        )
        .route(
            "/courses/{id}",
            get(handlers::courses::get_course)
                .put(handlers::courses::update_course)
                .delete(handlers::courses::delete_course),
        )
        .route(
            "/courses/{id}/programs",
            get(handlers::courses::course_programs),
        )
        // Programs
        .route(
            "/programs",
            get(handlers::programs::list_programs).post(handlers::programs::create_program),
        )
        .route(
            "/programs/{id}",
            get(handlers::programs::get_program)
                .put(handlers::programs::update_program)
                .delete(handlers::programs::delete_program),
        )
        // Membership
        .route(
            "/programs/{id}/courses/{course_id}",
            post(handlers::memberships::add_course).delete(handlers::memberships::remove_course),
        )
        .route(
            "/programs/{id}/available-courses",
            get(handlers::memberships::available_courses),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
