use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{semesters, status, subjects};

mod endpoints;
mod types;

pub use types::{ApiErrorType, AppState};

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let subject_router = Router::new()
        .route("/subjects", post(subjects::post_subject))
        .route("/subjects/random", get(subjects::get_random_subject))
        .route(
            "/subjects/random/:year/:semester",
            get(subjects::get_random_offering),
        )
        .route(
            "/subjects/:year/:semester",
            get(subjects::get_semester_subjects),
        )
        .route("/subjects/:year/:semester/:name", get(subjects::get_subject));

    let semester_router = Router::new()
        .route("/semesters", post(semesters::post_semester))
        .route("/semesters/active", get(semesters::get_active_semesters))
        .route("/semesters/:year/:semester", get(semesters::get_semester));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(subject_router)
        .merge(semester_router)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::endpoints::test_support::state;

    #[test]
    fn test_router_creation() {
        let _router = create_router(state());
    }
}
