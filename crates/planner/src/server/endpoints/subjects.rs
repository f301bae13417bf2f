use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::generator::Generator;
use crate::model::{is_subject_code, Subject, SubjectOffering};
use crate::serializer::{parse_offering, serialize_offering, serialize_subject};
use crate::server::types::{ApiErrorType, AppState};

fn random_subject(state: &AppState) -> Subject {
    Generator::new(&state.catalog).generate_subject(&mut rand::thread_rng())
}

fn random_offering(state: &AppState, year: i32, semester: u32) -> SubjectOffering {
    Generator::new(&state.catalog).generate_offering(year, semester, &mut rand::thread_rng())
}

/// GET /subjects/random
/// Returns a freshly generated subject timetable
pub async fn get_random_subject(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /subjects/random");

    match serialize_subject(&random_subject(&s)) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /subjects/random/:year/:semester
/// Returns a freshly generated subject offered in the given term
pub async fn get_random_offering(
    Path((year, semester)): Path<(i32, u32)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /subjects/random/{}/{}", year, semester);

    match serialize_offering(&random_offering(&s, year, semester)) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /subjects
/// Stores an offering, replacing the timetable of any offering with the same key
pub async fn post_subject(State(s): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let offering = match parse_offering(body) {
        Ok(offering) => offering,
        Err(e) => {
            warn!("Rejected subject upload: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    info!(
        "POST /subjects {} ({} S{})",
        offering.name(),
        offering.year(),
        offering.semester()
    );

    if !is_subject_code(offering.name()) {
        return ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "Subject name must be four upper-case letters followed by four digits",
            Some(offering.name().to_string()),
        ))
        .into_response();
    }

    let result = s
        .store
        .store_offering(&offering)
        .and_then(|_| serialize_offering(&offering));

    match result {
        Ok(value) => (StatusCode::CREATED, Json(value)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /subjects/:year/:semester
/// Returns every stored offering for a term
pub async fn get_semester_subjects(
    Path((year, semester)): Path<(i32, u32)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /subjects/{}/{}", year, semester);

    let result = s
        .store
        .offerings_for_semester(year, semester)
        .and_then(|offerings| offerings.iter().map(serialize_offering).collect::<Result<Vec<_>, _>>());

    match result {
        Ok(values) => (StatusCode::OK, Json(values)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /subjects/:year/:semester/:name
/// Returns one stored offering
pub async fn get_subject(
    Path((year, semester, name)): Path<(i32, u32, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /subjects/{}/{}/{}", year, semester, name);

    match s.store.load_offering(&name, year, semester) {
        Ok(Some(offering)) => match serialize_offering(&offering) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => ApiErrorType::from(e).into_response(),
        },
        Ok(None) => ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "Subject not found",
            Some(format!("{name} ({year} S{semester})")),
        ))
        .into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
