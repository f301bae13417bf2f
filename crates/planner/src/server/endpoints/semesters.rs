use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::serializer::{parse_semester, serialize_semester};
use crate::server::types::{ApiErrorType, AppState};

/// GET /semesters/active
/// Returns every semester currently flagged active
pub async fn get_active_semesters(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /semesters/active");

    let result = s
        .store
        .active_semesters()
        .and_then(|semesters| semesters.iter().map(serialize_semester).collect::<Result<Vec<_>, _>>());

    match result {
        Ok(values) => (StatusCode::OK, Json(values)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /semesters/:year/:semester
pub async fn get_semester(
    Path((year, semester)): Path<(i32, u32)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /semesters/{}/{}", year, semester);

    match s.store.load_semester(year, semester) {
        Ok(Some(record)) => match serialize_semester(&record) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => ApiErrorType::from(e).into_response(),
        },
        Ok(None) => ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "Semester not found",
            Some(format!("{year} S{semester}")),
        ))
        .into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /semesters
/// Stores a semester and its week dates
pub async fn post_semester(State(s): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let record = match parse_semester(body) {
        Ok(record) => record,
        Err(e) => {
            warn!("Rejected semester upload: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    info!("POST /semesters {} S{}", record.year(), record.semester());

    let result = s
        .store
        .store_semester(&record)
        .and_then(|_| serialize_semester(&record));

    match result {
        Ok(value) => (StatusCode::CREATED, Json(value)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
