use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::catalog::ArchetypeCatalog;
use crate::config::Config;
use crate::db::TimetableStore;
use crate::error::Error;

/// Shared state handed to every request handler.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn TimetableStore>,
    pub catalog: ArchetypeCatalog,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn TimetableStore>, catalog: ArchetypeCatalog) -> Self {
        Self {
            config,
            store,
            catalog,
        }
    }
}

/// JSON error body returned by the API.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl ApiErrorType {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Into<String>> From<(StatusCode, T, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, T, Option<String>)) -> Self {
        Self {
            status,
            error: error.into(),
            context,
        }
    }
}

impl From<Error> for ApiErrorType {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            ApiErrorType::from((StatusCode::BAD_REQUEST, "Invalid timetable data", Some(err.to_string())))
        } else {
            error!("request failed: {}", err);
            ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                Some(err.to_string()),
            ))
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
