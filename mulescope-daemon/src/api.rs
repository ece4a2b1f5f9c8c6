//! REST routes over the project scanner.
//!
//! | Method | Path                          | Response                      |
//! |--------|-------------------------------|-------------------------------|
//! | GET    | `/`                           | welcome message               |
//! | GET    | `/health`                     | liveness                      |
//! | GET    | `/mule/flows`                 | `FlowScanReport`              |
//! | GET    | `/mule/flows/{project_name}`  | `ProjectFlows`                |
//! | GET    | `/mule/endpoints/summary`     | `EndpointSummary`             |
//! | GET    | `/mule/dependencies`          | `DependencyScanReport`        |
//!
//! Every error body is `{"detail": "<message>"}`.

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use mulescope_core::metrics as m;
use mulescope_project_scanner::{
    DependencyScanReport, EndpointSummary, FlowScanReport, ProjectFlows, ProjectScanner,
    ProjectScannerError,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    scanner: Arc<ProjectScanner>,
}

impl AppState {
    pub fn new(scanner: ProjectScanner) -> Self {
        Self {
            scanner: Arc::new(scanner),
        }
    }

    pub fn scanner(&self) -> &ProjectScanner {
        &self.scanner
    }
}

/// Error returned by handlers, rendered as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a scanner failure, prefixing internal errors with `context`.
    fn from_scanner(e: ProjectScannerError, context: &str) -> Self {
        match e {
            ProjectScannerError::ProjectNotFound(_) => Self::NotFound(e.to_string()),
            ProjectScannerError::InvalidProjectName(_) => Self::BadRequest(e.to_string()),
            other => {
                tracing::error!(error = %other, "{}", context);
                Self::Internal(format!("{context}: {other}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Build the router with request accounting.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/mule/flows", get(flows))
        .route("/mule/flows/{project_name}", get(project_flows))
        .route("/mule/endpoints/summary", get(endpoints_summary))
        .route("/mule/dependencies", get(dependencies))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    let status = response.status();
    let result = if status.is_client_error() || status.is_server_error() {
        "failure"
    } else {
        "success"
    };
    metrics::counter!(m::DAEMON_REQUESTS_TOTAL, m::LABEL_RESULT => result).increment(1);
    tracing::debug!(method = %method, path = %path, status = status.as_u16(), "request handled");

    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Mulescope!",
        "status": "running",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "API is running successfully",
    }))
}

async fn flows(State(state): State<AppState>) -> Result<Json<FlowScanReport>, ApiError> {
    state
        .scanner()
        .scan_flows()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_scanner(e, "Error scanning MuleSoft flows"))
}

async fn project_flows(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> Result<Json<ProjectFlows>, ApiError> {
    state
        .scanner()
        .project_flows(&project_name)
        .await
        .map(Json)
        .map_err(|e| {
            ApiError::from_scanner(e, &format!("Error getting flows for project {project_name}"))
        })
}

async fn endpoints_summary(
    State(state): State<AppState>,
) -> Result<Json<EndpointSummary>, ApiError> {
    state
        .scanner()
        .endpoints_summary()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_scanner(e, "Error getting endpoints summary"))
}

async fn dependencies(
    State(state): State<AppState>,
) -> Result<Json<DependencyScanReport>, ApiError> {
    state
        .scanner()
        .scan_dependencies()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_scanner(e, "Error scanning MuleSoft projects"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("x".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".to_owned()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_scanner_not_found_keeps_message() {
        let err = ApiError::from_scanner(
            ProjectScannerError::ProjectNotFound("orders".to_owned()),
            "ignored",
        );
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Project orders not found");
    }

    #[test]
    fn test_from_scanner_internal_is_prefixed() {
        let err = ApiError::from_scanner(
            ProjectScannerError::Task("join failed".to_owned()),
            "Error scanning MuleSoft flows",
        );
        assert!(matches!(err, ApiError::Internal(_)));
        assert!(err.to_string().starts_with("Error scanning MuleSoft flows: "));
    }
}
