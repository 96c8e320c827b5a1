//! HTTP routes: project persistence and version snapshots over a
//! [`ProjectStore`].

use crate::rooms::Rooms;
use crate::ws::ws_handler;
use arc3d_core::{ProjectState, ProjectStore, StorageError, VersionInfo};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub rooms: Rooms,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Arc<dyn ProjectStore>) -> SharedState {
        Arc::new(Self {
            store,
            rooms: Rooms::new(),
        })
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/projects", get(list_projects))
        .route(
            "/projects/{id}",
            get(get_project).put(put_project).delete(delete_project),
        )
        .route("/projects/{id}/versions", get(list_versions).post(create_version))
        .route("/projects/{id}/versions/{version_id}", get(get_version))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    Storage(StorageError),
    /// Request body is well-formed JSON but not an acceptable project.
    Invalid(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::Serialization(_)) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Storage(e) => e.to_string(),
            ApiError::Invalid(message) => message.clone(),
        };
        if status.is_server_error() {
            warn!("Request failed: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Health check
pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_projects(State(state): State<SharedState>) -> ApiResult<Json<Vec<String>>> {
    let mut ids = state.store.list().await?;
    ids.sort();
    Ok(Json(ids))
}

pub async fn get_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectState>> {
    Ok(Json(state.store.load(&id).await?))
}

/// Replace a project. Inconsistent states are rejected before they reach
/// the store.
pub async fn put_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(project): Json<ProjectState>,
) -> ApiResult<StatusCode> {
    let issues = project.integrity_issues();
    if let Some(first) = issues.first() {
        return Err(ApiError::Invalid(format!(
            "Project has {} integrity issue(s), first: {:?}",
            issues.len(),
            first
        )));
    }
    state.store.save(&id, &project).await?;
    info!("Saved project {}", id);
    state.rooms.notify_saved(&id, None);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_project(State(state): State<SharedState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.store.delete(&id).await?;
    info!("Deleted project {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_versions(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<VersionInfo>>> {
    Ok(Json(state.store.list_versions(&id).await?))
}

/// Body of a snapshot request. Without `state`, the saved project is
/// snapshotted.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVersion {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub state: Option<ProjectState>,
}

pub async fn create_version(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<CreateVersion>,
) -> ApiResult<(StatusCode, Json<VersionInfo>)> {
    let project = match body.state {
        Some(project) => project,
        None => state.store.load(&id).await?,
    };
    let info = state
        .store
        .create_version_snapshot(&id, &project, &body.description)
        .await?;
    info!("Created version {} of project {}", info.number, id);
    Ok((StatusCode::CREATED, Json(info)))
}

pub async fn get_version(
    State(state): State<SharedState>,
    Path((id, version_id)): Path<(String, String)>,
) -> ApiResult<Json<ProjectState>> {
    Ok(Json(state.store.load_version(&id, &version_id).await?))
}
