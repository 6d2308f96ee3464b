//! Training session API routes

use crate::error::ApiError;
use crate::services::SessionService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use triflow_shared::{
    CreateSessionRequest, MessageResponse, SessionResponse, SessionsListResponse, SessionsQuery,
    UpdateSessionRequest,
};

/// Create training session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/:id", patch(update_session).delete(delete_session))
}

/// GET /api/training/sessions - List sessions in a date range
async fn list_sessions(
    State(state): State<AppState>,
    query: Result<Query<SessionsQuery>, QueryRejection>,
) -> Result<Json<SessionsListResponse>, ApiError> {
    let Query(query) = query?;
    let sessions = SessionService::list(state.sessions(), query).await?;
    Ok(Json(SessionsListResponse {
        success: true,
        sessions,
    }))
}

/// POST /api/training/sessions - Create a session
async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let Json(req) = payload?;
    let session = SessionService::create(state.sessions(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            session,
            message: "Session created successfully".to_string(),
        }),
    ))
}

/// PATCH /api/training/sessions/:id - Update a session
async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(req) = payload?;
    let session = SessionService::update(state.sessions(), &id, req).await?;
    Ok(Json(SessionResponse {
        success: true,
        session,
        message: "Session updated successfully".to_string(),
    }))
}

/// DELETE /api/training/sessions/:id - Delete a session
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    SessionService::delete(state.sessions(), &id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Session deleted successfully".to_string(),
    }))
}
