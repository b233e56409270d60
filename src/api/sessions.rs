//! Session scheduling API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error, success, without_sentinel, ApiResult};
use crate::errors::AppError;
use crate::models::{
    AssignSessionRequest, ConflictCheckRequest, CreateSessionRequest, RescheduleSessionRequest,
    SessionRequest, SessionStatus, TeamMember, UpdateSessionStatusRequest,
};
use crate::query::{ScheduleConflict, SessionStats};
use crate::store::SessionListFilter;
use crate::AppState;

/// Session list query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListParams {
    pub status: Option<String>,
    pub assigned_to_id: Option<String>,
    pub date: Option<String>,
}

/// Result of a dry-run conflict check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ScheduleConflict>,
}

/// GET /api/team-members - List team members.
pub async fn list_team_members(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    let revision_id = state.repo.get_revision_id().await;
    success(state.repo.list_team_members().await, revision_id)
}

/// GET /api/sessions - List session requests.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<SessionListParams>,
) -> ApiResult<Vec<SessionRequest>> {
    let revision_id = state.repo.get_revision_id().await;

    let status = match without_sentinel(params.status) {
        Some(raw) => match SessionStatus::parse(raw.trim()) {
            Some(status) => Some(status),
            None => {
                return error(
                    AppError::InvalidArgument(format!("Unknown session status: {}", raw)),
                    revision_id,
                )
            }
        },
        None => None,
    };

    let filter = SessionListFilter {
        status,
        assigned_to_id: without_sentinel(params.assigned_to_id),
        date: without_sentinel(params.date),
    };

    success(state.repo.list_sessions(&filter).await, revision_id)
}

/// GET /api/sessions/:id - Get a single session request.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionRequest> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.get_session(&id).await {
        Some(session) => success(session, revision_id),
        None => error(
            AppError::NotFound(format!("Session {} not found", id)),
            revision_id,
        ),
    }
}

/// GET /api/sessions/stats - Session dashboard counts.
pub async fn session_stats(State(state): State<AppState>) -> ApiResult<SessionStats> {
    let revision_id = state.repo.get_revision_id().await;
    success(state.repo.session_stats().await, revision_id)
}

/// POST /api/sessions - Submit a session request.
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<SessionRequest> {
    let revision_id = state.repo.get_revision_id().await;

    // Validate required fields
    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }
    if !request.email.contains('@') {
        return error(
            AppError::Validation("A valid email is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_session(&request).await {
        Ok(session) => {
            let new_revision = state.repo.get_revision_id().await;
            success(session, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/sessions/conflicts - Check a slot without booking it.
pub async fn check_conflict(
    State(state): State<AppState>,
    Json(request): Json<ConflictCheckRequest>,
) -> ApiResult<ConflictCheckResponse> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.check_conflict(&request).await {
        Ok(conflict) => success(
            ConflictCheckResponse {
                available: conflict.is_none(),
                conflict,
            },
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/sessions/:id/assign - Assign and confirm a session.
pub async fn assign_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignSessionRequest>,
) -> ApiResult<SessionRequest> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.assign_session(&id, &request).await {
        Ok(session) => {
            let new_revision = state.repo.get_revision_id().await;
            success(session, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/sessions/:id/reschedule - Move a session to a new slot.
pub async fn reschedule_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RescheduleSessionRequest>,
) -> ApiResult<SessionRequest> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.reschedule_session(&id, &request).await {
        Ok(session) => {
            let new_revision = state.repo.get_revision_id().await;
            success(session, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/sessions/:id/status - Change a session's status.
pub async fn update_session_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSessionStatusRequest>,
) -> ApiResult<SessionRequest> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.update_session_status(&id, &request).await {
        Ok(session) => {
            let new_revision = state.repo.get_revision_id().await;
            success(session, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
