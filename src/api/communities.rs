//! Community API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, ApiResult, ListParams};
use crate::errors::AppError;
use crate::models::{
    Community, CommunityStatus, CreateCommunityRequest, CreateReviewRequest,
    JoinCommunityRequest, UpdateCommunityRequest,
};
use crate::query::{CollectionStats, Page};
use crate::AppState;

/// GET /api/communities - Filter, sort and paginate communities.
pub async fn list_communities(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Community>> {
    let revision_id = state.repo.get_revision_id().await;

    let query = match params.into_query(&state.config, CommunityStatus::parse) {
        Ok(query) => query,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.query_communities(&query).await {
        Ok(page) => success(page, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/communities/stats - Dashboard totals.
pub async fn community_stats(State(state): State<AppState>) -> ApiResult<CollectionStats> {
    let revision_id = state.repo.get_revision_id().await;
    success(state.repo.community_stats().await, revision_id)
}

/// GET /api/communities/:id - Get a community by ID or slug.
pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Community> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.get_community(&id).await {
        Some(community) => success(community, revision_id),
        None => error(
            AppError::NotFound(format!("Community {} not found", id)),
            revision_id,
        ),
    }
}

/// POST /api/communities - Create a new community.
pub async fn create_community(
    State(state): State<AppState>,
    Json(request): Json<CreateCommunityRequest>,
) -> ApiResult<Community> {
    let revision_id = state.repo.get_revision_id().await;

    // Validate required fields
    let required = [
        (&request.name, "Name is required"),
        (&request.description, "Description is required"),
        (&request.category, "Category is required"),
        (&request.leader.name, "Leader name is required"),
        (&request.leader.email, "Leader email is required"),
    ];
    if let Some((_, message)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
        return error(AppError::Validation(message.to_string()), revision_id);
    }

    match state.repo.create_community(&request).await {
        Ok(community) => {
            let new_revision = state.repo.get_revision_id().await;
            success(community, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/communities/:id - Update a community.
pub async fn update_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommunityRequest>,
) -> ApiResult<Community> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.update_community(&id, &request).await {
        Ok(community) => {
            let new_revision = state.repo.get_revision_id().await;
            success(community, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/communities/:id - Delete a community.
pub async fn delete_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.delete_community(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await;
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/communities/:id/reviews - Add a review.
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateReviewRequest>,
) -> ApiResult<Community> {
    let revision_id = state.repo.get_revision_id().await;

    if request.user_name.trim().is_empty() {
        return error(
            AppError::Validation("Reviewer name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.add_review(&id, &request).await {
        Ok(community) => {
            let new_revision = state.repo.get_revision_id().await;
            success(community, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/communities/:id/members - Join a community.
pub async fn join_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<JoinCommunityRequest>,
) -> ApiResult<Community> {
    let revision_id = state.repo.get_revision_id().await;

    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Member name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.join_community(&id, &request).await {
        Ok(community) => {
            let new_revision = state.repo.get_revision_id().await;
            success(community, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
