//! Quiz API endpoints.

use axum::extract::{Path, Query, State};

use super::{error, success, ApiResult, ListParams};
use crate::errors::AppError;
use crate::models::{Quiz, QuizStatus};
use crate::query::{CollectionStats, Page};
use crate::AppState;

/// GET /api/quizzes - Filter, sort and paginate quizzes.
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Quiz>> {
    let revision_id = state.repo.get_revision_id().await;

    let query = match params.into_query(&state.config, QuizStatus::parse) {
        Ok(query) => query,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.query_quizzes(&query).await {
        Ok(page) => success(page, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/quizzes/stats - Quiz catalogue totals.
pub async fn quiz_stats(State(state): State<AppState>) -> ApiResult<CollectionStats> {
    let revision_id = state.repo.get_revision_id().await;
    success(state.repo.quiz_stats().await, revision_id)
}

/// GET /api/quizzes/:id - Get a quiz by ID or slug.
pub async fn get_quiz(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Quiz> {
    let revision_id = state.repo.get_revision_id().await;

    match state.repo.get_quiz(&id).await {
        Some(quiz) => success(quiz, revision_id),
        None => error(
            AppError::NotFound(format!("Quiz {} not found", id)),
            revision_id,
        ),
    }
}
