//! HTTP API for votes and stories.

use crate::error::ApiError;
use crate::identity::AuthenticatedUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use lore_core::Story;
use lore_error::{LoreErrorKind, StoryErrorKind};
use lore_poll::PollLedger;
use lore_storage::KeyValueStore;
use lore_story::{FlatRecord, StoryRepository};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Shared state of the API handlers.
#[derive(Debug)]
pub struct AppState<S> {
    ledger: PollLedger<S>,
    stories: StoryRepository<S>,
    user_header: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            stories: self.stories.clone(),
            user_header: Arc::clone(&self.user_header),
        }
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Creates the API state.
    pub fn new(
        ledger: PollLedger<S>,
        stories: StoryRepository<S>,
        user_header: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            stories,
            user_header: Arc::from(user_header.into()),
        }
    }

    /// The poll ledger.
    pub fn ledger(&self) -> &PollLedger<S> {
        &self.ledger
    }

    /// The story repository.
    pub fn stories(&self) -> &StoryRepository<S> {
        &self.stories
    }

    /// Header carrying the authenticated user id.
    pub fn user_header(&self) -> &str {
        &self.user_header
    }
}

/// Creates the API router.
pub fn create_router<S: KeyValueStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/votes/:poll_id", get(get_votes::<S>))
        .route("/api/vote", post(cast_vote::<S>))
        .route("/api/create-story", post(create_story::<S>))
        .route("/api/stories/:story_id", get(get_story::<S>))
        .with_state(state)
}

/// Health check endpoint.
#[instrument(skip_all)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Counts for a poll, values exactly as stored.
#[instrument(skip(state))]
pub async fn get_votes<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    Path(poll_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let counts = state.ledger.stored_counts(&poll_id).await.map_err(|e| {
        error!(error = %e, "Error fetching votes");
        ApiError::VotesUnavailable
    })?;
    Ok(Json(json!({ "pollId": poll_id, "counts": counts })))
}

/// Body of `POST /api/vote`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// Poll to vote on
    #[serde(default)]
    pub poll_id: Option<String>,
    /// Option voted for
    #[serde(default)]
    pub option: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Casts the authenticated user's vote.
#[instrument(skip(state, user, request))]
pub async fn cast_vote<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    user: Option<AuthenticatedUser>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(poll_id), Some(option)) = (required(request.poll_id), required(request.option))
    else {
        return Err(ApiError::BadRequest(
            "pollId, option are required".to_string(),
        ));
    };
    let user = user.ok_or(ApiError::Unauthorized)?;

    match state.ledger.cast_vote(&poll_id, user.id(), &option).await {
        Ok(()) => Ok(Json(json!({ "success": true }))),
        Err(e) if e.is_already_voted() => Err(ApiError::AlreadyVoted),
        Err(e) => {
            error!(error = %e, poll_id = %poll_id, "Vote error");
            Err(ApiError::VoteFailed)
        }
    }
}

/// Body of `POST /api/create-story`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStoryRequest {
    /// Flat authoring form values
    #[serde(default)]
    pub values: FlatRecord,
}

/// Validates and publishes an authored story.
#[instrument(skip_all)]
pub async fn create_story<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<CreateStoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let published = state
        .stories
        .publish(&request.values)
        .await
        .map_err(|e| match e.kind() {
            LoreErrorKind::Validation(v) => {
                warn!(problems = v.messages().len(), "Story validation failed");
                ApiError::ValidationFailed(v.messages().to_vec())
            }
            _ => {
                error!(error = %e, "Failed to create story");
                ApiError::Internal("Failed to create story".to_string())
            }
        })?;

    info!(story_id = %published.story_id(), "Story created");
    Ok(Json(json!({
        "status": "success",
        "message": format!("Story \"{}\" created", published.title()),
        "storyId": published.story_id(),
        "pollId": published.poll_id(),
    })))
}

/// A stored story, built.
#[instrument(skip(state))]
pub async fn get_story<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    Path(story_id): Path<String>,
) -> Result<Json<Story>, ApiError> {
    state.stories.load(&story_id).await.map(Json).map_err(|e| match e.kind() {
        LoreErrorKind::Story(s) => match s.kind() {
            StoryErrorKind::NotFound(id) => ApiError::StoryNotFound(id.clone()),
            _ => {
                warn!(error = %e, "Story unavailable");
                ApiError::StoryUnavailable
            }
        },
        _ => {
            error!(error = %e, "Failed to load story");
            ApiError::Internal("Failed to load story".to_string())
        }
    })
}
