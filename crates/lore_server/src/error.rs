//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure of an API request, rendered as a JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ApiError {
    /// Required request fields are missing
    #[display("Bad request: {}", _0)]
    BadRequest(String),
    /// No authenticated user on the request
    #[display("Authentication required")]
    Unauthorized,
    /// The user already voted on this poll
    #[display("User already voted")]
    AlreadyVoted,
    /// Casting a vote failed in storage
    #[display("Vote failed")]
    VoteFailed,
    /// Reading poll counts failed in storage
    #[display("Failed to fetch votes")]
    VotesUnavailable,
    /// Authoring submission violated one or more rules
    #[display("Story validation failed ({} problems)", _0.len())]
    ValidationFailed(Vec<String>),
    /// No story under the requested id
    #[display("Story '{}' not found", _0)]
    StoryNotFound(String),
    /// Stored story has no pages
    #[display("Story unavailable")]
    StoryUnavailable,
    /// Any other server-side failure
    #[display("{}", _0)]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AlreadyVoted => StatusCode::FORBIDDEN,
            ApiError::StoryNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StoryUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::VoteFailed | ApiError::VotesUnavailable | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::Unauthorized => json!({ "error": "Auth required" }),
            ApiError::AlreadyVoted => json!({ "error": "User already voted" }),
            ApiError::VoteFailed => json!({ "error": "server error" }),
            ApiError::VotesUnavailable => json!({ "error": "Failed to fetch votes" }),
            ApiError::ValidationFailed(errors) => json!({
                "status": "error",
                "message": "Story validation failed",
                "errors": errors,
            }),
            ApiError::StoryNotFound(story_id) => json!({
                "status": "error",
                "message": format!("Story '{}' not found", story_id),
            }),
            ApiError::StoryUnavailable => json!({
                "status": "error",
                "message": "Story unavailable",
            }),
            ApiError::Internal(message) => json!({ "status": "error", "message": message }),
        };
        (status, Json(body)).into_response()
    }
}
