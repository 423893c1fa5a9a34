//! Tests for the HTTP handlers, called directly.

use axum::Json;
use axum::body::to_bytes;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use lore_server::{
    AppState, AuthenticatedUser, CreateStoryRequest, ServerConfig, VoteRequest, build_state,
    cast_vote, create_router, create_story, get_story, get_votes, health_check,
};
use lore_storage::{KeyValueStore, MemoryStore};
use lore_story::FlatRecord;
use serde_json::{Value, json};
use std::sync::Arc;

async fn state() -> AppState<MemoryStore> {
    let config = ServerConfig::default().with_seed_sample(true);
    build_state(Arc::new(MemoryStore::new()), &config)
        .await
        .unwrap()
}

async fn read(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn vote(
    state: &AppState<MemoryStore>,
    user: Option<&str>,
    poll_id: Option<&str>,
    option: Option<&str>,
) -> (StatusCode, Value) {
    let request = VoteRequest {
        poll_id: poll_id.map(str::to_string),
        option: option.map(str::to_string),
    };
    let user = user.map(|u| AuthenticatedUser(u.to_string()));
    read(
        cast_vote(State(state.clone()), user, Json(request))
            .await
            .into_response(),
    )
    .await
}

fn authoring_values() -> FlatRecord {
    let mut values = FlatRecord::new();
    values.insert("story_name", "Night Drive");
    values.insert("series", "Alpha Run");
    values.insert("chapter", "2");
    values.insert("page_1_story", "The engine purred.");
    values.insert("page_2_story", "The road went on.");
    values.insert("poll_question", "Where next?");
    values.insert("poll_options", json!(["Coast", "Mountains"]));
    values
}

#[tokio::test]
async fn test_health() {
    let (status, body) = read(health_check().await.into_response()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_votes_for_unvoted_poll_are_empty() {
    let state = state().await;
    let (status, body) = read(
        get_votes(State(state), Path("ep1-final".to_string()))
            .await
            .into_response(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "pollId": "ep1-final", "counts": {} }));
}

#[tokio::test]
async fn test_vote_then_repeat_is_forbidden() {
    let state = state().await;

    let (status, body) = vote(&state, Some("alice"), Some("ep1-final"), Some("Car")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = vote(&state, Some("alice"), Some("ep1-final"), Some("SUV")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "User already voted" }));

    vote(&state, Some("bob"), Some("ep1-final"), Some("SUV")).await;
    let (_, body) = read(
        get_votes(State(state), Path("ep1-final".to_string()))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(body["counts"], json!({ "Car": "1", "SUV": "1" }));
}

#[tokio::test]
async fn test_vote_requires_fields_before_identity() {
    let state = state().await;

    let (status, body) = vote(&state, None, Some("ep1-final"), Some("  ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "pollId, option are required" }));

    let (status, _) = vote(&state, None, Some("ep1-final"), Some("Car")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(state.ledger().get_counts("ep1-final").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_identity_read_from_configured_header() {
    let config = ServerConfig::default().with_user_header("x-forwarded-user");
    let state = build_state(Arc::new(MemoryStore::new()), &config)
        .await
        .unwrap();

    let (mut parts, _) = Request::builder()
        .header("x-forwarded-user", " alice ")
        .body(())
        .unwrap()
        .into_parts();
    let user = AuthenticatedUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(user.id(), "alice");

    let (mut parts, _) = Request::builder()
        .header("x-lore-user", "alice")
        .body(())
        .unwrap()
        .into_parts();
    let rejection = AuthenticatedUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_story_then_fetch_it() {
    let state = state().await;

    let request = CreateStoryRequest {
        values: authoring_values(),
    };
    let (status, body) = read(
        create_story(State(state.clone()), Json(request))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let story_id = body["storyId"].as_str().unwrap().to_string();
    let poll_id = body["pollId"].as_str().unwrap().to_string();

    let (status, story) = read(
        get_story(State(state), Path(story_id.clone()))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(story["id"], story_id.as_str());
    assert_eq!(story["chapter"], 2);
    assert_eq!(story["pages"].as_array().unwrap().len(), 2);
    assert_eq!(story["poll"]["id"], poll_id.as_str());
}

#[tokio::test]
async fn test_create_story_lists_every_violation() {
    let state = state().await;
    let mut values = authoring_values();
    values.insert("series", "");
    values.insert("page_2_pc_prompt", "Left or right?");

    let (status, body) = read(
        create_story(State(state), Json(CreateStoryRequest { values }))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Story validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3, "{:?}", errors);
}

#[tokio::test]
async fn test_get_story_errors() {
    let state = state().await;

    let (status, _) = read(
        get_story(State(state.clone()), Path("missing".to_string()))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    state
        .stories()
        .save_record("empty", &FlatRecord::new())
        .await
        .unwrap();
    let (status, body) = read(
        get_story(State(state), Path("empty".to_string()))
            .await
            .into_response(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Story unavailable");
}

#[tokio::test]
async fn test_sample_story_seeded() {
    let state = state().await;
    let (status, story) = read(
        get_story(State(state.clone()), Path("ep1".to_string()))
            .await
            .into_response(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(story["title"], "Man and His Dog");
    assert_eq!(story["poll"]["options"], json!(["Car", "SUV", "Truck"]));
    let _router = create_router(state);
}

#[tokio::test]
async fn test_unseeded_state_has_no_sample() {
    let store = Arc::new(MemoryStore::new());
    build_state(Arc::clone(&store), &ServerConfig::default())
        .await
        .unwrap();
    assert!(!store.exists("story:ep1").await.unwrap());
}
