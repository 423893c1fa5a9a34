//! HTTP boundary of LoreTogether.
//!
//! Serves poll counts and votes backed by a [`lore_poll::PollLedger`], and
//! story creation and retrieval backed by a [`lore_story::StoryRepository`].
//! The caller's identity is supplied out of band in a request header set by
//! an authenticating proxy.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod error;
mod identity;
mod observability;

pub use api::{
    AppState, CreateStoryRequest, VoteRequest, cast_vote, create_router, create_story, get_story,
    get_votes, health_check,
};
pub use config::{
    ENV_BIND_ADDRESS, ENV_LOG_FORMAT, ENV_USER_HEADER, LogFormat, ServerConfig,
    ServerConfigBuilder,
};
pub use error::ApiError;
pub use identity::AuthenticatedUser;
pub use observability::{env_filter, init_tracing};

use lore_error::LoreResult;
use lore_poll::PollLedger;
use lore_storage::KeyValueStore;
use lore_story::{SAMPLE_STORY_ID, StoryRepository, sample_story_record};
use std::sync::Arc;
use tracing::info;

/// Builds the API state over one shared store.
///
/// With `seed_sample` set, the bundled sample story is stored under its
/// fixed id so it can be read at `/api/stories/ep1`.
pub async fn build_state<S: KeyValueStore + 'static>(
    store: Arc<S>,
    config: &ServerConfig,
) -> LoreResult<AppState<S>> {
    let ledger = PollLedger::with_config(Arc::clone(&store), config.ledger().clone());
    let stories = StoryRepository::new(store);
    if *config.seed_sample() {
        stories
            .save_record(SAMPLE_STORY_ID, &sample_story_record())
            .await?;
        info!(story_id = SAMPLE_STORY_ID, "Sample story seeded");
    }
    Ok(AppState::new(ledger, stories, config.user_header().clone()))
}
