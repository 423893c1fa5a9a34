//! Story persistence over a key/value store.

use crate::authoring::prepare_story_record;
use crate::builder::build_story;
use crate::record::{FlatRecord, keys};
use lore_core::Story;
use lore_error::{LoreResult, StorageError, StorageErrorKind, StoryError, StoryErrorKind};
use lore_storage::{KeyValueStore, StorageResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Identifiers handed back after a story is published.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PublishedStory {
    /// Key of the new story
    story_id: String,
    /// Ledger id of its poll
    poll_id: String,
    /// Episode title
    title: String,
}

/// Stores flat story records as JSON under `story:<id>`.
///
/// Records go in and out flat; [`load`](StoryRepository::load) is the
/// boundary where they become a [`Story`].
///
/// # Example
/// ```no_run
/// use lore_storage::MemoryStore;
/// use lore_story::{StoryRepository, sample_story_record};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = StoryRepository::new(Arc::new(MemoryStore::new()));
///     repo.save_record("ep1", &sample_story_record()).await.unwrap();
///     let story = repo.load("ep1").await.unwrap();
///     assert_eq!(story.title(), "Man and His Dog");
/// }
/// ```
#[derive(Debug)]
pub struct StoryRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for StoryRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> StoryRepository<S> {
    /// Create a repository over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn key(story_id: &str) -> String {
        format!("story:{}", story_id)
    }

    /// Persist a flat record under `story_id`, replacing any previous record.
    #[instrument(skip(self, record), fields(fields = record.len()))]
    pub async fn save_record(&self, story_id: &str, record: &FlatRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        self.store.set(&Self::key(story_id), &json).await?;
        debug!("Story record saved");
        Ok(())
    }

    /// Fetch the flat record stored under `story_id`.
    #[instrument(skip(self))]
    pub async fn load_record(&self, story_id: &str) -> StorageResult<Option<FlatRecord>> {
        let Some(json) = self.store.get(&Self::key(story_id)).await? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))
    }

    /// Load and build the story stored under `story_id`.
    ///
    /// # Errors
    ///
    /// [`StoryErrorKind::NotFound`] when nothing is stored,
    /// [`StoryErrorKind::MalformedStory`] when the record has no pages, or a
    /// storage error.
    pub async fn load(&self, story_id: &str) -> LoreResult<Story> {
        let record = self
            .load_record(story_id)
            .await?
            .ok_or_else(|| StoryError::new(StoryErrorKind::NotFound(story_id.to_string())))?;
        Ok(build_story(&record)?)
    }

    /// Validate an authoring submission, assign ids and persist it.
    ///
    /// # Errors
    ///
    /// A validation error listing every violation, or a storage error.
    #[instrument(skip_all)]
    pub async fn publish(&self, values: &FlatRecord) -> LoreResult<PublishedStory> {
        let mut record = prepare_story_record(values)?;
        let story_id = format!("story-{}", uuid::Uuid::new_v4());
        let poll_id = format!("poll-{}", uuid::Uuid::new_v4());
        record.insert(keys::STORY_ID, story_id.as_str());
        record.insert(keys::POLL_ID, poll_id.as_str());

        self.save_record(&story_id, &record).await?;
        let title = record.text(keys::STORY_NAME).unwrap_or_default();
        info!(story_id = %story_id, poll_id = %poll_id, title = %title, "Story published");

        Ok(PublishedStory {
            story_id,
            poll_id,
            title,
        })
    }
}
