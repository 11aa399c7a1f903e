use std::sync::Arc;

use tracing::info;
use watchlog_backend::{BackendError, MovieStore, ObjectStore};
use watchlog_models::{Session, SortMode, UserId};

use crate::cache::{MovieCache, WatchlistView};
use crate::coordinator::{CreateOutcome, MutationCoordinator};
use crate::intent::{ActionOutcome, UserIntent};

/// State for one authenticated session: the owner, the cached rows, and the
/// coordinator that mutates them. Built on sign-in, dropped on sign-out;
/// the cache has no existence outside a session.
pub struct WatchlistSession {
    owner: UserId,
    cache: MovieCache,
    coordinator: MutationCoordinator,
}

impl WatchlistSession {
    /// Open a session and populate the cache with the owner's rows.
    pub async fn open(
        session: &Session,
        store: Arc<dyn MovieStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Result<Self, BackendError> {
        let coordinator = MutationCoordinator::new(store, objects);
        let mut cache = MovieCache::new();
        coordinator.refresh(&mut cache, &session.user_id).await?;
        info!(
            "session opened for {} with {} rows",
            session.user_id,
            cache.len()
        );
        Ok(Self {
            owner: session.user_id.clone(),
            cache,
            coordinator,
        })
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn cache(&self) -> &MovieCache {
        &self.cache
    }

    /// Derive the display sequence for the current controls.
    pub fn view(&self, filter_text: &str, sort: SortMode) -> WatchlistView {
        self.cache.view(filter_text, sort)
    }

    /// Map one user intent onto exactly one coordinator call.
    pub async fn dispatch(&mut self, intent: UserIntent) -> Result<ActionOutcome, BackendError> {
        match intent {
            UserIntent::AddMovie { title, year, poster } => {
                let outcome = self
                    .coordinator
                    .create(&mut self.cache, &self.owner, &title, year, poster)
                    .await?;
                Ok(match outcome {
                    CreateOutcome::Created => ActionOutcome::Created,
                    CreateOutcome::Reloaded => ActionOutcome::Reloaded,
                })
            }
            UserIntent::MarkWatched { id, rating, review } => {
                self.coordinator
                    .mark_watched_with_review(&mut self.cache, &self.owner, id, rating, &review)
                    .await?;
                Ok(ActionOutcome::Updated)
            }
            UserIntent::ResetWatched { id } => {
                self.coordinator
                    .reset_to_unwatched(&mut self.cache, &self.owner, id)
                    .await?;
                Ok(ActionOutcome::Updated)
            }
            UserIntent::ToggleWatched {
                id,
                currently_watched,
            } => {
                self.coordinator
                    .toggle_watched(&mut self.cache, &self.owner, id, currently_watched)
                    .await?;
                Ok(ActionOutcome::Updated)
            }
            UserIntent::DeleteMovie { id } => {
                self.coordinator
                    .delete(&mut self.cache, &self.owner, id)
                    .await?;
                Ok(ActionOutcome::Deleted)
            }
            UserIntent::Refresh => {
                self.coordinator.refresh(&mut self.cache, &self.owner).await?;
                Ok(ActionOutcome::Refreshed)
            }
        }
    }
}
