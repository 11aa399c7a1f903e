use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use watchlog_backend::{BackendError, InsertOutcome, MovieStore, ObjectStore};
use watchlog_models::{MovieId, MoviePatch, NewMovie, PosterSource, UserId};

use crate::cache::MovieCache;

/// How a successful create landed in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The store echoed the new row and it was prepended in place.
    Created,
    /// The insert was accepted without an echo; the whole collection was
    /// refetched.
    Reloaded,
}

/// Sequences exactly one remote call per user intent and keeps the cache
/// consistent with the accepted outcome. The cache is only touched on the
/// continuation after the remote side confirms; success is never inferred
/// from local state.
pub struct MutationCoordinator {
    store: Arc<dyn MovieStore>,
    objects: Arc<dyn ObjectStore>,
}

impl MutationCoordinator {
    pub fn new(store: Arc<dyn MovieStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }

    /// Create a new entry. An upload failure aborts the whole operation:
    /// no insert is attempted and the cache is untouched.
    pub async fn create(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
        title: &str,
        year: i32,
        poster: PosterSource,
    ) -> Result<CreateOutcome, BackendError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BackendError::Invalid("title must not be empty".to_string()));
        }

        let poster_url = match poster {
            PosterSource::None => None,
            PosterSource::Url(url) => Some(url),
            PosterSource::Upload {
                file_name,
                content_type,
                bytes,
            } => {
                let path = poster_object_path(owner, &file_name);
                self.objects.upload(&path, &content_type, bytes).await?;
                Some(self.objects.public_url(&path))
            }
        };

        let row = NewMovie {
            title: title.to_string(),
            year,
            poster_url,
            user_id: owner.clone(),
        };

        match self.store.insert(&row).await? {
            InsertOutcome::Created(movie) => {
                info!("added \"{}\" to the watchlist", movie.title);
                cache.insert_front(movie);
                Ok(CreateOutcome::Created)
            }
            InsertOutcome::NotEchoed => {
                warn!("insert not echoed; reloading the collection");
                let rows = self.store.fetch_for_owner(owner).await?;
                cache.load(rows);
                Ok(CreateOutcome::Reloaded)
            }
        }
    }

    /// Mark watched, recording rating and review in the same write.
    pub async fn mark_watched_with_review(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
        id: MovieId,
        rating: f64,
        review: &str,
    ) -> Result<(), BackendError> {
        self.apply_patch(cache, owner, id, MoviePatch::watched_with_review(rating, review))
            .await
    }

    /// Back to unwatched; rating and review are cleared alongside the flag.
    pub async fn reset_to_unwatched(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
        id: MovieId,
    ) -> Result<(), BackendError> {
        self.apply_patch(cache, owner, id, MoviePatch::reset()).await
    }

    /// Simple mode without a review: flip only the watched flag.
    pub async fn toggle_watched(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
        id: MovieId,
        currently_watched: bool,
    ) -> Result<(), BackendError> {
        self.apply_patch(cache, owner, id, MoviePatch::watched_flag(!currently_watched))
            .await
    }

    pub async fn delete(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
        id: MovieId,
    ) -> Result<(), BackendError> {
        self.store.delete(id, owner).await?;
        cache.remove(id);
        Ok(())
    }

    /// Full refetch: sign-in population and the no-echo fallback.
    pub async fn refresh(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
    ) -> Result<(), BackendError> {
        let rows = self.store.fetch_for_owner(owner).await?;
        cache.load(rows);
        Ok(())
    }

    async fn apply_patch(
        &self,
        cache: &mut MovieCache,
        owner: &UserId,
        id: MovieId,
        patch: MoviePatch,
    ) -> Result<(), BackendError> {
        self.store.update(id, owner, &patch).await?;
        cache.patch(id, &patch);
        Ok(())
    }
}

/// Storage key for an uploaded poster: scoped under the owner, made unique
/// by the upload instant.
fn poster_object_path(owner: &UserId, file_name: &str) -> String {
    format!("{}/{}-{}", owner, Utc::now().timestamp_millis(), file_name)
}
