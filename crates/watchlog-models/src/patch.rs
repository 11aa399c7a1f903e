use serde_json::{json, Map, Value};

use crate::movie::Movie;

/// Partial update for a watchlist row.
///
/// The outer `Option` means "leave the field alone"; `Some(None)` on the
/// nullable fields means "clear it". The same value drives both the remote
/// update body and the local cache patch, so the two cannot drift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub is_watched: Option<bool>,
    pub rating: Option<Option<f64>>,
    pub review: Option<Option<String>>,
}

impl MoviePatch {
    /// Mark watched, recording rating and review in the same write.
    pub fn watched_with_review(rating: f64, review: impl Into<String>) -> Self {
        Self {
            is_watched: Some(true),
            rating: Some(Some(rating)),
            review: Some(Some(review.into())),
        }
    }

    /// Back to unwatched. Rating and review are only meaningful on a watched
    /// entry, so both are cleared alongside the flag.
    pub fn reset() -> Self {
        Self {
            is_watched: Some(false),
            rating: Some(None),
            review: Some(None),
        }
    }

    /// Set only the watched flag (simple mode, no review).
    pub fn watched_flag(watched: bool) -> Self {
        Self {
            is_watched: Some(watched),
            ..Self::default()
        }
    }

    /// JSON body for the remote update. `Some(None)` serializes as an
    /// explicit null so the column is cleared rather than skipped.
    pub fn to_update_body(&self) -> Value {
        let mut fields = Map::new();
        if let Some(watched) = self.is_watched {
            fields.insert("is_watched".to_string(), json!(watched));
        }
        if let Some(rating) = &self.rating {
            fields.insert("rating".to_string(), json!(rating));
        }
        if let Some(review) = &self.review {
            fields.insert("review".to_string(), json!(review));
        }
        Value::Object(fields)
    }

    /// Overwrite the supplied fields on a cached row in place.
    pub fn apply(&self, movie: &mut Movie) {
        if let Some(watched) = self.is_watched {
            movie.is_watched = watched;
        }
        if let Some(rating) = &self.rating {
            movie.rating = *rating;
        }
        if let Some(review) = &self.review {
            movie.review = review.clone();
        }
    }
}
