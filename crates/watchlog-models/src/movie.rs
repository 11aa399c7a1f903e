use serde::{Deserialize, Serialize};

use crate::session::UserId;

/// Server-assigned row id. Monotonically increasing, so it doubles as the
/// creation-recency ordering key.
pub type MovieId = i64;

/// One user-owned watchlist entry, wire-compatible with the `movies` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    /// Human 0-10 scale; `None` means not yet rated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_watched: bool,
    /// Meaningful only while `is_watched` is set; cleared by the reset
    /// operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub user_id: UserId,
}

/// Insert payload for a new row. `rating` and `is_watched` are absent on
/// purpose: the server defaults them to null / false.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub user_id: UserId,
}
