use watchlog_models::{MovieId, PosterSource};

/// One discrete user gesture. The presentation layer builds these; the core
/// maps each onto exactly one remote mutation. Nothing presentational leaks
/// in the other direction.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    AddMovie {
        title: String,
        year: i32,
        poster: PosterSource,
    },
    MarkWatched {
        id: MovieId,
        rating: f64,
        review: String,
    },
    ResetWatched {
        id: MovieId,
    },
    /// Simple mode without a review: flip the flag from its current value.
    ToggleWatched {
        id: MovieId,
        currently_watched: bool,
    },
    DeleteMovie {
        id: MovieId,
    },
    Refresh,
}

/// What a dispatched intent did to the cache, so the caller knows to
/// re-derive its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The new row is in the cache.
    Created,
    /// Insert accepted without an echo; the cache was rebuilt from a fetch.
    Reloaded,
    Updated,
    Deleted,
    Refreshed,
}
