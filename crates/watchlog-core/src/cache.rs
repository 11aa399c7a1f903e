use tracing::debug;
use watchlog_models::{Movie, MovieId, MoviePatch, SortMode};

/// Session-local authoritative copy of the user's watchlist rows, held
/// most-recently-created first. All operations are synchronous, in-memory,
/// and infallible.
#[derive(Debug, Default)]
pub struct MovieCache {
    movies: Vec<Movie>,
}

/// Result of a view derivation. The two empty cases are distinct so the
/// caller can word its empty state correctly: an empty collection reads
/// differently than a search with no hits.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchlistView {
    Rows(Vec<Movie>),
    EmptyCollection,
    NoMatches,
}

impl MovieCache {
    pub fn new() -> Self {
        Self { movies: Vec::new() }
    }

    /// Replace the entire cache with a freshly fetched collection (already
    /// ordered id descending by the store).
    pub fn load(&mut self, rows: Vec<Movie>) {
        debug!("cache reloaded with {} rows", rows.len());
        self.movies = rows;
    }

    /// Prepend a single row after a successful create.
    pub fn insert_front(&mut self, movie: Movie) {
        self.movies.insert(0, movie);
    }

    /// Overwrite the supplied fields on the matching row. Silently does
    /// nothing when the id is gone: a delete may have raced ahead of a
    /// pending update resolving.
    pub fn patch(&mut self, id: MovieId, patch: &MoviePatch) {
        match self.movies.iter_mut().find(|m| m.id == id) {
            Some(movie) => patch.apply(movie),
            None => debug!("patch for absent row {} ignored", id),
        }
    }

    /// Drop the row with the given id; no-op if absent.
    pub fn remove(&mut self, id: MovieId) {
        self.movies.retain(|m| m.id != id);
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Derive the display sequence for the given controls. The cache itself
    /// is never mutated.
    ///
    /// Filtering is a case-insensitive substring match on the title; the
    /// empty filter passes everything. Sorting is stable, so ties keep the
    /// filtered rows' relative order.
    pub fn view(&self, filter_text: &str, sort: SortMode) -> WatchlistView {
        let query = filter_text.to_lowercase();
        let mut rows: Vec<Movie> = self
            .movies
            .iter()
            .filter(|m| query.is_empty() || m.title.to_lowercase().contains(&query))
            .cloned()
            .collect();

        match sort {
            SortMode::Recent => rows.sort_by(|a, b| b.id.cmp(&a.id)),
            SortMode::RatingDesc => {
                rows.sort_by(|a, b| sort_rating(b).total_cmp(&sort_rating(a)))
            }
            SortMode::YearDesc => rows.sort_by(|a, b| b.year.cmp(&a.year)),
        }

        if rows.is_empty() {
            if filter_text.is_empty() {
                WatchlistView::EmptyCollection
            } else {
                WatchlistView::NoMatches
            }
        } else {
            WatchlistView::Rows(rows)
        }
    }
}

/// Unrated sorts below every real 0-10 rating.
fn sort_rating(movie: &Movie) -> f64 {
    movie.rating.unwrap_or(f64::NEG_INFINITY)
}
