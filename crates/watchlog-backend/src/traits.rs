use async_trait::async_trait;
use tokio::sync::watch;
use watchlog_models::{Movie, MovieId, MoviePatch, NewMovie, Session, UserId};

use crate::error::BackendError;

/// Outcome of a row insert. The store may or may not echo the created row
/// back; the caller must know which, because an echoed row can be prepended
/// optimistically while a silent insert forces a full reload.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Created(Movie),
    NotEchoed,
}

/// Identity collaborator: session issuance and change notifications.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Registers a new account. Does not open a session; the user signs in
    /// afterwards (possibly after e-mail confirmation).
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    fn current_session(&self) -> Option<Session>;

    /// Receiver observes every session transition, including the teardown
    /// to `None` on sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// Row-store collaborator for the `movies` table.
///
/// Every mutating call is scoped to id AND owner, even though the server
/// also enforces row ownership independently.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All rows for the owner, ordered most-recently-created first.
    async fn fetch_for_owner(&self, owner: &UserId) -> Result<Vec<Movie>, BackendError>;

    async fn insert(&self, row: &NewMovie) -> Result<InsertOutcome, BackendError>;

    async fn update(
        &self,
        id: MovieId,
        owner: &UserId,
        patch: &MoviePatch,
    ) -> Result<(), BackendError>;

    async fn delete(&self, id: MovieId, owner: &UserId) -> Result<(), BackendError>;
}

/// Binary object storage for poster images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError>;

    /// Public URL the uploaded object will be served from.
    fn public_url(&self, path: &str) -> String;
}
