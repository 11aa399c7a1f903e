use thiserror::Error;

/// Failure taxonomy for the remote collaborators. Service error text is
/// carried verbatim in the message so the UI can surface it unchanged.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Sign-in or sign-up rejected by the identity service.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A mutation was attempted with no active session. Rejected locally,
    /// before any remote call.
    #[error("not signed in")]
    NotAuthenticated,

    /// Poster upload failed. The enclosing create is aborted before any row
    /// is written.
    #[error("poster upload failed: {0}")]
    Upload(String),

    /// Insert, update, or delete failed. No local state was changed.
    #[error("write failed: {0}")]
    RemoteWrite(String),

    /// Fetching the watchlist failed. The cache is left untouched.
    #[error("fetch failed: {0}")]
    RemoteRead(String),

    /// Input rejected locally; no remote call was made.
    #[error("invalid input: {0}")]
    Invalid(String),
}
