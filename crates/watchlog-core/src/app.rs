use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use watchlog_backend::{BackendError, IdentityService, MovieStore, ObjectStore};
use watchlog_models::{Session, SortMode};

use crate::cache::WatchlistView;
use crate::intent::{ActionOutcome, UserIntent};
use crate::session::WatchlistSession;

/// Application root: owns the collaborator handles and at most one live
/// session. This replaces ambient current-user / current-list globals with
/// explicit construction on sign-in and teardown on sign-out.
pub struct WatchlistApp {
    identity: Arc<dyn IdentityService>,
    store: Arc<dyn MovieStore>,
    objects: Arc<dyn ObjectStore>,
    session: Option<WatchlistSession>,
}

impl WatchlistApp {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        store: Arc<dyn MovieStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            identity,
            store,
            objects,
            session: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&WatchlistSession> {
        self.session.as_ref()
    }

    /// Identity-service notifications; feed each received value to
    /// `apply_session_change`.
    pub fn subscribe_session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.identity.subscribe()
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), BackendError> {
        let session = self.identity.sign_in(email, password).await?;
        self.open_session(&session).await
    }

    /// Registers a new account. No session is opened: the user signs in
    /// afterwards, possibly after confirming their e-mail.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), BackendError> {
        self.identity.sign_up(email, password).await
    }

    pub async fn sign_out(&mut self) -> Result<(), BackendError> {
        self.identity.sign_out().await?;
        self.session = None;
        info!("signed out; local watchlist state dropped");
        Ok(())
    }

    /// Drive the session lifecycle from an identity-service notification: a
    /// fresh session rebuilds the cache from a full fetch, `None` tears it
    /// down. Callers using `sign_in`/`sign_out` directly do not need this.
    pub async fn apply_session_change(
        &mut self,
        change: Option<Session>,
    ) -> Result<(), BackendError> {
        match change {
            Some(session) => self.open_session(&session).await,
            None => {
                self.session = None;
                Ok(())
            }
        }
    }

    /// Dispatch one user intent. Rejected locally, before any remote call,
    /// when no session is active.
    pub async fn dispatch(&mut self, intent: UserIntent) -> Result<ActionOutcome, BackendError> {
        match self.session.as_mut() {
            Some(session) => session.dispatch(intent).await,
            None => Err(BackendError::NotAuthenticated),
        }
    }

    /// Derive the current display sequence; `None` while signed out.
    pub fn view(&self, filter_text: &str, sort: SortMode) -> Option<WatchlistView> {
        self.session.as_ref().map(|s| s.view(filter_text, sort))
    }

    async fn open_session(&mut self, session: &Session) -> Result<(), BackendError> {
        let opened = WatchlistSession::open(
            session,
            Arc::clone(&self.store),
            Arc::clone(&self.objects),
        )
        .await?;
        self.session = Some(opened);
        Ok(())
    }
}
