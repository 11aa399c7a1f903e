use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use watchlog_config::{Config, SessionStore};
use watchlog_models::Session;

/// Shared client for one Supabase project. The `IdentityService`,
/// `MovieStore`, and `ObjectStore` implementations all hang off this type,
/// so a single instance (behind `Arc`) serves every collaborator role.
pub struct SupabaseClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) anon_key: String,
    pub(crate) poster_bucket: String,
    pub(crate) auth: Mutex<AuthState>,
    pub(crate) session_store: Mutex<Option<SessionStore>>,
    session_tx: watch::Sender<Option<Session>>,
    // Kept alive so publishing never observes a closed channel.
    session_rx: watch::Receiver<Option<Session>>,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct AuthState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub session: Option<Session>,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> Self {
        let (session_tx, session_rx) = watch::channel(None);
        Self {
            http: Client::new(),
            base_url: config.backend.url.trim_end_matches('/').to_string(),
            anon_key: config.backend.anon_key.clone(),
            poster_bucket: config.storage.poster_bucket.clone(),
            auth: Mutex::new(AuthState::default()),
            session_store: Mutex::new(None),
            session_tx,
            session_rx,
        }
    }

    /// Enable token persistence: sign-in writes tokens through this store
    /// and `restore_session` reads them back after a restart.
    pub fn with_session_store(self, store: SessionStore) -> Self {
        *self.lock_store() = Some(store);
        self
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn object_url(&self, bucket: &str, encoded_path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, encoded_path)
    }

    pub(crate) fn public_object_url(&self, bucket: &str, encoded_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, encoded_path
        )
    }

    pub(crate) fn auth_state(&self) -> MutexGuard<'_, AuthState> {
        self.auth.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn lock_store(&self) -> MutexGuard<'_, Option<SessionStore>> {
        self.session_store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Bearer token for data calls: the user's access token when signed in,
    /// the anon key otherwise.
    pub(crate) fn bearer_token(&self) -> String {
        self.auth_state()
            .access_token
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    pub(crate) fn publish_session(&self, session: Option<Session>) {
        self.session_tx.send_replace(session);
    }

    pub(crate) fn subscribe_sessions(&self) -> watch::Receiver<Option<Session>> {
        self.session_rx.clone()
    }
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Error text for a failed REST or storage response: the service's own
/// message when the body carries one, the raw body otherwise, the status
/// code as a last resort.
pub(crate) fn response_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<RestErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }
    if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    }
}
