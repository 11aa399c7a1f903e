use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use watchlog_models::{Session, UserId};

use crate::error::BackendError;
use crate::supabase::client::SupabaseClient;
use crate::traits::IdentityService;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
    user: AuthUser,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Error text for a failed identity call. The auth endpoints use different
/// body shapes than the REST surface, so this is parsed separately.
fn auth_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<AuthErrorBody>(body) {
        if let Some(message) = parsed.error_description.or(parsed.msg).or(parsed.error) {
            return message;
        }
    }
    if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    }
}

fn session_from_user(user: &AuthUser) -> Session {
    Session {
        user_id: UserId::new(user.id.clone()),
        email: user.email.clone(),
    }
}

impl SupabaseClient {
    async fn token_grant(
        &self,
        grant_type: &str,
        payload: serde_json::Value,
    ) -> Result<TokenResponse, BackendError> {
        let url = self.auth_url(&format!("token?grant_type={}", grant_type));
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BackendError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Auth(auth_error_message(status, &body)));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Auth(e.to_string()))
    }

    fn install_session(&self, token: &TokenResponse) -> Session {
        let session = session_from_user(&token.user);
        {
            let mut auth = self.auth_state();
            auth.access_token = Some(token.access_token.clone());
            auth.refresh_token = token.refresh_token.clone();
            auth.session = Some(session.clone());
        }
        let expires_at = Utc::now() + Duration::seconds(token.expires_in as i64);
        self.persist_tokens(token, expires_at);
        self.publish_session(Some(session.clone()));
        session
    }

    fn persist_tokens(&self, token: &TokenResponse, expires_at: DateTime<Utc>) {
        let mut guard = self.lock_store();
        if let Some(store) = guard.as_mut() {
            store.set_access_token(token.access_token.clone());
            if let Some(refresh) = &token.refresh_token {
                store.set_refresh_token(refresh.clone());
            }
            store.set_token_expires(expires_at);
            if let Err(e) = store.save() {
                warn!("failed to persist session tokens: {}", e);
            }
        }
    }

    fn clear_persisted_tokens(&self) {
        let mut guard = self.lock_store();
        if let Some(store) = guard.as_mut() {
            store.clear();
            if let Err(e) = store.save() {
                warn!("failed to clear persisted session tokens: {}", e);
            }
        }
    }

    /// Restore a session from persisted tokens, minting a fresh access token
    /// through the refresh grant (what the browser client does on reload).
    /// A missing or stale refresh token is not an error; the user just signs
    /// in again.
    pub async fn restore_session(&self) -> Result<Option<Session>, BackendError> {
        let refresh_token = {
            let mut guard = self.lock_store();
            match guard.as_mut() {
                Some(store) => {
                    if let Err(e) = store.load() {
                        warn!("failed to read persisted session: {}", e);
                    }
                    store.get_refresh_token().cloned()
                }
                None => None,
            }
        };

        let Some(refresh_token) = refresh_token else {
            debug!("no persisted session to restore");
            return Ok(None);
        };

        let payload = serde_json::json!({ "refresh_token": refresh_token });
        match self.token_grant("refresh_token", payload).await {
            Ok(token) => {
                let session = self.install_session(&token);
                info!("restored session for {}", session.user_id);
                Ok(Some(session))
            }
            Err(e) => {
                warn!("stored session could not be refreshed: {}", e);
                self.clear_persisted_tokens();
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl IdentityService for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let payload = serde_json::json!({ "email": email, "password": password });
        let token = self.token_grant("password", payload).await?;
        let session = self.install_session(&token);
        info!("signed in as {}", session.user_id);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let payload = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BackendError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Auth(auth_error_message(status, &body)));
        }

        info!("registered new account");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let access_token = self.auth_state().access_token.clone();

        // Revoke remotely when possible, but the local session dies either
        // way: sign-out must always return the client to the signed-out
        // state.
        if let Some(token) = access_token {
            let result = self
                .http
                .post(self.auth_url("logout"))
                .header("apikey", &self.anon_key)
                .header("Authorization", format!("Bearer {}", token))
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!("remote sign-out returned {}", response.status());
                }
                Err(e) => warn!("remote sign-out failed: {}", e),
                _ => {}
            }
        }

        *self.auth_state() = Default::default();
        self.clear_persisted_tokens();
        self.publish_session(None);
        info!("signed out");
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.auth_state().session.clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.subscribe_sessions()
    }
}
