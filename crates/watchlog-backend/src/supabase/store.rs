use async_trait::async_trait;
use tracing::{debug, info};
use watchlog_models::{Movie, MovieId, MoviePatch, NewMovie, UserId};

use crate::error::BackendError;
use crate::supabase::client::{response_error_message, SupabaseClient};
use crate::traits::{InsertOutcome, MovieStore};

pub(crate) const MOVIES_TABLE: &str = "movies";

/// `id=eq.{id}` AND `user_id=eq.{owner}`: owner scoping on every mutating
/// call, independent of the server's own row policy.
pub(crate) fn row_scope(id: MovieId, owner: &UserId) -> [(String, String); 2] {
    [
        ("id".to_string(), format!("eq.{}", id)),
        ("user_id".to_string(), format!("eq.{}", owner)),
    ]
}

pub(crate) fn owner_scope(owner: &UserId) -> [(String, String); 1] {
    [("user_id".to_string(), format!("eq.{}", owner))]
}

#[async_trait]
impl MovieStore for SupabaseClient {
    async fn fetch_for_owner(&self, owner: &UserId) -> Result<Vec<Movie>, BackendError> {
        let response = self
            .http
            .get(self.rest_url(MOVIES_TABLE))
            .query(&[("select", "*"), ("order", "id.desc")])
            .query(&owner_scope(owner))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| BackendError::RemoteRead(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RemoteRead(response_error_message(status, &body)));
        }

        let rows: Vec<Movie> = response
            .json()
            .await
            .map_err(|e| BackendError::RemoteRead(e.to_string()))?;
        debug!("fetched {} watchlist rows", rows.len());
        Ok(rows)
    }

    async fn insert(&self, row: &NewMovie) -> Result<InsertOutcome, BackendError> {
        let response = self
            .http
            .post(self.rest_url(MOVIES_TABLE))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| BackendError::RemoteWrite(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RemoteWrite(response_error_message(status, &body)));
        }

        // `return=representation` is a preference, not a promise. An empty
        // or unparsable body is the NotEchoed outcome and the caller
        // reloads.
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<Vec<Movie>>(&body) {
            Ok(mut rows) if !rows.is_empty() => {
                let movie = rows.remove(0);
                info!("inserted movie {} (\"{}\")", movie.id, movie.title);
                Ok(InsertOutcome::Created(movie))
            }
            _ => {
                debug!("insert accepted without a row echo");
                Ok(InsertOutcome::NotEchoed)
            }
        }
    }

    async fn update(
        &self,
        id: MovieId,
        owner: &UserId,
        patch: &MoviePatch,
    ) -> Result<(), BackendError> {
        let response = self
            .http
            .patch(self.rest_url(MOVIES_TABLE))
            .query(&row_scope(id, owner))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .json(&patch.to_update_body())
            .send()
            .await
            .map_err(|e| BackendError::RemoteWrite(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RemoteWrite(response_error_message(status, &body)));
        }

        debug!("updated movie {}", id);
        Ok(())
    }

    async fn delete(&self, id: MovieId, owner: &UserId) -> Result<(), BackendError> {
        let response = self
            .http
            .delete(self.rest_url(MOVIES_TABLE))
            .query(&row_scope(id, owner))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .send()
            .await
            .map_err(|e| BackendError::RemoteWrite(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RemoteWrite(response_error_message(status, &body)));
        }

        info!("deleted movie {}", id);
        Ok(())
    }
}
