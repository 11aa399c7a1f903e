use async_trait::async_trait;
use tracing::debug;
use urlencoding::encode;

use crate::error::BackendError;
use crate::supabase::client::{response_error_message, SupabaseClient};
use crate::traits::ObjectStore;

/// Percent-encode each path segment while keeping the `/` separators, so an
/// owner-scoped key like `user-1/1716300000-poster one.jpg` stays a nested
/// object path.
pub(crate) fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ObjectStore for SupabaseClient {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError> {
        let url = self.object_url(&self.poster_bucket, &encode_object_path(path));
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer_token()))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| BackendError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Upload(response_error_message(status, &body)));
        }

        debug!("uploaded poster object {}", path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.public_object_url(&self.poster_bucket, &encode_object_path(path))
    }
}
