//! REST client for the object-store HTTP endpoints.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use uuid::Uuid;
use viralthumb_core::types::AccountId;

/// HTTP client for a single object-store bucket.
pub struct StorageApi {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

/// A stored object: its stable public URL and bucket-relative path.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub public_url: String,
    pub storage_path: String,
}

/// Errors from the object-store layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("Object store error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The payload was not a decodable inline image.
    #[error("Invalid inline image payload: {0}")]
    InvalidPayload(String),
}

impl StorageApi {
    /// Create a new client for one bucket.
    ///
    /// * `base_url`    - Store base URL, e.g. `https://project.example.co`.
    /// * `bucket`      - Target bucket name.
    /// * `service_key` - Bearer token authorized to write the bucket.
    pub fn new(base_url: String, bucket: String, service_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            bucket,
            service_key,
        }
    }

    /// Upload one inline-encoded image, returning its durable reference.
    ///
    /// Objects are keyed `{account_id}/{item_id}.png` so one account's
    /// uploads never collide with another's. Re-uploading the same key
    /// overwrites (`x-upsert`).
    pub async fn store_object(
        &self,
        account_id: AccountId,
        item_id: Uuid,
        data_url: &str,
    ) -> Result<StoredObject, StorageApiError> {
        let (mime, payload) = split_data_url(data_url)?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| StorageApiError::InvalidPayload(e.to_string()))?;

        let storage_path = format!("{account_id}/{item_id}.png");

        tracing::debug!(
            path = %storage_path,
            bytes = bytes.len(),
            mime = %mime,
            "Uploading image to object store",
        );

        let response = self
            .client
            .post(format!(
                "{}/storage/v1/object/{}/{storage_path}",
                self.base_url, self.bucket
            ))
            .bearer_auth(&self.service_key)
            .header("content-type", mime)
            .header("x-upsert", "true")
            .header("cache-control", "3600")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageApiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(StoredObject {
            public_url: format!(
                "{}/storage/v1/object/public/{}/{storage_path}",
                self.base_url, self.bucket
            ),
            storage_path,
        })
    }
}

/// Split a `data:<mime>;base64,<payload>` URL into its parts.
fn split_data_url(data_url: &str) -> Result<(String, &str), StorageApiError> {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(mime, payload)| {
            let mime = if mime.is_empty() { "image/png" } else { mime };
            (mime.to_string(), payload)
        })
        .ok_or_else(|| {
            StorageApiError::InvalidPayload(
                "expected a data URL of the form data:<mime>;base64,<payload>".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_data_url_extracts_mime_and_payload() {
        let (mime, payload) = split_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "aGVsbG8=");
    }

    #[test]
    fn split_data_url_defaults_missing_mime() {
        let (mime, _) = split_data_url("data:;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn split_data_url_rejects_plain_urls() {
        assert!(split_data_url("https://example.com/a.png").is_err());
        assert!(split_data_url("data:image/png,not-base64-marker").is_err());
    }
}
