//! Firebase Storage client: image upload, download URLs, deletion.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{error_from_response, FirebaseError};
use crate::config::Config;
use crate::constants::IMAGE_KEY_PREFIX;

/// Client for the Firebase Storage object API, scoped to one bucket.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

/// Object metadata returned by a media upload. Only the download token
/// matters here; the rest of the envelope is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    #[serde(default)]
    download_tokens: Option<String>,
}

impl StorageClient {
    #[must_use]
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.storage_base_url.clone(),
            bucket: config.firebase_storage_bucket.clone(),
        }
    }

    /// Upload bytes under the given object key and return the download URL
    /// to store on the post.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the call fails.
    pub async fn upload_bytes(
        &self,
        data: &[u8],
        object_key: &str,
        content_type: &str,
        id_token: Option<&str>,
    ) -> Result<String, FirebaseError> {
        debug!(key = %object_key, content_type = %content_type, "Uploading object");

        let url = format!("{}/v0/b/{}/o", self.base_url, self.bucket);
        let mut request = self
            .http
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object_key)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data.to_vec());
        if let Some(token) = id_token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Firebase {token}"));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let metadata: UploadResponse = response.json().await?;

        // Tokens can be a comma-separated list; any one of them works.
        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .map(ToString::to_string);
        Ok(self.download_url(object_key, token.as_deref()))
    }

    /// Delete an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete request fails, including when the
    /// object is already gone; callers doing best-effort cleanup log and
    /// move on.
    pub async fn delete_object(
        &self,
        object_key: &str,
        id_token: Option<&str>,
    ) -> Result<(), FirebaseError> {
        debug!(key = %object_key, "Deleting object");

        let url = format!(
            "{}/v0/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(object_key)
        );
        let mut request = self.http.delete(&url);
        if let Some(token) = id_token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Firebase {token}"));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    /// Public download URL for an object, token-authorized when one exists.
    #[must_use]
    pub fn download_url(&self, object_key: &str, token: Option<&str>) -> String {
        let encoded = urlencoding::encode(object_key);
        match token {
            Some(token) => format!(
                "{}/v0/b/{}/o/{encoded}?alt=media&token={token}",
                self.base_url, self.bucket
            ),
            None => format!("{}/v0/b/{}/o/{encoded}?alt=media", self.base_url, self.bucket),
        }
    }

    /// Extract the object key from a download URL addressing this bucket.
    ///
    /// Posts store full download URLs, so deletion has to work backwards to
    /// the key. Returns `None` for URLs that point anywhere else.
    #[must_use]
    pub fn object_key_from_url(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let marker = format!("/v0/b/{}/o/", self.bucket);
        let encoded_key = parsed.path().strip_prefix(marker.as_str())?;
        if encoded_key.is_empty() {
            return None;
        }
        urlencoding::decode(encoded_key)
            .ok()
            .map(|key| key.into_owned())
    }
}

/// Storage key for a newly uploaded image: prefix, upload time in
/// milliseconds, original filename.
#[must_use]
pub fn image_object_key(filename: &str, uploaded_at: DateTime<Utc>) -> String {
    format!(
        "{IMAGE_KEY_PREFIX}/{}_{filename}",
        uploaded_at.timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> StorageClient {
        let config = Config {
            firebase_storage_bucket: "demo.firebasestorage.app".to_string(),
            storage_base_url: "https://firebasestorage.googleapis.com".to_string(),
            ..Config::for_testing()
        };
        StorageClient::new(&config, reqwest::Client::new())
    }

    #[test]
    fn test_image_object_key() {
        let uploaded_at = DateTime::from_timestamp_millis(1_736_000_000_000).unwrap();
        assert_eq!(
            image_object_key("cat.png", uploaded_at),
            "blog-images/1736000000000_cat.png"
        );
    }

    #[test]
    fn test_download_url_with_token() {
        let client = test_client();
        assert_eq!(
            client.download_url("blog-images/1_cat.png", Some("tok-1")),
            "https://firebasestorage.googleapis.com/v0/b/demo.firebasestorage.app/o/blog-images%2F1_cat.png?alt=media&token=tok-1"
        );
    }

    #[test]
    fn test_object_key_round_trip() {
        let client = test_client();
        let url = client.download_url("blog-images/1736000000000_cat.png", Some("tok"));
        assert_eq!(
            client.object_key_from_url(&url),
            Some("blog-images/1736000000000_cat.png".to_string())
        );
    }

    #[test]
    fn test_object_key_rejects_foreign_urls() {
        let client = test_client();
        assert_eq!(client.object_key_from_url("https://example.com/cat.png"), None);
        assert_eq!(
            client.object_key_from_url(
                "https://firebasestorage.googleapis.com/v0/b/other-bucket/o/cat.png?alt=media"
            ),
            None
        );
        assert_eq!(client.object_key_from_url("not a url"), None);
    }
}
