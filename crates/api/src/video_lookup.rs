//! HTTP implementation of [`VideoLookup`] using [`reqwest`].
//!
//! Fetches the watch page of a recognised YouTube link and reads the
//! duration published in its metadata. Every failure is logged and resolves
//! to the zero duration.

use std::time::Duration;

use async_trait::async_trait;
use courses_core::duration::VideoDuration;
use courses_core::video_lookup::{duration_from_page, match_watch_url, VideoLookup};

/// Errors from fetching a watch page.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The page responded with a non-2xx status code.
    #[error("Unexpected status {0}")]
    Status(u16),
}

/// Looks up video durations by fetching watch pages over HTTP.
pub struct HttpVideoLookup {
    client: reqwest::Client,
}

impl HttpVideoLookup {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, LookupError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl VideoLookup for HttpVideoLookup {
    async fn fetch_duration(&self, url: &str) -> VideoDuration {
        let Some(watch) = match_watch_url(url) else {
            tracing::debug!(url, "Not a recognised watch link, skipping lookup");
            return VideoDuration::ZERO;
        };

        match self.fetch_page(watch.url).await {
            Ok(html) => {
                let duration = duration_from_page(&html);
                tracing::debug!(video_id = watch.video_id, %duration, "Resolved video duration");
                duration
            }
            Err(e) => {
                tracing::warn!(url = watch.url, error = %e, "Video duration lookup failed");
                VideoDuration::ZERO
            }
        }
    }
}
