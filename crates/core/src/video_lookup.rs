//! Duration lookup for externally hosted videos.
//!
//! The network side lives behind the [`VideoLookup`] trait so the collection
//! logic and the HTTP layer can run against a deterministic implementation in
//! tests. This module provides the pure pieces every implementation shares:
//! recognising a YouTube watch link and pulling the duration out of the
//! fetched page.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use crate::duration::VideoDuration;

/// Watch link with an 11-character video id. Searched, not anchored.
static WATCH_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://www\.youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})").expect("valid regex")
});

const DURATION_META_SELECTOR: &str = r#"meta[itemprop="duration"]"#;

/// Resolves the playing time of a video from its URL.
///
/// Implementations are best-effort: any failure (unrecognised URL, network
/// error, missing metadata) yields [`VideoDuration::ZERO`] rather than an
/// error.
#[async_trait]
pub trait VideoLookup: Send + Sync {
    async fn fetch_duration(&self, url: &str) -> VideoDuration;
}

/// A recognised watch link inside a user-supplied URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchUrl<'a> {
    /// The matched link, which is what gets fetched.
    pub url: &'a str,
    /// The 11-character video id.
    pub video_id: &'a str,
}

/// Find the first watch link in `url`, if any.
pub fn match_watch_url(url: &str) -> Option<WatchUrl<'_>> {
    let caps = WATCH_URL_RE.captures(url)?;
    Some(WatchUrl {
        url: caps.get(0)?.as_str(),
        video_id: caps.get(1)?.as_str(),
    })
}

/// Extract the `content` of the first `<meta itemprop="duration">` tag.
pub fn extract_duration_meta(html: &str) -> Option<String> {
    let selector = Selector::parse(DURATION_META_SELECTOR).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

/// Resolve the duration published in a fetched page, or the sentinel.
pub fn duration_from_page(html: &str) -> VideoDuration {
    extract_duration_meta(html)
        .map(|raw| VideoDuration::from_iso8601(&raw))
        .unwrap_or(VideoDuration::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
