//! Embedded video lists owned by a course.
//!
//! A course stores its videos as an ordered list together with the aggregate
//! [`total_duration`](CourseVideos::total_duration). [`CourseVideos`] is the
//! only way the list is mutated, and every successful mutation recomputes the
//! total before returning, so the two can be persisted together.
//!
//! Durations are resolved ahead of the mutation through [`VideoFields::resolve`]
//! so that no network work happens while a course row is locked.

use serde::{Deserialize, Serialize};

use crate::duration::{self, VideoDuration};
use crate::error::CoreError;
use crate::video_lookup::VideoLookup;

/// A single video entry embedded in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Opaque identifier (UUID v4), fixed at creation time.
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub duration: VideoDuration,
}

/// Request payload for creating or replacing a video.
///
/// Fields are optional so that a missing field surfaces as a validation
/// error instead of a deserialisation rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInput {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Title and URL that passed validation, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFields {
    pub title: String,
    pub url: String,
}

/// A validated video whose duration has already been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDraft {
    pub title: String,
    pub url: String,
    pub duration: VideoDuration,
}

impl VideoInput {
    /// Check that `title` and `url` are present and not blank.
    pub fn validate(&self) -> Result<VideoFields, CoreError> {
        Ok(VideoFields {
            title: required_field(self.title.as_deref(), "title")?,
            url: required_field(self.url.as_deref(), "url")?,
        })
    }
}

fn required_field(value: Option<&str>, name: &str) -> Result<String, CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(format!("{name} is required"))),
    }
}

impl VideoFields {
    /// Look up the video's duration. Lookup failures resolve to the sentinel.
    pub async fn resolve(self, lookup: &dyn VideoLookup) -> VideoDraft {
        let duration = lookup.fetch_duration(&self.url).await;
        VideoDraft {
            title: self.title,
            url: self.url,
            duration,
        }
    }
}

impl VideoDraft {
    fn into_video(self, id: String) -> Video {
        Video {
            id,
            title: self.title,
            url: self.url,
            duration: self.duration,
        }
    }
}

/// A course's video list together with its aggregate duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseVideos {
    videos: Vec<Video>,
    total_duration: VideoDuration,
}

impl CourseVideos {
    /// Wrap a stored list, recomputing the total from its entries.
    pub fn new(videos: Vec<Video>) -> Self {
        let total_duration = duration::total(videos.iter().map(|v| &v.duration));
        Self {
            videos,
            total_duration,
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn total_duration(&self) -> VideoDuration {
        self.total_duration
    }

    pub fn into_parts(self) -> (Vec<Video>, VideoDuration) {
        (self.videos, self.total_duration)
    }

    /// Append a new video with a freshly generated id.
    ///
    /// Returns the stored entry.
    pub fn append(&mut self, draft: VideoDraft) -> &Video {
        let id = uuid::Uuid::new_v4().to_string();
        self.videos.push(draft.into_video(id));
        self.recompute();
        let last = self.videos.len() - 1;
        &self.videos[last]
    }

    /// Replace every entry whose id equals `video_id`, keeping its position.
    ///
    /// Fails with [`CoreError::NotFound`] and leaves the list untouched if no
    /// entry matched.
    pub fn replace(&mut self, video_id: &str, draft: VideoDraft) -> Result<(), CoreError> {
        let mut found = false;
        let replaced: Vec<Video> = self
            .videos
            .iter()
            .map(|v| {
                if v.id == video_id {
                    found = true;
                    draft.clone().into_video(video_id.to_string())
                } else {
                    v.clone()
                }
            })
            .collect();

        if !found {
            return Err(CoreError::not_found("Video", video_id));
        }
        self.videos = replaced;
        self.recompute();
        Ok(())
    }

    /// Remove every entry whose id equals `video_id`.
    ///
    /// Fails with [`CoreError::NotFound`] and leaves the list untouched if
    /// nothing was removed. Returns the number of removed entries.
    pub fn remove(&mut self, video_id: &str) -> Result<usize, CoreError> {
        let before = self.videos.len();
        let kept: Vec<Video> = self
            .videos
            .iter()
            .filter(|v| v.id != video_id)
            .cloned()
            .collect();

        let removed = before - kept.len();
        if removed == 0 {
            return Err(CoreError::not_found("Video", video_id));
        }
        self.videos = kept;
        self.recompute();
        Ok(removed)
    }

    fn recompute(&mut self) {
        self.total_duration = duration::total(self.videos.iter().map(|v| &v.duration));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
