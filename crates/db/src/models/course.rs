//! Course entity model and DTOs.

use courses_core::duration::VideoDuration;
use courses_core::types::{DbId, Timestamp};
use courses_core::videos::Video;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A full course row from the `courses` table, including its videos.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub ends_at: Timestamp,
    /// Ordered video entries, stored as a JSONB array.
    #[sqlx(json)]
    pub videos: Vec<Video>,
    /// Aggregate of every video's duration.
    #[sqlx(try_from = "String")]
    pub total_duration: VideoDuration,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The scalar fields of a course, as returned by list and write endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseSummary {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub ends_at: Timestamp,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            ends_at: course.ends_at,
        }
    }
}

/// DTO for creating a course, also used for full (`PUT`) updates.
///
/// Fields are optional at the type level so a missing field is reported by
/// validation rather than rejected during deserialisation. Text fields must
/// not be blank; titles are capped at 255 characters to match `VARCHAR(255)`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(required, length(max = 255), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(required)]
    pub ends_at: Option<Timestamp>,
}

/// DTO for a partial (`PATCH`) update. Only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchCourse {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub ends_at: Option<Timestamp>,
}

impl PatchCourse {
    /// `true` when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.ends_at.is_none()
    }
}

/// Reject empty or whitespace-only text.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// A course flattened for CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct CourseExportRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub ends_at: Timestamp,
    pub total_duration: String,
    pub video_count: i32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
