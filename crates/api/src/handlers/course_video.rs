//! Handlers for the videos embedded in a course.
//!
//! Every mutation follows the same order: validate the payload, make sure
//! the course exists, resolve the duration (outside any transaction), then
//! rewrite the list under a row lock so concurrent edits cannot lose updates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use courses_core::error::CoreError;
use courses_core::types::DbId;
use courses_core::videos::{CourseVideos, VideoDraft, VideoInput};
use courses_db::models::course::Course;
use courses_db::repositories::CourseRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/courses/{id}/videos
pub async fn create(
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<VideoInput>,
) -> AppResult<(StatusCode, Json<Course>)> {
    let draft = resolve_draft(&state, course_id, &input).await?;

    let mut video_id = String::new();
    let course = mutate_videos(&state, course_id, |videos| {
        video_id = videos.append(draft).id.clone();
        Ok(())
    })
    .await?;

    tracing::info!(course_id, video_id = %video_id, total = %course.total_duration, "Video added");
    Ok((StatusCode::CREATED, Json(course)))
}

/// PUT /api/v1/courses/{id}/videos/{video_id}
pub async fn update(
    State(state): State<AppState>,
    Path((course_id, video_id)): Path<(DbId, String)>,
    Json(input): Json<VideoInput>,
) -> AppResult<Json<Course>> {
    let draft = resolve_draft(&state, course_id, &input).await?;

    let course = mutate_videos(&state, course_id, |videos| videos.replace(&video_id, draft)).await?;

    tracing::info!(course_id, video_id = %video_id, total = %course.total_duration, "Video updated");
    Ok(Json(course))
}

/// DELETE /api/v1/courses/{id}/videos/{video_id}
pub async fn delete(
    State(state): State<AppState>,
    Path((course_id, video_id)): Path<(DbId, String)>,
) -> AppResult<Json<Course>> {
    let course = mutate_videos(&state, course_id, |videos| {
        videos.remove(&video_id).map(|_| ())
    })
    .await?;

    tracing::info!(course_id, video_id = %video_id, total = %course.total_duration, "Video removed");
    Ok(Json(course))
}

/// Validate the payload, confirm the course exists, then look up the
/// video's duration.
async fn resolve_draft(
    state: &AppState,
    course_id: DbId,
    input: &VideoInput,
) -> AppResult<VideoDraft> {
    let fields = input.validate()?;

    if CourseRepo::find_by_id(&state.pool, course_id).await?.is_none() {
        return Err(CoreError::not_found("Course", course_id).into());
    }

    Ok(fields.resolve(state.video_lookup.as_ref()).await)
}

/// Lock the course row, apply `mutate` to its video list, and persist the
/// list with its recomputed total.
///
/// An error from `mutate` drops the transaction, leaving the row untouched.
async fn mutate_videos<F>(state: &AppState, course_id: DbId, mutate: F) -> AppResult<Course>
where
    F: FnOnce(&mut CourseVideos) -> Result<(), CoreError>,
{
    let mut tx = state.pool.begin().await?;

    let course = CourseRepo::find_by_id_for_update(&mut *tx, course_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Course", course_id))?;

    let mut videos = CourseVideos::new(course.videos);
    mutate(&mut videos)?;

    let (videos, total) = videos.into_parts();
    let course = CourseRepo::save_videos(&mut *tx, course_id, &videos, total).await?;
    tx.commit().await?;

    Ok(course)
}
