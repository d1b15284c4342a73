//! Handlers for the `/courses` resource.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use courses_core::error::CoreError;
use courses_core::export::{push_record, COURSE_CSV_HEADER};
use courses_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use courses_core::types::DbId;
use courses_db::models::course::{Course, CourseSummary, CreateCourse, PatchCourse};
use courses_db::repositories::CourseRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::state::AppState;

/// One page of open courses.
#[derive(Debug, Serialize)]
pub struct CoursePage {
    pub items: Vec<CourseSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/v1/courses
///
/// Lists open courses: active and not yet ended.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CoursePage>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = CourseRepo::list_open(&state.pool, limit, offset).await?;
    let total = CourseRepo::count_open(&state.pool).await?;

    Ok(Json(CoursePage {
        items,
        total,
        limit,
        offset,
    }))
}

/// POST /api/v1/courses
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<CourseSummary>)> {
    input.validate()?;
    let course = CourseRepo::create(&state.pool, &input).await?;
    tracing::info!(course_id = course.id, title = %course.title, "Course created");
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// GET /api/v1/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Course>> {
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Course", id))?;
    Ok(Json(course))
}

/// PUT /api/v1/courses/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCourse>,
) -> AppResult<Json<CourseSummary>> {
    input.validate()?;
    let course = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Course", id))?;
    Ok(Json(course.into()))
}

/// PATCH /api/v1/courses/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PatchCourse>,
) -> AppResult<Json<CourseSummary>> {
    if input.is_empty() {
        return Err(AppError::BadRequest(
            "At least one of title, description, ends_at must be provided".to_string(),
        ));
    }
    input.validate()?;
    let course = CourseRepo::patch(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Course", id))?;
    Ok(Json(course.into()))
}

/// DELETE /api/v1/courses/{id}
///
/// Soft delete. The course keeps its videos and can be restored.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CourseRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(course_id = id, "Course deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Course", id).into())
    }
}

/// POST /api/v1/courses/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Course>> {
    if !CourseRepo::restore(&state.pool, id).await? {
        return Err(CoreError::not_found("Deleted course", id).into());
    }
    tracing::info!(course_id = id, "Course restored");

    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Course", id))?;
    Ok(Json(course))
}

/// GET /api/v1/courses/export
///
/// All active courses as CSV, ordered by id.
pub async fn export(State(state): State<AppState>) -> AppResult<Response> {
    let rows = CourseRepo::list_for_export(&state.pool).await?;

    let mut csv = String::new();
    push_record(&mut csv, COURSE_CSV_HEADER);
    for row in &rows {
        push_record(
            &mut csv,
            &[
                row.id.to_string(),
                row.title.clone(),
                row.description.clone(),
                row.ends_at.to_rfc3339(),
                row.total_duration.clone(),
                row.video_count.to_string(),
            ],
        );
    }
    tracing::debug!(rows = rows.len(), "Exported courses");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"courses.csv\"",
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
