//! Repository for the `courses` table.

use courses_core::duration::VideoDuration;
use courses_core::types::DbId;
use courses_core::videos::Video;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::course::{Course, CourseExportRow, CourseSummary, CreateCourse, PatchCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, ends_at, videos, total_duration, \
                       deleted_at, created_at, updated_at";

/// Columns of [`CourseSummary`].
const SUMMARY_COLUMNS: &str = "id, title, description, ends_at";

/// Filter selecting courses that are active and have not ended yet.
const OPEN_FILTER: &str = "deleted_at IS NULL AND ends_at >= NOW()";

/// Provides CRUD operations for courses and their embedded videos.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, description, ends_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.ends_at)
            .fetch_one(pool)
            .await
    }

    /// Find a course by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a course by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List open courses (active, not yet ended), oldest first.
    pub async fn list_open(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CourseSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM courses
             WHERE {OPEN_FILTER}
             ORDER BY created_at ASC, id ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, CourseSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count open courses, for pagination totals.
    pub async fn count_open(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM courses WHERE {OPEN_FILTER}");
        sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
    }

    /// Replace every scalar field of a course.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = $2,
                description = $3,
                ends_at = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.ends_at)
            .fetch_optional(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn patch(
        pool: &PgPool,
        id: DbId,
        input: &PatchCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                ends_at = COALESCE($4, ends_at)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.ends_at)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a course by ID. Returns `true` if a row was marked deleted.
    ///
    /// The embedded video list is left untouched.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted course. Returns `true` if a row was restored.
    ///
    /// Fails with a unique violation on `uq_courses_title_active` if an
    /// active course already uses the same title.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All active courses, flattened for CSV export, ordered by ID.
    pub async fn list_for_export(pool: &PgPool) -> Result<Vec<CourseExportRow>, sqlx::Error> {
        sqlx::query_as::<_, CourseExportRow>(
            "SELECT id, title, description, ends_at, total_duration,
                    jsonb_array_length(videos) AS video_count
             FROM courses
             WHERE deleted_at IS NULL
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    // ---- video list (read-modify-write inside a caller-owned transaction) ----

    /// Load an active course and lock its row until the transaction ends.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Persist a course's video list together with its total duration.
    pub async fn save_videos(
        conn: &mut PgConnection,
        id: DbId,
        videos: &[Video],
        total_duration: VideoDuration,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET videos = $2, total_duration = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(Json(videos))
            .bind(total_duration.to_string())
            .fetch_one(conn)
            .await
    }
}
