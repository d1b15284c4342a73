pub mod course;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /courses                                   list, create
/// /courses/export                            CSV export
/// /courses/{id}                              get, update, patch, delete
/// /courses/{id}/restore                      restore (POST)
/// /courses/{id}/videos                       add video (POST)
/// /courses/{id}/videos/{video_id}            update, remove video
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/courses", course::router())
}
