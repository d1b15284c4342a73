//! Route definitions for the `/courses` resource, including the videos
//! embedded in each course.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{course, course_video};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /export                            -> export
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// PATCH  /{id}                              -> patch
/// DELETE /{id}                              -> delete
/// POST   /{id}/restore                      -> restore
///
/// POST   /{id}/videos                       -> create
/// PUT    /{id}/videos/{video_id}            -> update
/// DELETE /{id}/videos/{video_id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course::list).post(course::create))
        .route("/export", get(course::export))
        .route(
            "/{id}",
            get(course::get_by_id)
                .put(course::update)
                .patch(course::patch)
                .delete(course::delete),
        )
        .route("/{id}/restore", post(course::restore))
        .route("/{id}/videos", post(course_video::create))
        .route(
            "/{id}/videos/{video_id}",
            put(course_video::update).delete(course_video::delete),
        )
}
