use std::sync::Arc;

use courses_core::video_lookup::VideoLookup;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: courses_db::DbPool,
    /// Resolves video durations when videos are added or replaced.
    pub video_lookup: Arc<dyn VideoLookup>,
}
