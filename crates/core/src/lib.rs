//! Domain logic for the courses service.
//!
//! Everything here is free of HTTP and database concerns: duration parsing
//! and aggregation, the embedded video-list rules, and the lookup capability
//! used to resolve video durations.

pub mod duration;
pub mod error;
pub mod export;
pub mod pagination;
pub mod types;
pub mod video_lookup;
pub mod videos;
