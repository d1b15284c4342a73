//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a `&mut PgConnection` inside a caller-owned
//! transaction) as the first argument.

pub mod course_repo;

pub use course_repo::CourseRepo;
