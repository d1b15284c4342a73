pub mod course;
pub mod course_video;
