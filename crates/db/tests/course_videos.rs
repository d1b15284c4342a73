//! Integration tests for the locked read-modify-write of a course's videos.

use chrono::{Duration, Utc};
use courses_core::videos::{CourseVideos, VideoDraft};
use courses_db::models::course::CreateCourse;
use courses_db::repositories::CourseRepo;
use sqlx::PgPool;

fn new_course(title: &str) -> CreateCourse {
    CreateCourse {
        title: Some(title.to_string()),
        description: Some("video list test".to_string()),
        ends_at: Some(Utc::now() + Duration::days(7)),
    }
}

fn draft(title: &str, duration: &str) -> VideoDraft {
    VideoDraft {
        title: title.to_string(),
        url: format!("https://example.com/{title}"),
        duration: duration.parse().unwrap(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_append_and_persist_in_transaction(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("Tx")).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = CourseRepo::find_by_id_for_update(&mut *tx, course.id)
        .await
        .unwrap()
        .unwrap();
    let mut list = CourseVideos::new(locked.videos);
    list.append(draft("a", "0:45:30"));
    list.append(draft("b", "0:30:40"));
    let (videos, total) = list.into_parts();
    let saved = CourseRepo::save_videos(&mut *tx, course.id, &videos, total)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(saved.total_duration.to_string(), "1:16:10");

    let reloaded = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    let titles: Vec<&str> = reloaded.videos.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);
    assert_eq!(reloaded.total_duration.to_string(), "1:16:10");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rolled_back_transaction_leaves_course_untouched(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("Rollback")).await.unwrap();

    {
        let mut tx = pool.begin().await.unwrap();
        let mut list = CourseVideos::new(Vec::new());
        list.append(draft("a", "1:0:0"));
        let (videos, total) = list.into_parts();
        CourseRepo::save_videos(&mut *tx, course.id, &videos, total)
            .await
            .unwrap();
        // Dropped without commit.
    }

    let reloaded = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    assert!(reloaded.videos.is_empty());
    assert_eq!(reloaded.total_duration.to_string(), "0:0:0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_locking_skips_deleted_courses(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("Deleted")).await.unwrap();
    CourseRepo::soft_delete(&pool, course.id).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = CourseRepo::find_by_id_for_update(&mut *tx, course.id)
        .await
        .unwrap();
    assert!(locked.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_video_order_survives_round_trip(pool: PgPool) {
    let course = CourseRepo::create(&pool, &new_course("Order")).await.unwrap();

    let mut list = CourseVideos::new(Vec::new());
    for name in ["z", "a", "m", "b"] {
        list.append(draft(name, "0:1:0"));
    }
    let (videos, total) = list.into_parts();

    let mut conn = pool.acquire().await.unwrap();
    CourseRepo::save_videos(&mut *conn, course.id, &videos, total)
        .await
        .unwrap();

    let reloaded = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    assert_eq!(reloaded.videos, videos);
    assert_eq!(reloaded.total_duration.to_string(), "0:4:0");
}
