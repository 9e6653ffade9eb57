/// Course model and database operations
///
/// A course is owned by exactly one teacher and has assignments,
/// announcements, and files as child records. `total_lessons` seeds the
/// progress rows created on enrollment.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE courses (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     start_date DATE NOT NULL,
///     end_date DATE NOT NULL,
///     total_lessons INTEGER NOT NULL CHECK (total_lessons > 0),
///     thumbnail VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Course row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    /// Unique course ID
    pub id: Uuid,

    /// Owning teacher profile
    pub teacher_id: Uuid,

    /// Course title
    pub title: String,

    /// Course description
    pub description: Option<String>,

    /// First day of the course
    pub start_date: NaiveDate,

    /// Last day of the course
    pub end_date: NaiveDate,

    /// Number of lessons; progress rows are seeded with this count
    pub total_lessons: i32,

    /// Media path of the thumbnail image, if uploaded
    pub thumbnail: Option<String>,

    /// When the course was created
    pub created_at: DateTime<Utc>,

    /// When the course was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourse {
    /// Owning teacher profile
    pub teacher_id: Uuid,

    /// Course title
    pub title: String,

    /// Course description
    pub description: Option<String>,

    /// First day of the course
    pub start_date: NaiveDate,

    /// Last day of the course
    pub end_date: NaiveDate,

    /// Number of lessons
    pub total_lessons: i32,
}

/// Input for updating a course
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourse {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New start date
    pub start_date: Option<NaiveDate>,

    /// New end date
    pub end_date: Option<NaiveDate>,

    /// New lesson count
    pub total_lessons: Option<i32>,
}

impl Course {
    /// Creates a new course
    pub async fn create(pool: &PgPool, data: CreateCourse) -> Result<Self, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (teacher_id, title, description, start_date, end_date, total_lessons)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, teacher_id, title, description, start_date, end_date, total_lessons,
                      thumbnail, created_at, updated_at
            "#,
        )
        .bind(data.teacher_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.total_lessons)
        .fetch_one(pool)
        .await?;

        Ok(course)
    }

    /// Finds a course by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, teacher_id, title, description, start_date, end_date, total_lessons,
                   thumbnail, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(course)
    }

    /// Lists all courses, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, teacher_id, title, description, start_date, end_date, total_lessons,
                   thumbnail, created_at, updated_at
            FROM courses
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(courses)
    }

    /// Lists courses owned by a teacher, newest first
    pub async fn list_by_teacher(
        pool: &PgPool,
        teacher_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, teacher_id, title, description, start_date, end_date, total_lessons,
                   thumbnail, created_at, updated_at
            FROM courses
            WHERE teacher_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(teacher_id)
        .fetch_all(pool)
        .await?;

        Ok(courses)
    }

    /// Updates a course
    ///
    /// Only non-None fields in `data` are written; `updated_at` is stamped.
    /// Returns the updated course if found, None otherwise.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCourse,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE courses SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.end_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", end_date = ${}", bind_count));
        }
        if data.total_lessons.is_some() {
            bind_count += 1;
            query.push_str(&format!(", total_lessons = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, teacher_id, title, description, start_date, end_date, \
             total_lessons, thumbnail, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Course>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            q = q.bind(end_date);
        }
        if let Some(total_lessons) = data.total_lessons {
            q = q.bind(total_lessons);
        }

        let course = q.fetch_optional(pool).await?;

        Ok(course)
    }

    /// Records the media path of the course thumbnail
    pub async fn set_thumbnail(
        pool: &PgPool,
        id: Uuid,
        path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET thumbnail = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, teacher_id, title, description, start_date, end_date, total_lessons,
                      thumbnail, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(path)
        .fetch_optional(pool)
        .await?;

        Ok(course)
    }

    /// Deletes a course by ID
    ///
    /// Cascades to enrollments, progress, certificates, and child records.
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_course_default() {
        let update = UpdateCourse::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.start_date.is_none());
        assert!(update.end_date.is_none());
        assert!(update.total_lessons.is_none());
    }

    #[test]
    fn test_course_serialization() {
        let course = Course {
            id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            title: "Algebra I".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            total_lessons: 40,
            thumbnail: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&course).unwrap();
        assert!(json.contains("Algebra I"));
        assert!(json.contains("total_lessons"));
    }
}
