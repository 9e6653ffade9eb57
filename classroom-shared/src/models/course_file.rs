/// Course file model: an uploaded file attached to a course
///
/// The file body lives in media storage; the row holds the relative media
/// path.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE course_files (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     file_path VARCHAR(512) NOT NULL,
///     uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Course file row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseFile {
    /// Unique file record ID
    pub id: Uuid,

    /// Parent course
    pub course_id: Uuid,

    /// Display title
    pub title: String,

    /// Relative media path of the stored file
    pub file_path: String,

    /// When the file was uploaded
    pub uploaded_at: DateTime<Utc>,
}

/// Input for recording an uploaded course file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseFile {
    /// Parent course
    pub course_id: Uuid,

    /// Display title
    pub title: String,

    /// Relative media path of the stored file
    pub file_path: String,
}

impl CourseFile {
    /// Records an uploaded file
    pub async fn create(pool: &PgPool, data: CreateCourseFile) -> Result<Self, sqlx::Error> {
        let file = sqlx::query_as::<_, CourseFile>(
            r#"
            INSERT INTO course_files (course_id, title, file_path)
            VALUES ($1, $2, $3)
            RETURNING id, course_id, title, file_path, uploaded_at
            "#,
        )
        .bind(data.course_id)
        .bind(data.title)
        .bind(data.file_path)
        .fetch_one(pool)
        .await?;

        Ok(file)
    }

    /// Finds a file record by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let file = sqlx::query_as::<_, CourseFile>(
            r#"
            SELECT id, course_id, title, file_path, uploaded_at
            FROM course_files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(file)
    }

    /// Lists a course's files, newest first
    pub async fn list_by_course(pool: &PgPool, course_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let files = sqlx::query_as::<_, CourseFile>(
            r#"
            SELECT id, course_id, title, file_path, uploaded_at
            FROM course_files
            WHERE course_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(files)
    }

    /// Deletes a file record; returns true if a row was deleted
    ///
    /// The stored file itself is removed by the caller through the media
    /// store.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM course_files WHERE id = $1")
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
    fn test_course_file_serialization() {
        let file = CourseFile {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            title: "Syllabus".to_string(),
            file_path: "course_files/abc_syllabus.pdf".to_string(),
            uploaded_at: Utc::now(),
        };

        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("file_path"));
        assert!(json.contains("Syllabus"));
    }
}
