/// Announcement model: a child record of a course
///
/// # Schema
///
/// ```sql
/// CREATE TABLE announcements (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     message TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Announcement row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Announcement {
    /// Unique announcement ID
    pub id: Uuid,

    /// Parent course
    pub course_id: Uuid,

    /// Announcement title
    pub title: String,

    /// Announcement body
    pub message: String,

    /// When the announcement was posted
    pub created_at: DateTime<Utc>,
}

/// Input for creating an announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAnnouncement {
    /// Parent course
    pub course_id: Uuid,

    /// Announcement title
    pub title: String,

    /// Announcement body
    pub message: String,
}

/// Input for updating an announcement; only non-None fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAnnouncement {
    /// New title
    pub title: Option<String>,

    /// New body
    pub message: Option<String>,
}

impl Announcement {
    /// Creates a new announcement
    pub async fn create(pool: &PgPool, data: CreateAnnouncement) -> Result<Self, sqlx::Error> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (course_id, title, message)
            VALUES ($1, $2, $3)
            RETURNING id, course_id, title, message, created_at
            "#,
        )
        .bind(data.course_id)
        .bind(data.title)
        .bind(data.message)
        .fetch_one(pool)
        .await?;

        Ok(announcement)
    }

    /// Finds an announcement by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, course_id, title, message, created_at
            FROM announcements
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(announcement)
    }

    /// Lists a course's announcements, newest first
    pub async fn list_by_course(pool: &PgPool, course_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let announcements = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, course_id, title, message, created_at
            FROM announcements
            WHERE course_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(announcements)
    }

    /// Updates an announcement; returns the updated row if found
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateAnnouncement,
    ) -> Result<Option<Self>, sqlx::Error> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            UPDATE announcements
            SET title = COALESCE($2, title),
                message = COALESCE($3, message)
            WHERE id = $1
            RETURNING id, course_id, title, message, created_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.message)
        .fetch_optional(pool)
        .await?;

        Ok(announcement)
    }

    /// Deletes an announcement; returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
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
    fn test_update_announcement_default() {
        let update = UpdateAnnouncement::default();
        assert!(update.title.is_none());
        assert!(update.message.is_none());
    }
}
