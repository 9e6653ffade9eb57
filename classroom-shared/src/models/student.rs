/// Student profile model
///
/// At most one student profile exists per user (`user_id` is UNIQUE).
/// Students are linked to courses through enrollments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE students (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     enrollment_year INTEGER NOT NULL,
///     grade VARCHAR(10) NOT NULL,
///     section VARCHAR(5),
///     parent_contact VARCHAR(15),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Student profile row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    /// Unique profile ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Year the student joined the institution
    pub enrollment_year: i32,

    /// Grade/class label
    pub grade: String,

    /// Section within the grade
    pub section: Option<String>,

    /// Guardian contact number
    pub parent_contact: Option<String>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a student profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudent {
    /// Owning user
    pub user_id: Uuid,

    /// Year the student joined
    pub enrollment_year: i32,

    /// Grade/class label
    pub grade: String,

    /// Section within the grade
    pub section: Option<String>,

    /// Guardian contact number
    pub parent_contact: Option<String>,
}

impl Student {
    /// Creates a student profile
    ///
    /// # Errors
    ///
    /// Fails on the unique `user_id` constraint when the user already has a
    /// student profile.
    pub async fn create(pool: &PgPool, data: CreateStudent) -> Result<Self, sqlx::Error> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (user_id, enrollment_year, grade, section, parent_contact)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, enrollment_year, grade, section, parent_contact, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.enrollment_year)
        .bind(data.grade)
        .bind(data.section)
        .bind(data.parent_contact)
        .fetch_one(pool)
        .await?;

        Ok(student)
    }

    /// Finds a student profile by its ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, user_id, enrollment_year, grade, section, parent_contact, created_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(student)
    }

    /// Finds the student profile owned by a user, if any
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, user_id, enrollment_year, grade, section, parent_contact, created_at
            FROM students
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_student_struct() {
        let create = CreateStudent {
            user_id: Uuid::new_v4(),
            enrollment_year: 2024,
            grade: "10".to_string(),
            section: Some("A".to_string()),
            parent_contact: None,
        };

        assert_eq!(create.enrollment_year, 2024);
        assert_eq!(create.grade, "10");
    }
}
