/// Teacher profile model
///
/// At most one teacher profile exists per user (`user_id` is UNIQUE). A
/// teacher owns zero or more courses.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teachers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     experience INTEGER,
///     qualifications TEXT,
///     subjects_taught VARCHAR(255),
///     joining_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Teacher profile row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teacher {
    /// Unique profile ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Years of teaching experience
    pub experience: Option<i32>,

    /// Qualifications, free-form
    pub qualifications: Option<String>,

    /// Subjects taught, free-form
    pub subjects_taught: Option<String>,

    /// Date of joining the institution
    pub joining_date: Option<NaiveDate>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a teacher profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeacher {
    /// Owning user
    pub user_id: Uuid,

    /// Years of teaching experience
    pub experience: Option<i32>,

    /// Qualifications
    pub qualifications: Option<String>,

    /// Subjects taught
    pub subjects_taught: Option<String>,

    /// Date of joining
    pub joining_date: Option<NaiveDate>,
}

impl Teacher {
    /// Creates a teacher profile
    ///
    /// # Errors
    ///
    /// Fails on the unique `user_id` constraint when the user already has a
    /// teacher profile.
    pub async fn create(pool: &PgPool, data: CreateTeacher) -> Result<Self, sqlx::Error> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (user_id, experience, qualifications, subjects_taught, joining_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, experience, qualifications, subjects_taught, joining_date, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.experience)
        .bind(data.qualifications)
        .bind(data.subjects_taught)
        .bind(data.joining_date)
        .fetch_one(pool)
        .await?;

        Ok(teacher)
    }

    /// Finds a teacher profile by its ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, user_id, experience, qualifications, subjects_taught, joining_date, created_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(teacher)
    }

    /// Finds the teacher profile owned by a user, if any
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, user_id, experience, qualifications, subjects_taught, joining_date, created_at
            FROM teachers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher_defaults() {
        let create = CreateTeacher {
            user_id: Uuid::new_v4(),
            ..Default::default()
        };

        assert!(create.experience.is_none());
        assert!(create.qualifications.is_none());
        assert!(create.subjects_taught.is_none());
        assert!(create.joining_date.is_none());
    }
}
