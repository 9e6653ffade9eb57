/// Assignment model: a child record of a course
///
/// # Schema
///
/// ```sql
/// CREATE TABLE assignments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     due_date DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Assignment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    /// Unique assignment ID
    pub id: Uuid,

    /// Parent course
    pub course_id: Uuid,

    /// Assignment title
    pub title: String,

    /// What the assignment asks for
    pub description: String,

    /// Due date
    pub due_date: NaiveDate,

    /// When the assignment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating an assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignment {
    /// Parent course
    pub course_id: Uuid,

    /// Assignment title
    pub title: String,

    /// What the assignment asks for
    pub description: String,

    /// Due date
    pub due_date: NaiveDate,
}

/// Input for updating an assignment; only non-None fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAssignment {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New due date
    pub due_date: Option<NaiveDate>,
}

impl Assignment {
    /// Creates a new assignment
    pub async fn create(pool: &PgPool, data: CreateAssignment) -> Result<Self, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (course_id, title, description, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, title, description, due_date, created_at
            "#,
        )
        .bind(data.course_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(assignment)
    }

    /// Finds an assignment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, course_id, title, description, due_date, created_at
            FROM assignments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(assignment)
    }

    /// Lists a course's assignments, soonest due first
    pub async fn list_by_course(pool: &PgPool, course_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, course_id, title, description, due_date, created_at
            FROM assignments
            WHERE course_id = $1
            ORDER BY due_date, created_at
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }

    /// Updates an assignment; returns the updated row if found
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateAssignment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date)
            WHERE id = $1
            RETURNING id, course_id, title, description, due_date, created_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .fetch_optional(pool)
        .await?;

        Ok(assignment)
    }

    /// Deletes an assignment; returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
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
    fn test_update_assignment_default() {
        let update = UpdateAssignment::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert!(update.due_date.is_none());
    }
}
