/// Progress model and the completion rule
///
/// One progress row exists per (student, course) pair, created by
/// [`crate::models::enrollment::Enrollment::enroll`]. Updating
/// `completed_lessons` applies the completion rule: once the completed
/// count reaches `total_lessons`, `is_completed` flips on and
/// `completion_date` is stamped with the current date. Completion is
/// sticky; lowering the count afterwards does not clear it.
///
/// Certificate issuance on completion is driven by the caller (see
/// [`crate::models::certificate`]), which needs to know whether a save
/// *transitioned* into the completed state.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE progress (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
///     course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     completed_lessons INTEGER NOT NULL DEFAULT 0,
///     total_lessons INTEGER NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completion_date DATE,
///     UNIQUE (student_id, course_id)
/// );
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Progress row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Progress {
    /// Unique progress ID
    pub id: Uuid,

    /// Student the progress belongs to
    pub student_id: Uuid,

    /// Course the progress tracks
    pub course_id: Uuid,

    /// Lessons completed so far
    pub completed_lessons: i32,

    /// Lesson count snapshot taken from the course at enrollment time
    pub total_lessons: i32,

    /// Whether the course has been completed
    pub is_completed: bool,

    /// Date completion was first recorded
    pub completion_date: Option<NaiveDate>,
}

/// Progress joined with student and course names, for detail responses
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressDetail {
    /// Unique progress ID
    pub id: Uuid,

    /// Student the progress belongs to
    pub student_id: Uuid,

    /// Student's username
    pub student_name: String,

    /// Course the progress tracks
    pub course_id: Uuid,

    /// Course title
    pub course_title: String,

    /// Lessons completed so far
    pub completed_lessons: i32,

    /// Lesson count snapshot
    pub total_lessons: i32,

    /// Whether the course has been completed
    pub is_completed: bool,

    /// Date completion was first recorded
    pub completion_date: Option<NaiveDate>,
}

/// The completion rule: a course is complete once the completed count
/// reaches the total
pub fn is_complete(completed_lessons: i32, total_lessons: i32) -> bool {
    completed_lessons >= total_lessons
}

impl Progress {
    /// Finds a progress row by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let progress = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, student_id, course_id, completed_lessons, total_lessons,
                   is_completed, completion_date
            FROM progress
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(progress)
    }

    /// Finds the progress row for a (student, course) pair
    pub async fn find_by_student_course(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let progress = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, student_id, course_id, completed_lessons, total_lessons,
                   is_completed, completion_date
            FROM progress
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;

        Ok(progress)
    }

    /// Loads the joined detail view of a progress row
    pub async fn detail(pool: &PgPool, id: Uuid) -> Result<Option<ProgressDetail>, sqlx::Error> {
        let detail = sqlx::query_as::<_, ProgressDetail>(
            r#"
            SELECT p.id, p.student_id, u.username AS student_name,
                   p.course_id, c.title AS course_title,
                   p.completed_lessons, p.total_lessons, p.is_completed, p.completion_date
            FROM progress p
            JOIN students s ON s.id = p.student_id
            JOIN users u ON u.id = s.user_id
            JOIN courses c ON c.id = p.course_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(detail)
    }

    /// Writes a new completed-lesson count, applying the completion rule
    ///
    /// When the new count reaches `total_lessons` and the row was not
    /// already completed, `is_completed` flips on and `completion_date` is
    /// stamped with the current date. An already-completed row keeps its
    /// original completion date.
    ///
    /// Returns the updated row if found, None otherwise. Compare
    /// `is_completed` against the previously loaded row to detect the
    /// transition that triggers certificate issuance.
    pub async fn set_completed_lessons(
        pool: &PgPool,
        id: Uuid,
        completed_lessons: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let progress = sqlx::query_as::<_, Progress>(
            r#"
            UPDATE progress
            SET completed_lessons = $2,
                is_completed = is_completed OR $2 >= total_lessons,
                completion_date = CASE
                    WHEN completion_date IS NULL AND $2 >= total_lessons THEN CURRENT_DATE
                    ELSE completion_date
                END
            WHERE id = $1
            RETURNING id, student_id, course_id, completed_lessons, total_lessons,
                      is_completed, completion_date
            "#,
        )
        .bind(id)
        .bind(completed_lessons)
        .fetch_optional(pool)
        .await?;

        Ok(progress)
    }

    /// Deletes a progress row by ID
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM progress WHERE id = $1")
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
    fn test_completion_rule() {
        assert!(!is_complete(0, 10));
        assert!(!is_complete(9, 10));
        assert!(is_complete(10, 10));
        assert!(is_complete(11, 10));
    }

    #[test]
    fn test_progress_detail_serialization() {
        let detail = ProgressDetail {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            student_name: "jdoe".to_string(),
            course_id: Uuid::new_v4(),
            course_title: "Chemistry".to_string(),
            completed_lessons: 3,
            total_lessons: 12,
            is_completed: false,
            completion_date: None,
        };

        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("student_name"));
        assert!(json.contains("course_title"));
    }
}
