/// Enrollment model and the enrollment → progress cascade
///
/// An enrollment links a student to a course. Creating one also creates the
/// matching progress row, seeded with the course's `total_lessons`; both
/// inserts happen in a single transaction so an enrollment can never exist
/// without its progress row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE enrollments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
///     course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     enrolled_on DATE NOT NULL DEFAULT CURRENT_DATE,
///     UNIQUE (student_id, course_id)
/// );
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::course::Course;
use super::progress::Progress;

/// Enrollment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    /// Unique enrollment ID
    pub id: Uuid,

    /// Enrolled student profile
    pub student_id: Uuid,

    /// Course enrolled into
    pub course_id: Uuid,

    /// Date of enrollment
    pub enrolled_on: NaiveDate,
}

/// A student's enrollment joined with course info, for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrolledCourse {
    /// Course ID
    pub course_id: Uuid,

    /// Course title
    pub course_title: String,

    /// Date of enrollment
    pub enrolled_on: NaiveDate,
}

impl Enrollment {
    /// Enrolls a student into a course and seeds the progress row
    ///
    /// Runs in a transaction: the enrollment insert and the progress insert
    /// commit together or not at all.
    ///
    /// # Errors
    ///
    /// Fails on the unique (student, course) constraint when the student is
    /// already enrolled.
    pub async fn enroll(
        pool: &PgPool,
        student_id: Uuid,
        course: &Course,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (student_id, course_id)
            VALUES ($1, $2)
            RETURNING id, student_id, course_id, enrolled_on
            "#,
        )
        .bind(student_id)
        .bind(course.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO progress (student_id, course_id, total_lessons)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(student_id)
        .bind(course.id)
        .bind(course.total_lessons)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(enrollment)
    }

    /// Checks whether a student is enrolled in a course
    pub async fn exists(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM enrollments
                WHERE student_id = $1 AND course_id = $2
            )
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists a student's enrollments with course titles, newest first
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<EnrolledCourse>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EnrolledCourse>(
            r#"
            SELECT e.course_id, c.title AS course_title, e.enrolled_on
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_on DESC, c.title
            "#,
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Looks up the progress row created alongside this enrollment
    pub async fn progress(&self, pool: &PgPool) -> Result<Option<Progress>, sqlx::Error> {
        Progress::find_by_student_course(pool, self.student_id, self.course_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrolled_course_serialization() {
        let row = EnrolledCourse {
            course_id: Uuid::new_v4(),
            course_title: "Physics".to_string(),
            enrolled_on: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("course_title"));
        assert!(json.contains("Physics"));
    }
}
