/// Authorization helpers and permission checks
///
/// The permission model is role-based with two roles determined by which
/// profile row exists for the authenticated user:
///
/// 1. **Teacher**: may author courses and manage their own courses'
///    assignments, announcements, files, and progress records.
/// 2. **Student**: may enroll in courses and read what enrollment unlocks.
///
/// Ownership checks are resource-level: a teacher can only mutate a course
/// (or its children) when `course.teacher_id` matches their profile.
///
/// # Example
///
/// ```no_run
/// use classroom_shared::auth::authorization::{require_teacher, require_course_owner};
/// use classroom_shared::auth::middleware::AuthContext;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: &PgPool, auth: AuthContext, course_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let teacher = require_teacher(pool, auth.user_id).await?;
/// let course = require_course_owner(pool, course_id, teacher.id).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::course::Course;
use crate::models::student::Student;
use crate::models::teacher::Teacher;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller has no teacher profile
    #[error("Only teachers can perform this action")]
    NotTeacher,

    /// Caller has no student profile
    #[error("Only students can perform this action")]
    NotStudent,

    /// Referenced course does not exist
    #[error("Course not found")]
    CourseNotFound,

    /// Caller doesn't own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Resolves the caller's teacher profile, failing if they have none
///
/// # Errors
///
/// Returns `AuthzError::NotTeacher` when no teacher profile exists for the
/// user.
pub async fn require_teacher(pool: &PgPool, user_id: Uuid) -> Result<Teacher, AuthzError> {
    Teacher::find_by_user(pool, user_id)
        .await?
        .ok_or(AuthzError::NotTeacher)
}

/// Resolves the caller's student profile, failing if they have none
///
/// # Errors
///
/// Returns `AuthzError::NotStudent` when no student profile exists for the
/// user.
pub async fn require_student(pool: &PgPool, user_id: Uuid) -> Result<Student, AuthzError> {
    Student::find_by_user(pool, user_id)
        .await?
        .ok_or(AuthzError::NotStudent)
}

/// Loads a course and checks the given teacher owns it
///
/// # Errors
///
/// Returns `AuthzError::CourseNotFound` when the course doesn't exist and
/// `AuthzError::NotOwner` when it belongs to a different teacher.
pub async fn require_course_owner(
    pool: &PgPool,
    course_id: Uuid,
    teacher_id: Uuid,
) -> Result<Course, AuthzError> {
    let course = Course::find_by_id(pool, course_id)
        .await?
        .ok_or(AuthzError::CourseNotFound)?;

    if course.teacher_id != teacher_id {
        return Err(AuthzError::NotOwner);
    }

    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authz_error_display() {
        assert_eq!(
            AuthzError::NotTeacher.to_string(),
            "Only teachers can perform this action"
        );
        assert_eq!(
            AuthzError::NotStudent.to_string(),
            "Only students can perform this action"
        );
        assert_eq!(
            AuthzError::NotOwner.to_string(),
            "Not authorized to access this resource"
        );
    }
}
