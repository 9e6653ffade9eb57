/// Enrollment endpoints and the first half of the progress cascade
///
/// # Endpoints
///
/// - `POST /v1/enrollments` - Enroll the authenticated student in a course
/// - `GET /v1/enrollments` - The student's enrolled courses
///
/// Enrolling creates the matching progress row in the same transaction
/// (see [`Enrollment::enroll`]).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use classroom_shared::{
    auth::{authorization::require_student, middleware::AuthContext},
    models::{
        course::Course,
        enrollment::{EnrolledCourse, Enrollment},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enroll request
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    /// Course to enroll in
    pub course_id: Uuid,
}

/// Enroll response
#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    /// Confirmation message
    pub message: String,

    /// Created enrollment
    pub enrollment: Enrollment,
}

/// Enroll the authenticated student in a course
///
/// The matching progress row is created in the same transaction, seeded
/// with the course's `total_lessons`.
///
/// # Errors
///
/// - `403 Forbidden`: Caller has no student profile
/// - `404 Not Found`: Course doesn't exist
/// - `409 Conflict`: Already enrolled
pub async fn enroll(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<EnrollRequest>,
) -> ApiResult<(StatusCode, Json<EnrollResponse>)> {
    let student = require_student(&state.db, auth.user_id).await?;

    let course = Course::find_by_id(&state.db, req.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if Enrollment::exists(&state.db, student.id, course.id).await? {
        return Err(ApiError::Conflict(
            "Already enrolled in this course".to_string(),
        ));
    }

    let enrollment = Enrollment::enroll(&state.db, student.id, &course).await?;

    tracing::info!(
        enrollment_id = %enrollment.id,
        student_id = %student.id,
        course_id = %course.id,
        "Student enrolled, progress row created"
    );

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            message: "Successfully enrolled!".to_string(),
            enrollment,
        }),
    ))
}

/// List the authenticated student's enrolled courses
///
/// # Errors
///
/// - `403 Forbidden`: Caller has no student profile
pub async fn enrolled_courses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<EnrolledCourse>>> {
    let student = require_student(&state.db, auth.user_id).await?;

    let courses = Enrollment::list_for_student(&state.db, student.id).await?;

    Ok(Json(courses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_request_deserializes() {
        let id = Uuid::new_v4();
        let json = format!("{{\"course_id\":\"{}\"}}", id);

        let req: EnrollRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.course_id, id);
    }
}
