/// Progress tracking endpoints and the second half of the progress cascade
///
/// # Endpoints
///
/// - `GET /v1/progress/:id` - Progress detail (course teacher only)
/// - `PATCH /v1/progress/:id` - Update completed lessons (course teacher only)
/// - `DELETE /v1/progress/:id` - Delete a progress row (course teacher only)
///
/// All three operations are restricted to the teacher who owns the course
/// the progress row tracks.
///
/// Updating `completed_lessons` applies the completion rule; a save that
/// transitions the row into the completed state triggers certificate
/// issuance (enrollment check, get-or-create, PNG rendering).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use classroom_shared::{
    auth::{
        authorization::{require_course_owner, require_teacher},
        middleware::AuthContext,
    },
    models::{
        certificate::Certificate,
        progress::{Progress, ProgressDetail},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Update progress request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    /// New completed-lesson count
    #[validate(range(min = 0, message = "completed_lessons cannot be negative"))]
    pub completed_lessons: i32,
}

/// Loads a progress row and checks the caller teaches its course
async fn load_authorized(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
) -> Result<Progress, ApiError> {
    let progress = Progress::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, progress.course_id, teacher.id).await?;

    Ok(progress)
}

/// Progress detail (course teacher only)
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressDetail>> {
    load_authorized(&state, &auth, id).await?;

    let detail = Progress::detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    Ok(Json(detail))
}

/// Update the completed-lesson count (course teacher only)
///
/// Applies the completion rule: reaching `total_lessons` flips
/// `is_completed` and stamps `completion_date`. On the transition into the
/// completed state, certificate issuance runs: when an enrollment exists
/// for the (student, course) pair, the certificate row is get-or-created
/// and its PNG artifact rendered. Saving an already-completed row never
/// issues a second certificate.
///
/// # Errors
///
/// - `403 Forbidden`: Caller doesn't teach the course
/// - `404 Not Found`: Progress record doesn't exist
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProgressRequest>,
) -> ApiResult<Json<ProgressDetail>> {
    req.validate()?;

    let before = load_authorized(&state, &auth, id).await?;

    let after = Progress::set_completed_lessons(&state.db, id, req.completed_lessons)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    if !before.is_completed && after.is_completed {
        tracing::info!(
            progress_id = %after.id,
            student_id = %after.student_id,
            course_id = %after.course_id,
            "Progress completed"
        );

        Certificate::issue_for_completion(&state.db, &state.media, state.renderer(), &after)
            .await?;
    }

    let detail = Progress::detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress record not found".to_string()))?;

    Ok(Json(detail))
}

/// Delete a progress row (course teacher only)
pub async fn delete_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    load_authorized(&state, &auth, id).await?;

    Progress::delete(&state.db, id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Progress record deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_progress_request_validation() {
        let valid = UpdateProgressRequest {
            completed_lessons: 5,
        };
        assert!(valid.validate().is_ok());

        let zero = UpdateProgressRequest {
            completed_lessons: 0,
        };
        assert!(zero.validate().is_ok());

        let negative = UpdateProgressRequest {
            completed_lessons: -1,
        };
        assert!(negative.validate().is_err());
    }
}
