/// Assignment endpoints
///
/// # Endpoints
///
/// - `POST /v1/assignments` - Create an assignment (owning teacher only)
/// - `GET /v1/assignments/:id` - Fetch an assignment (any authenticated user)
/// - `PATCH /v1/assignments/:id` - Update (owning teacher only)
/// - `DELETE /v1/assignments/:id` - Delete (owning teacher only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use classroom_shared::{
    auth::{
        authorization::{require_course_owner, require_teacher},
        middleware::AuthContext,
    },
    models::assignment::{Assignment, CreateAssignment, UpdateAssignment},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create assignment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    /// Parent course
    pub course_id: Uuid,

    /// Assignment title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// What the assignment asks for
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Due date
    pub due_date: NaiveDate,
}

/// Update assignment request; only provided fields change
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    /// New due date
    pub due_date: Option<NaiveDate>,
}

/// Create an assignment for one of the caller's courses
///
/// # Errors
///
/// - `403 Forbidden`: Caller isn't a teacher or doesn't own the course
/// - `404 Not Found`: Course doesn't exist
pub async fn create_assignment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAssignmentRequest>,
) -> ApiResult<(StatusCode, Json<Assignment>)> {
    req.validate()?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, req.course_id, teacher.id).await?;

    let assignment = Assignment::create(
        &state.db,
        CreateAssignment {
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Fetch an assignment
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Assignment>> {
    let assignment = Assignment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok(Json(assignment))
}

/// Update an assignment (owning teacher only)
pub async fn update_assignment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> ApiResult<Json<Assignment>> {
    req.validate()?;

    let assignment = Assignment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, assignment.course_id, teacher.id).await?;

    let updated = Assignment::update(
        &state.db,
        id,
        UpdateAssignment {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete an assignment (owning teacher only)
pub async fn delete_assignment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let assignment = Assignment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, assignment.course_id, teacher.id).await?;

    Assignment::delete(&state.db, id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Assignment deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assignment_request_validation() {
        let valid = CreateAssignmentRequest {
            course_id: Uuid::new_v4(),
            title: "Homework 3".to_string(),
            description: "Problems 1-10".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        };
        assert!(valid.validate().is_ok());

        let empty_description = CreateAssignmentRequest {
            course_id: Uuid::new_v4(),
            title: "Homework 3".to_string(),
            description: "".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        };
        assert!(empty_description.validate().is_err());
    }
}
