/// Announcement endpoints
///
/// # Endpoints
///
/// - `POST /v1/announcements` - Create an announcement (owning teacher only)
/// - `GET /v1/announcements/:id` - Fetch an announcement (any authenticated user)
/// - `PATCH /v1/announcements/:id` - Update (owning teacher only)
/// - `DELETE /v1/announcements/:id` - Delete (owning teacher only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use classroom_shared::{
    auth::{
        authorization::{require_course_owner, require_teacher},
        middleware::AuthContext,
    },
    models::announcement::{Announcement, CreateAnnouncement, UpdateAnnouncement},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create announcement request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    /// Parent course
    pub course_id: Uuid,

    /// Announcement title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Announcement body
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Update announcement request; only provided fields change
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAnnouncementRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New body
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: Option<String>,
}

/// Create an announcement for one of the caller's courses
///
/// # Errors
///
/// - `403 Forbidden`: Caller isn't a teacher or doesn't own the course
/// - `404 Not Found`: Course doesn't exist
pub async fn create_announcement(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAnnouncementRequest>,
) -> ApiResult<(StatusCode, Json<Announcement>)> {
    req.validate()?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, req.course_id, teacher.id).await?;

    let announcement = Announcement::create(
        &state.db,
        CreateAnnouncement {
            course_id: req.course_id,
            title: req.title,
            message: req.message,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

/// Fetch an announcement
pub async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Announcement>> {
    let announcement = Announcement::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Announcement not found".to_string()))?;

    Ok(Json(announcement))
}

/// Update an announcement (owning teacher only)
pub async fn update_announcement(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAnnouncementRequest>,
) -> ApiResult<Json<Announcement>> {
    req.validate()?;

    let announcement = Announcement::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Announcement not found".to_string()))?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, announcement.course_id, teacher.id).await?;

    let updated = Announcement::update(
        &state.db,
        id,
        UpdateAnnouncement {
            title: req.title,
            message: req.message,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Announcement not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete an announcement (owning teacher only)
pub async fn delete_announcement(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let announcement = Announcement::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Announcement not found".to_string()))?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, announcement.course_id, teacher.id).await?;

    Announcement::delete(&state.db, id).await?;

    Ok(Json(
        serde_json::json!({ "message": "Announcement deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_announcement_request_validation() {
        let valid = CreateAnnouncementRequest {
            course_id: Uuid::new_v4(),
            title: "Exam moved".to_string(),
            message: "The midterm is now on Friday.".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_message = CreateAnnouncementRequest {
            course_id: Uuid::new_v4(),
            title: "Exam moved".to_string(),
            message: "".to_string(),
        };
        assert!(empty_message.validate().is_err());
    }
}
