/// Course file upload endpoints
///
/// # Endpoints
///
/// - `POST /v1/courses/files` - Upload a file to a course (owning teacher only)
/// - `DELETE /v1/course-files/:id` - Delete a course file (owning teacher only)
///
/// Uploads are multipart with a `course_id` text field, a `title` text
/// field, and a `file` field carrying the body. The body is stored under
/// `course_files/` in the media root.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use classroom_shared::{
    auth::{
        authorization::{require_course_owner, require_teacher},
        middleware::AuthContext,
    },
    models::course_file::{CourseFile, CreateCourseFile},
    storage::MediaStore,
};
use uuid::Uuid;

use super::courses::CourseFileItem;

/// Upload a file to one of the caller's courses
///
/// # Errors
///
/// - `400 Bad Request`: Missing `course_id`, `title`, or `file` field
/// - `403 Forbidden`: Caller isn't a teacher or doesn't own the course
/// - `404 Not Found`: Course doesn't exist
pub async fn upload_course_file(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CourseFileItem>)> {
    let mut course_id: Option<Uuid> = None;
    let mut title: Option<String> = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("course_id") => {
                let text = field.text().await?;
                let parsed = text
                    .parse()
                    .map_err(|_| ApiError::BadRequest("Invalid course_id".to_string()))?;
                course_id = Some(parsed);
            }
            Some("title") => {
                title = Some(field.text().await?);
            }
            Some("file") => {
                let original = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field.bytes().await?;
                file = Some((original, bytes));
            }
            _ => {}
        }
    }

    let course_id =
        course_id.ok_or_else(|| ApiError::BadRequest("Missing 'course_id' field".to_string()))?;
    let title = title.ok_or_else(|| ApiError::BadRequest("Missing 'title' field".to_string()))?;
    let (original, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
    }

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, course_id, teacher.id).await?;

    let filename = MediaStore::unique_filename(&original);
    let file_path = state.media.save("course_files", &filename, &bytes).await?;

    let record = CourseFile::create(
        &state.db,
        CreateCourseFile {
            course_id,
            title,
            file_path,
        },
    )
    .await?;

    tracing::info!(
        file_id = %record.id,
        course_id = %course_id,
        size = bytes.len(),
        "Course file uploaded"
    );

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Delete a course file (owning teacher only)
///
/// Removes the database record and then the stored file; a failure to
/// delete the file body is logged but doesn't fail the request.
///
/// # Errors
///
/// - `403 Forbidden`: Caller isn't a teacher or doesn't own the course
/// - `404 Not Found`: File record doesn't exist
pub async fn delete_course_file(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let record = CourseFile::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course file not found".to_string()))?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, record.course_id, teacher.id).await?;

    CourseFile::delete(&state.db, id).await?;

    if let Err(e) = state.media.remove(&record.file_path).await {
        tracing::warn!(file_id = %id, error = %e, "Failed to remove stored file body");
    }

    Ok(Json(
        serde_json::json!({ "message": "Course file deleted successfully" }),
    ))
}
