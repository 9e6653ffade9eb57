/// Course catalog and authoring endpoints
///
/// # Endpoints
///
/// - `GET /v1/courses` - Public course catalog
/// - `GET /v1/courses/:id` - Course detail, representation depends on role
/// - `POST /v1/courses` - Create a course (teacher only)
/// - `PATCH /v1/courses/:id` - Update a course (owning teacher only)
/// - `DELETE /v1/courses/:id` - Delete a course (owning teacher only)
/// - `PUT /v1/courses/:id/thumbnail` - Upload a thumbnail (owning teacher only)
/// - `GET /v1/courses/mine` - The authenticated teacher's courses
///
/// # Representation rules
///
/// Students see the full detail (files, assignments, announcements) only
/// for courses they're enrolled in; everyone else gets the basic fields.
/// Teachers get the full detail plus `edit: true` for their own courses.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use classroom_shared::{
    auth::{
        authorization::{require_course_owner, require_teacher},
        middleware::AuthContext,
    },
    models::{
        announcement::Announcement,
        assignment::Assignment,
        course::{Course, CreateCourse, UpdateCourse},
        course_file::CourseFile,
        enrollment::Enrollment,
        student::Student,
        teacher::Teacher,
    },
    storage::MediaStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create course request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    /// Course title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Course description
    pub description: Option<String>,

    /// First day of the course
    pub start_date: NaiveDate,

    /// Last day of the course
    pub end_date: NaiveDate,

    /// Number of lessons
    #[validate(range(min = 1, message = "total_lessons must be at least 1"))]
    pub total_lessons: i32,
}

/// Update course request; only provided fields change
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New start date
    pub start_date: Option<NaiveDate>,

    /// New end date
    pub end_date: Option<NaiveDate>,

    /// New lesson count
    #[validate(range(min = 1, message = "total_lessons must be at least 1"))]
    pub total_lessons: Option<i32>,
}

/// Course representation with public URLs for media
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    /// Course ID
    pub id: Uuid,

    /// Owning teacher profile
    pub teacher_id: Uuid,

    /// Course title
    pub title: String,

    /// Course description
    pub description: Option<String>,

    /// First day of the course
    pub start_date: NaiveDate,

    /// Last day of the course
    pub end_date: NaiveDate,

    /// Number of lessons
    pub total_lessons: i32,

    /// Public URL of the thumbnail
    pub thumbnail: Option<String>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            teacher_id: course.teacher_id,
            title: course.title,
            description: course.description,
            start_date: course.start_date,
            end_date: course.end_date,
            total_lessons: course.total_lessons,
            thumbnail: course.thumbnail.as_deref().map(MediaStore::url_path),
        }
    }
}

/// A course file entry in the detail response
#[derive(Debug, Serialize)]
pub struct CourseFileItem {
    /// File record ID
    pub id: Uuid,

    /// Display title
    pub title: String,

    /// Public URL of the stored file
    pub file: String,

    /// When the file was uploaded
    pub uploaded_at: DateTime<Utc>,
}

impl From<CourseFile> for CourseFileItem {
    fn from(file: CourseFile) -> Self {
        Self {
            id: file.id,
            title: file.title,
            file: MediaStore::url_path(&file.file_path),
            uploaded_at: file.uploaded_at,
        }
    }
}

/// Course detail response
///
/// The child collections are present only in the full representation.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    /// The course itself
    #[serde(flatten)]
    pub course: CourseResponse,

    /// Uploaded files (full representation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<CourseFileItem>>,

    /// Assignments (full representation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<Assignment>>,

    /// Announcements (full representation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcements: Option<Vec<Announcement>>,

    /// Whether the caller may edit this course
    pub edit: bool,

    /// Whether the caller is enrolled (teachers always report true)
    pub is_enrolled: bool,
}

/// List all courses (public catalog)
pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseResponse>>> {
    let courses = Course::list(&state.db).await?;

    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// List the authenticated teacher's courses
///
/// # Errors
///
/// - `403 Forbidden`: Caller has no teacher profile
pub async fn my_courses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<CourseResponse>>> {
    let teacher = require_teacher(&state.db, auth.user_id).await?;

    let courses = Course::list_by_teacher(&state.db, teacher.id).await?;

    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// Create a course owned by the authenticated teacher
///
/// # Errors
///
/// - `403 Forbidden`: Caller has no teacher profile
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<CourseResponse>)> {
    req.validate()?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;

    let course = Course::create(
        &state.db,
        CreateCourse {
            teacher_id: teacher.id,
            title: req.title,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            total_lessons: req.total_lessons,
        },
    )
    .await?;

    tracing::info!(course_id = %course.id, teacher_id = %teacher.id, "Course created");

    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Course detail with role-dependent representation
///
/// Students get the full detail only when enrolled; teachers get it always,
/// with `edit: true` for their own course. Callers with neither profile are
/// rejected.
///
/// # Errors
///
/// - `403 Forbidden`: Caller has no role profile
/// - `404 Not Found`: Course doesn't exist
pub async fn course_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Json<CourseDetailResponse>> {
    let course = Course::find_by_id(&state.db, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if let Some(student) = Student::find_by_user(&state.db, auth.user_id).await? {
        let is_enrolled = Enrollment::exists(&state.db, student.id, course.id).await?;

        let response = if is_enrolled {
            full_detail(&state, course, false, true).await?
        } else {
            basic_detail(course, false, false)
        };
        return Ok(Json(response));
    }

    if let Some(teacher) = Teacher::find_by_user(&state.db, auth.user_id).await? {
        let is_owner = course.teacher_id == teacher.id;

        let response = if is_owner {
            full_detail(&state, course, true, true).await?
        } else {
            basic_detail(course, false, true)
        };
        return Ok(Json(response));
    }

    Err(ApiError::Forbidden("Access denied".to_string()))
}

async fn full_detail(
    state: &AppState,
    course: Course,
    edit: bool,
    is_enrolled: bool,
) -> Result<CourseDetailResponse, ApiError> {
    let files = CourseFile::list_by_course(&state.db, course.id).await?;
    let assignments = Assignment::list_by_course(&state.db, course.id).await?;
    let announcements = Announcement::list_by_course(&state.db, course.id).await?;

    Ok(CourseDetailResponse {
        course: course.into(),
        files: Some(files.into_iter().map(CourseFileItem::from).collect()),
        assignments: Some(assignments),
        announcements: Some(announcements),
        edit,
        is_enrolled,
    })
}

fn basic_detail(course: Course, edit: bool, is_enrolled: bool) -> CourseDetailResponse {
    CourseDetailResponse {
        course: course.into(),
        files: None,
        assignments: None,
        announcements: None,
        edit,
        is_enrolled,
    }
}

/// Update a course (owning teacher only)
///
/// # Errors
///
/// - `403 Forbidden`: Caller isn't the owning teacher
/// - `404 Not Found`: Course doesn't exist
pub async fn update_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> ApiResult<Json<CourseResponse>> {
    req.validate()?;

    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, course_id, teacher.id).await?;

    let course = Course::update(
        &state.db,
        course_id,
        UpdateCourse {
            title: req.title,
            description: req.description.map(Some),
            start_date: req.start_date,
            end_date: req.end_date,
            total_lessons: req.total_lessons,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(course.into()))
}

/// Delete a course (owning teacher only)
///
/// Cascades to enrollments, progress, certificates, and child records.
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, course_id, teacher.id).await?;

    Course::delete(&state.db, course_id).await?;

    tracing::info!(course_id = %course_id, teacher_id = %teacher.id, "Course deleted");

    Ok(Json(
        serde_json::json!({ "message": "Course deleted successfully" }),
    ))
}

/// Upload a course thumbnail (owning teacher only)
///
/// Multipart body with a single `thumbnail` file field.
///
/// # Errors
///
/// - `400 Bad Request`: Missing `thumbnail` field
/// - `403 Forbidden`: Caller isn't the owning teacher
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<CourseResponse>> {
    let teacher = require_teacher(&state.db, auth.user_id).await?;
    require_course_owner(&state.db, course_id, teacher.id).await?;

    let mut stored: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("thumbnail") {
            let original = field.file_name().unwrap_or("thumbnail.png").to_string();
            let bytes = field.bytes().await?;

            let filename = MediaStore::unique_filename(&original);
            let path = state
                .media
                .save("course_thumbnails", &filename, &bytes)
                .await?;
            stored = Some(path);
        }
    }

    let path =
        stored.ok_or_else(|| ApiError::BadRequest("Missing 'thumbnail' file field".to_string()))?;

    let course = Course::set_thumbnail(&state.db, course_id, &path)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(course.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_request_validation() {
        let valid = CreateCourseRequest {
            title: "Algebra I".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            total_lessons: 40,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateCourseRequest {
            title: "".to_string(),
            ..valid_request()
        };
        assert!(empty_title.validate().is_err());

        let zero_lessons = CreateCourseRequest {
            total_lessons: 0,
            ..valid_request()
        };
        assert!(zero_lessons.validate().is_err());
    }

    fn valid_request() -> CreateCourseRequest {
        CreateCourseRequest {
            title: "Algebra I".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            total_lessons: 40,
        }
    }

    #[test]
    fn test_basic_detail_omits_children() {
        let course = Course {
            id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            title: "Algebra I".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            total_lessons: 40,
            thumbnail: Some("course_thumbnails/x.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let detail = basic_detail(course, false, false);
        let json = serde_json::to_string(&detail).unwrap();

        assert!(!json.contains("\"files\""));
        assert!(!json.contains("\"assignments\""));
        assert!(json.contains("\"edit\":false"));
        assert!(json.contains("\"is_enrolled\":false"));
        // Thumbnail is exposed as a public media URL
        assert!(json.contains("/media/course_thumbnails/x.png"));
    }
}
