/// Current user profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/profile` - Current user with role details
/// - `PUT /v1/profile/picture` - Upload a profile picture (multipart)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use chrono::NaiveDate;
use classroom_shared::{
    auth::middleware::AuthContext,
    models::{student::Student, teacher::Teacher, user::User},
    storage::MediaStore,
};
use serde::{Deserialize, Serialize};

/// Teacher details block in the profile response
#[derive(Debug, Serialize, Deserialize)]
pub struct TeacherDetails {
    /// Years of teaching experience
    pub experience: Option<i32>,

    /// Qualifications
    pub qualifications: Option<String>,

    /// Subjects taught
    pub subjects_taught: Option<String>,

    /// Date of joining
    pub joining_date: Option<NaiveDate>,
}

/// Student details block in the profile response
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentDetails {
    /// Year the student joined
    pub enrollment_year: i32,

    /// Grade/class label
    pub grade: String,

    /// Section within the grade
    pub section: Option<String>,

    /// Guardian contact number
    pub parent_contact: Option<String>,
}

/// Profile response
///
/// `role` and the matching details block reflect which profile row exists
/// for the user; both are absent for a user with no role profile.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User ID
    pub id: String,

    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Mobile phone number
    pub mobile_number: String,

    /// Public URL of the profile picture
    pub profile_pic: Option<String>,

    /// Biography
    pub bio: Option<String>,

    /// "teacher" or "student"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Present when the user is a teacher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_details: Option<TeacherDetails>,

    /// Present when the user is a student
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_details: Option<StudentDetails>,
}

/// Retrieve the current user's profile
///
/// Resolves the role by checking which profile row exists and attaches the
/// matching details block.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mut response = ProfileResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
        mobile_number: user.mobile_number,
        profile_pic: user.profile_pic.as_deref().map(MediaStore::url_path),
        bio: user.bio,
        role: None,
        teacher_details: None,
        student_details: None,
    };

    if let Some(teacher) = Teacher::find_by_user(&state.db, auth.user_id).await? {
        response.role = Some("teacher".to_string());
        response.teacher_details = Some(TeacherDetails {
            experience: teacher.experience,
            qualifications: teacher.qualifications,
            subjects_taught: teacher.subjects_taught,
            joining_date: teacher.joining_date,
        });
    } else if let Some(student) = Student::find_by_user(&state.db, auth.user_id).await? {
        response.role = Some("student".to_string());
        response.student_details = Some(StudentDetails {
            enrollment_year: student.enrollment_year,
            grade: student.grade,
            section: student.section,
            parent_contact: student.parent_contact,
        });
    }

    Ok(Json(response))
}

/// Upload a profile picture
///
/// Multipart body with a single `picture` file field. The image is stored
/// under `profile_pics/` and the path recorded on the user.
///
/// # Errors
///
/// - `400 Bad Request`: Missing `picture` field
pub async fn upload_picture(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProfileResponse>> {
    let mut stored: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("picture") {
            let original = field.file_name().unwrap_or("picture.png").to_string();
            let bytes = field.bytes().await?;

            let filename = MediaStore::unique_filename(&original);
            let path = state.media.save("profile_pics", &filename, &bytes).await?;
            stored = Some(path);
        }
    }

    let path =
        stored.ok_or_else(|| ApiError::BadRequest("Missing 'picture' file field".to_string()))?;

    User::set_profile_pic(&state.db, auth.user_id, &path)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %auth.user_id, path = %path, "Profile picture updated");

    // Re-read through the profile handler logic for a consistent response
    get_profile(State(state), Extension(auth)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_response_omits_absent_role() {
        let response = ProfileResponse {
            id: "abc".to_string(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            mobile_number: "+15550100".to_string(),
            profile_pic: None,
            bio: None,
            role: None,
            teacher_details: None,
            student_details: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("role"));
        assert!(!json.contains("teacher_details"));
        assert!(!json.contains("student_details"));
    }

    #[test]
    fn test_profile_response_includes_student_details() {
        let response = ProfileResponse {
            id: "abc".to_string(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            mobile_number: "+15550100".to_string(),
            profile_pic: Some("/media/profile_pics/x.png".to_string()),
            bio: None,
            role: Some("student".to_string()),
            teacher_details: None,
            student_details: Some(StudentDetails {
                enrollment_year: 2024,
                grade: "10".to_string(),
                section: None,
                parent_contact: None,
            }),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"role\":\"student\""));
        assert!(json.contains("enrollment_year"));
        assert!(!json.contains("teacher_details"));
    }
}
