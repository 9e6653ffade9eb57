/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a user with a teacher or student profile
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use classroom_shared::{
    auth::{jwt, password},
    models::{
        student::{CreateStudent, Student},
        teacher::{CreateTeacher, Teacher},
        user::{CreateUser, User},
    },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// Role selected at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    /// Creates a teacher profile
    Teacher,

    /// Creates a student profile
    Student,
}

/// Register request
///
/// Carries the account fields plus the role-specific profile fields; only
/// the fields matching the selected role are consulted.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Mobile phone number
    #[validate(length(min = 7, max = 15, message = "Mobile number must be 7-15 characters"))]
    pub mobile_number: String,

    /// Password (also checked for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional biography
    pub bio: Option<String>,

    /// Which role profile to create
    pub role: RegisterRole,

    // Teacher profile fields
    /// Years of teaching experience
    pub experience: Option<i32>,

    /// Qualifications
    pub qualifications: Option<String>,

    /// Subjects taught
    pub subjects_taught: Option<String>,

    /// Date of joining
    pub joining_date: Option<NaiveDate>,

    // Student profile fields
    /// Year the student joined
    pub enrollment_year: Option<i32>,

    /// Grade/class label
    #[validate(length(max = 10, message = "Grade must be at most 10 characters"))]
    pub grade: Option<String>,

    /// Section within the grade
    #[validate(length(max = 5, message = "Section must be at most 5 characters"))]
    pub section: Option<String>,

    /// Guardian contact number
    #[validate(length(max = 15, message = "Parent contact must be at most 15 characters"))]
    pub parent_contact: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// User ID
    pub user_id: String,

    /// Role the profile was created for
    pub role: RegisterRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Register a new user
///
/// Creates the account plus exactly one role profile (teacher or student)
/// chosen by the `role` field, then returns tokens so the client is logged
/// in straight away.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "jdoe",
///   "email": "jdoe@example.com",
///   "mobile_number": "+15550100",
///   "password": "SecureP@ss123",
///   "role": "student",
///   "enrollment_year": 2024,
///   "grade": "10",
///   "section": "A"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Username, email, or mobile number already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    // Validate password strength beyond the length check
    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    // Students must say which year and grade they're in
    if req.role == RegisterRole::Student {
        let mut missing = Vec::new();
        if req.enrollment_year.is_none() {
            missing.push("enrollment_year");
        }
        if req.grade.is_none() {
            missing.push("grade");
        }
        if !missing.is_empty() {
            return Err(ApiError::ValidationError(
                missing
                    .into_iter()
                    .map(|field| ValidationErrorDetail {
                        field: field.to_string(),
                        message: "This field is required for students".to_string(),
                    })
                    .collect(),
            ));
        }
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username.clone(),
            email: req.email.clone(),
            mobile_number: req.mobile_number.clone(),
            password_hash,
            bio: req.bio.clone(),
        },
    )
    .await?;

    match req.role {
        RegisterRole::Teacher => {
            Teacher::create(
                &state.db,
                CreateTeacher {
                    user_id: user.id,
                    experience: req.experience,
                    qualifications: req.qualifications,
                    subjects_taught: req.subjects_taught,
                    joining_date: req.joining_date,
                },
            )
            .await?;
        }
        RegisterRole::Student => {
            Student::create(
                &state.db,
                CreateStudent {
                    user_id: user.id,
                    enrollment_year: req.enrollment_year.unwrap_or_default(),
                    grade: req.grade.unwrap_or_default(),
                    section: req.section,
                    parent_contact: req.parent_contact,
                },
            )
            .await?;
        }
    }

    tracing::info!(user_id = %user.id, role = ?req.role, "User registered");

    let access_claims = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id.to_string(),
            role: req.role,
            access_token,
            refresh_token,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates by username and password and returns JWT tokens. The
/// error message never reveals whether the username exists.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "jdoe",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    let access_claims = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> RegisterRequest {
        RegisterRequest {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            mobile_number: "+15550100".to_string(),
            password: "SecureP@ss123".to_string(),
            bio: None,
            role: RegisterRole::Student,
            experience: None,
            qualifications: None,
            subjects_taught: None,
            joining_date: None,
            enrollment_year: Some(2024),
            grade: Some("10".to_string()),
            section: None,
            parent_contact: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let mut req = base_request();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_username() {
        let mut req = base_request();
        req.username = "ab".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_role_deserializes_lowercase() {
        let role: RegisterRole = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, RegisterRole::Teacher);

        let role: RegisterRole = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role, RegisterRole::Student);
    }

    #[test]
    fn test_login_request_requires_username() {
        let req = LoginRequest {
            username: "".to_string(),
            password: "pw".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
