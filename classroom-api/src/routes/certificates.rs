/// Certificate listing endpoint
///
/// # Endpoints
///
/// - `GET /v1/certificates` - The authenticated student's certificates

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use classroom_shared::{
    auth::{authorization::require_student, middleware::AuthContext},
    storage::MediaStore,
};
use classroom_shared::models::certificate::Certificate;
use serde::Serialize;
use uuid::Uuid;

/// Certificate entry with a public artifact URL
#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    /// Certificate ID
    pub id: Uuid,

    /// Completed course
    pub course_id: Uuid,

    /// Course title
    pub course_title: String,

    /// Issue date
    pub issued_on: NaiveDate,

    /// Public URL of the generated PNG, when rendering succeeded
    pub certificate_file: Option<String>,
}

/// List the authenticated student's certificates
///
/// # Errors
///
/// - `403 Forbidden`: Caller has no student profile
pub async fn my_certificates(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<CertificateResponse>>> {
    let student = require_student(&state.db, auth.user_id).await?;

    let certificates = Certificate::list_for_student(&state.db, student.id).await?;

    let response = certificates
        .into_iter()
        .map(|c| CertificateResponse {
            id: c.id,
            course_id: c.course_id,
            course_title: c.course_title,
            issued_on: c.issued_on,
            certificate_file: c.certificate_path.as_deref().map(MediaStore::url_path),
        })
        .collect();

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_response_serialization() {
        let response = CertificateResponse {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            course_title: "Algebra I".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            certificate_file: Some("/media/certificates/cert_jdoe_algebra-i.png".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("/media/certificates/"));
        assert!(json.contains("Algebra I"));
    }
}
