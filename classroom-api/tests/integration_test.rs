/// Integration tests for the Classroom API
///
/// The first group runs without infrastructure and covers routing,
/// authentication middleware, and request validation. The second group
/// (`#[ignore]`d) runs the full stack against PostgreSQL:
///
/// ```bash
/// DATABASE_URL=postgresql://localhost/classroom_test cargo test -- --ignored
/// ```

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{authed_json_request, json_request, response_json, TestContext};
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

/// Protected routes reject requests without an Authorization header
#[tokio::test]
async fn test_protected_route_requires_auth() {
    let ctx = TestContext::without_database();

    let request = json_request("POST", "/v1/courses", json!({}));

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A garbage bearer token is rejected before any handler runs
#[tokio::test]
async fn test_invalid_token_rejected() {
    let ctx = TestContext::without_database();

    let request = authed_json_request(
        "GET",
        "/v1/profile",
        "Bearer not-a-real-token",
        json!({}),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A non-Bearer Authorization header is a bad request
#[tokio::test]
async fn test_malformed_auth_header_rejected() {
    let ctx = TestContext::without_database();

    let request = authed_json_request("GET", "/v1/profile", "Basic dXNlcjpwdw==", json!({}));

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A refresh token cannot be used as an access token
#[tokio::test]
async fn test_refresh_token_rejected_on_protected_route() {
    use classroom_shared::auth::jwt::{create_token, Claims, TokenType};

    let ctx = TestContext::without_database();

    let claims = Claims::new(Uuid::new_v4(), TokenType::Refresh);
    let token = create_token(&claims, common::TEST_JWT_SECRET).unwrap();

    let request = authed_json_request(
        "GET",
        "/v1/profile",
        &format!("Bearer {}", token),
        json!({}),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Security headers are present on every response
#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::without_database();

    let request = json_request("POST", "/v1/courses", json!({}));
    let response = ctx.app.clone().call(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert!(headers.get("Strict-Transport-Security").is_none());
}

/// Unknown routes return 404
#[tokio::test]
async fn test_unknown_route_is_404() {
    let ctx = TestContext::without_database();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/nope")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The auth token refresh endpoint works without a database
#[tokio::test]
async fn test_token_refresh_roundtrip() {
    use classroom_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};

    let ctx = TestContext::without_database();

    let user_id = Uuid::new_v4();
    let refresh_claims = Claims::new(user_id, TokenType::Refresh);
    let refresh_token = create_token(&refresh_claims, common::TEST_JWT_SECRET).unwrap();

    let request = json_request(
        "POST",
        "/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let access_token = body["access_token"].as_str().unwrap();

    let claims = validate_access_token(access_token, common::TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.sub, user_id);
}

/// Refreshing with an access token fails
#[tokio::test]
async fn test_refresh_rejects_access_token() {
    use classroom_shared::auth::jwt::{create_token, Claims, TokenType};

    let ctx = TestContext::without_database();

    let access_claims = Claims::new(Uuid::new_v4(), TokenType::Access);
    let access_token = create_token(&access_claims, common::TEST_JWT_SECRET).unwrap();

    let request = json_request(
        "POST",
        "/v1/auth/refresh",
        json!({ "refresh_token": access_token }),
    );

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Database-backed tests (require PostgreSQL; run with -- --ignored)
// ---------------------------------------------------------------------------

/// Helper: registers a user and returns (user_id, access token header)
async fn register_user(
    ctx: &TestContext,
    role: &str,
    extra: serde_json::Value,
) -> (Uuid, String) {
    let suffix = Uuid::new_v4().simple().to_string();
    let mut body = json!({
        "username": format!("user-{}", suffix),
        "email": format!("user-{}@example.com", suffix),
        "mobile_number": format!("+1{}", &suffix[..10]),
        "password": "SecureP@ss123",
        "role": role,
    });
    if let (Some(obj), Some(extra_obj)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra_obj {
            obj.insert(k.clone(), v.clone());
        }
    }

    let response = ctx
        .app
        .clone()
        .call(json_request("POST", "/v1/auth/register", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    let user_id: Uuid = body["user_id"].as_str().unwrap().parse().unwrap();
    let header = format!("Bearer {}", body["access_token"].as_str().unwrap());

    (user_id, header)
}

/// Full registration and login flow
#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_register_and_login() {
    let ctx = TestContext::with_database().await.unwrap();

    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("login-{}", suffix);

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/v1/auth/register",
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "mobile_number": format!("+2{}", &suffix[..10]),
                "password": "SecureP@ss123",
                "role": "teacher",
                "subjects_taught": "Mathematics",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Correct password logs in
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/v1/auth/login",
            json!({ "username": username, "password": "SecureP@ss123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong password doesn't
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/v1/auth/login",
            json!({ "username": username, "password": "WrongP@ss123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Students cannot create courses
#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_students_cannot_create_courses() {
    let ctx = TestContext::with_database().await.unwrap();

    let (_, header) = register_user(
        &ctx,
        "student",
        json!({ "enrollment_year": 2024, "grade": "10" }),
    )
    .await;

    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "POST",
            "/v1/courses",
            &header,
            json!({
                "title": "Algebra I",
                "start_date": "2025-09-01",
                "end_date": "2026-06-15",
                "total_lessons": 3,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The full enrollment → progress → certificate cascade
#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_progress_cascade() {
    let ctx = TestContext::with_database().await.unwrap();

    // Teacher creates a short course
    let (_, teacher_header) = register_user(&ctx, "teacher", json!({})).await;
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "POST",
            "/v1/courses",
            &teacher_header,
            json!({
                "title": "Quick Course",
                "start_date": "2025-09-01",
                "end_date": "2025-10-01",
                "total_lessons": 2,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = response_json(response).await;
    let course_id = course["id"].as_str().unwrap().to_string();

    // Student enrolls; progress row appears
    let (_, student_header) = register_user(
        &ctx,
        "student",
        json!({ "enrollment_year": 2024, "grade": "10" }),
    )
    .await;
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "POST",
            "/v1/enrollments",
            &student_header,
            json!({ "course_id": course_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let enrollment = response_json(response).await;
    let student_id = enrollment["enrollment"]["student_id"].as_str().unwrap();
    let course_uuid: Uuid = course_id.parse().unwrap();

    // Double enrollment is a conflict
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "POST",
            "/v1/enrollments",
            &student_header,
            json!({ "course_id": course_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Find the progress row
    let progress = classroom_shared::models::progress::Progress::find_by_student_course(
        &ctx.db,
        student_id.parse().unwrap(),
        course_uuid,
    )
    .await
    .unwrap()
    .expect("progress row should exist after enrollment");
    assert_eq!(progress.completed_lessons, 0);
    assert_eq!(progress.total_lessons, 2);
    assert!(!progress.is_completed);

    // Teacher marks the course complete
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "PATCH",
            &format!("/v1/progress/{}", progress.id),
            &teacher_header,
            json!({ "completed_lessons": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = response_json(response).await;
    assert_eq!(detail["is_completed"], true);
    assert!(detail["completion_date"].is_string());

    // Certificate was issued exactly once
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "GET",
            "/v1/certificates",
            &student_header,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let certificates = response_json(response).await;
    assert_eq!(certificates.as_array().unwrap().len(), 1);

    // Re-saving the completed progress row doesn't duplicate it
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "PATCH",
            &format!("/v1/progress/{}", progress.id),
            &teacher_header,
            json!({ "completed_lessons": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "GET",
            "/v1/certificates",
            &student_header,
            json!({}),
        ))
        .await
        .unwrap();
    let certificates = response_json(response).await;
    assert_eq!(certificates.as_array().unwrap().len(), 1);
}

/// Teachers cannot edit each other's courses
#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_course_ownership_enforced() {
    let ctx = TestContext::with_database().await.unwrap();

    let (_, owner_header) = register_user(&ctx, "teacher", json!({})).await;
    let (_, other_header) = register_user(&ctx, "teacher", json!({})).await;

    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "POST",
            "/v1/courses",
            &owner_header,
            json!({
                "title": "Owned Course",
                "start_date": "2025-09-01",
                "end_date": "2026-06-15",
                "total_lessons": 10,
            }),
        ))
        .await
        .unwrap();
    let course = response_json(response).await;
    let course_id = course["id"].as_str().unwrap();

    // Another teacher cannot edit it
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "PATCH",
            &format!("/v1/courses/{}", course_id),
            &other_header,
            json!({ "title": "Hijacked" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nor delete it
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "DELETE",
            &format!("/v1/courses/{}", course_id),
            &other_header,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can
    let response = ctx
        .app
        .clone()
        .call(authed_json_request(
            "DELETE",
            &format!("/v1/courses/{}", course_id),
            &owner_header,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
