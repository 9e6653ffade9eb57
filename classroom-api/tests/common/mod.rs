/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - A router wired to a lazily-connected pool, so middleware and routing
///   behavior is testable without infrastructure
/// - A database-backed context for the `#[ignore]`d end-to-end tests
///   (set `DATABASE_URL` and run with `cargo test -- --ignored`)
/// - JWT token generation and request helpers

use axum::body::Body;
use axum::http::{Request, Response};
use classroom_api::app::{build_router, AppState};
use classroom_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, MediaConfig};
use classroom_shared::auth::jwt::{create_token, Claims, TokenType};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// JWT secret used across tests
pub const TEST_JWT_SECRET: &str = "classroom-test-secret-key-32-bytes!!";

/// Builds a test configuration
pub fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        media: MediaConfig {
            root: std::env::temp_dir()
                .join(format!("classroom-test-media-{}", Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            cert_font_path: "assets/DejaVuSans.ttf".to_string(),
        },
    }
}

/// Test context containing the app and its backing pieces
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with a lazily-connected pool
    ///
    /// No database is contacted until a handler actually queries it, so
    /// routing and auth middleware can be exercised standalone.
    pub fn without_database() -> Self {
        let config = test_config("postgresql://127.0.0.1:1/unreachable");

        let db = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy(&config.database.url)
            .expect("lazy pool creation should not fail");

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Self { db, app, config }
    }

    /// Creates a context against a real database from `DATABASE_URL`
    ///
    /// Runs migrations. Only used by `#[ignore]`d tests.
    pub async fn with_database() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is required for database tests"))?;
        let config = test_config(&url);

        let db = PgPool::connect(&url).await?;
        sqlx::migrate!("../classroom-shared/migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(Self { db, app, config })
    }

    /// Returns an Authorization header value for a user id
    pub fn auth_header_for(&self, user_id: Uuid) -> String {
        let claims = Claims::new(user_id, TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret).expect("token creation");
        format!("Bearer {}", token)
    }
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a JSON request with an Authorization header
pub fn authed_json_request(
    method: &str,
    uri: &str,
    auth_header: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth_header)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Reads a response body as JSON
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
