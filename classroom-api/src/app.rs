/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use classroom_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = classroom_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use classroom_shared::auth::{jwt, middleware::AuthContext};
use classroom_shared::certgen::CertificateRenderer;
use classroom_shared::storage::MediaStore;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Maximum accepted upload size (16 MB)
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state
///
/// Cloned into each request handler via Axum's `State` extractor; the
/// inner pieces are cheap to clone (pool handle and Arcs).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Media store for uploads and generated artifacts
    pub media: Arc<MediaStore>,

    /// Certificate renderer; None when the configured font is unavailable
    pub renderer: Option<Arc<CertificateRenderer>>,
}

impl AppState {
    /// Creates application state, loading the certificate font
    ///
    /// A missing or unparseable font disables artifact rendering but never
    /// prevents startup; certificate rows are still issued.
    pub fn new(db: PgPool, config: Config) -> Self {
        let media = Arc::new(MediaStore::new(config.media.root.clone()));

        let renderer = match CertificateRenderer::from_font_file(&config.media.cert_font_path) {
            Ok(renderer) => Some(Arc::new(renderer)),
            Err(e) => {
                tracing::warn!(
                    font = %config.media.cert_font_path,
                    error = %e,
                    "Certificate rendering disabled"
                );
                None
            }
        };

        Self {
            db,
            config: Arc::new(config),
            media,
            renderer,
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the certificate renderer, if configured
    pub fn renderer(&self) -> Option<&CertificateRenderer> {
        self.renderer.as_deref()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /media/*                       # Uploaded files and artifacts (public)
/// └── /v1/
///     ├── /auth/                     # register, login, refresh (public)
///     ├── /courses                   # GET public catalog; other ops authenticated
///     │   ├── /mine                  # Teacher's own courses
///     │   ├── /files                 # Course file upload
///     │   └── /:id[/thumbnail]       # Detail, edit, delete, thumbnail
///     ├── /course-files/:id          # Course file delete
///     ├── /enrollments               # Enroll + list (student)
///     ├── /assignments[/:id]         # Course assignments
///     ├── /announcements[/:id]       # Course announcements
///     ├── /progress/:id              # Progress tracking (course teacher)
///     ├── /certificates              # Student's issued certificates
///     └── /profile[/picture]         # Current user profile
/// ```
///
/// # Middleware Stack
///
/// Applied in order: request tracing (tower-http TraceLayer), CORS,
/// security headers; JWT authentication is layered per route group.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: no authentication required
    let public_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/courses", get(routes::courses::list_courses));

    // Everything else requires a valid access token
    let protected_routes = Router::new()
        .route("/profile", get(routes::profile::get_profile))
        .route("/profile/picture", put(routes::profile::upload_picture))
        .route("/courses", post(routes::courses::create_course))
        .route("/courses/mine", get(routes::courses::my_courses))
        .route("/courses/files", post(routes::files::upload_course_file))
        .route(
            "/courses/:id",
            get(routes::courses::course_detail)
                .patch(routes::courses::update_course)
                .delete(routes::courses::delete_course),
        )
        .route(
            "/courses/:id/thumbnail",
            put(routes::courses::upload_thumbnail),
        )
        .route(
            "/course-files/:id",
            axum::routing::delete(routes::files::delete_course_file),
        )
        .route(
            "/enrollments",
            post(routes::enrollments::enroll).get(routes::enrollments::enrolled_courses),
        )
        .route("/assignments", post(routes::assignments::create_assignment))
        .route(
            "/assignments/:id",
            get(routes::assignments::get_assignment)
                .patch(routes::assignments::update_assignment)
                .delete(routes::assignments::delete_assignment),
        )
        .route(
            "/announcements",
            post(routes::announcements::create_announcement),
        )
        .route(
            "/announcements/:id",
            get(routes::announcements::get_announcement)
                .patch(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .route(
            "/progress/:id",
            get(routes::progress::get_progress)
                .patch(routes::progress::update_progress)
                .delete(routes::progress::delete_progress),
        )
        .route(
            "/certificates",
            get(routes::certificates::my_certificates),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = public_routes.merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .nest_service("/media", ServeDir::new(state.media.root()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the access token from the Authorization header,
/// then injects an [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    req.extensions_mut()
        .insert(AuthContext::from_jwt(claims.sub));

    Ok(next.run(req).await)
}
