/// API route handlers
///
/// One module per resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `profile`: Current user profile and profile picture
/// - `courses`: Course catalog, authoring, and thumbnails
/// - `enrollments`: Student enrollment and the progress cascade
/// - `assignments`, `announcements`, `files`: Course child records
/// - `progress`: Progress tracking and certificate issuance
/// - `certificates`: Issued certificate listing

pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod certificates;
pub mod courses;
pub mod enrollments;
pub mod files;
pub mod health;
pub mod profile;
pub mod progress;
