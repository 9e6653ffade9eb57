/// Database models for the Classroom backend
///
/// One module per table, each holding the row struct, its input structs,
/// and CRUD operations.
///
/// # Models
///
/// - `user`: Account identity and credentials
/// - `teacher`: Teacher profile (one per user at most)
/// - `student`: Student profile (one per user at most)
/// - `course`: Courses owned by a teacher
/// - `enrollment`: (student, course) pairs; creation seeds a progress row
/// - `progress`: Per-enrollment lesson counts and completion state
/// - `certificate`: Issued on completion of an enrolled course
/// - `assignment`, `announcement`, `course_file`: Course child records
///
/// # Example
///
/// ```no_run
/// use classroom_shared::models::user::{CreateUser, User};
/// use classroom_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "jdoe".to_string(),
///         email: "jdoe@example.com".to_string(),
///         mobile_number: "+15550100".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         bio: None,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod announcement;
pub mod assignment;
pub mod certificate;
pub mod course;
pub mod course_file;
pub mod enrollment;
pub mod progress;
pub mod student;
pub mod teacher;
pub mod user;
