/// User model and database operations
///
/// A user is an account identity. It may own at most one teacher or one
/// student profile (see [`crate::models::teacher`] and
/// [`crate::models::student`]); the profile that exists determines the
/// user's role.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username CITEXT NOT NULL UNIQUE,
///     email CITEXT NOT NULL UNIQUE,
///     mobile_number VARCHAR(15) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     profile_pic VARCHAR(512),
///     bio TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name (case-insensitive via CITEXT, unique)
    pub username: String,

    /// Email address (case-insensitive via CITEXT, unique)
    pub email: String,

    /// Mobile phone number (unique)
    pub mobile_number: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Media path of the profile picture, if uploaded
    pub profile_pic: Option<String>,

    /// Free-form biography
    pub bio: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Mobile phone number
    pub mobile_number: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional biography
    pub bio: Option<String>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error when a unique constraint (username, email, mobile
    /// number) is violated or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, mobile_number, password_hash, bio)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, mobile_number, password_hash, profile_pic, bio,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.mobile_number)
        .bind(data.password_hash)
        .bind(data.bio)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, mobile_number, password_hash, profile_pic, bio,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// Lookup is case-insensitive (CITEXT column).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, mobile_number, password_hash, profile_pic, bio,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Records the media path of the user's profile picture
    ///
    /// Returns the updated user if found, None otherwise.
    pub async fn set_profile_pic(
        pool: &PgPool,
        id: Uuid,
        path: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET profile_pic = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, mobile_number, password_hash, profile_pic, bio,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(id)
        .bind(path)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates the last login timestamp
    ///
    /// Called after successful authentication. Returns true if the user was
    /// found and updated.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by ID
    ///
    /// Cascades to the role profile and everything hanging off it. Returns
    /// true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            mobile_number: "+15550100".to_string(),
            password_hash: "hash".to_string(),
            bio: Some("hello".to_string()),
        };

        assert_eq!(create_user.username, "testuser");
        assert_eq!(create_user.email, "test@example.com");
    }

    #[test]
    fn test_user_serialization_includes_username() {
        let user = User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            mobile_number: "+15550100".to_string(),
            password_hash: "hash".to_string(),
            profile_pic: None,
            bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("jdoe"));
    }

    // Integration tests for database operations are in classroom-api/tests.
}
