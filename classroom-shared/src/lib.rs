//! # Classroom Shared Library
//!
//! This crate contains the types, persistence layer, and business logic
//! shared by the Classroom API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, middleware, authorization
//! - `db`: Connection pool and migration runner
//! - `storage`: Local media storage for uploads and generated artifacts
//! - `certgen`: Certificate image rendering

pub mod auth;
pub mod certgen;
pub mod db;
pub mod models;
pub mod storage;

/// Current version of the Classroom shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
