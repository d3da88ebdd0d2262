//! # CRM Shared Library
//!
//! Domain types, persistence and the authentication core used by the CRM API
//! server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT tokens, credential store and role guard
//! - `db`: PostgreSQL connection pool
//! - `models`: Database models and their queries

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the CRM shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
