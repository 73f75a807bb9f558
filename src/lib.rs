//! # TaskFlow API
//!
//! `taskflow` is a small HTTP backend whose one real workflow is user
//! registration (`POST /auth/register`).
//!
//! ## Registration
//!
//! A request must carry `name`, `email` and `password`. Emails are normalized
//! (trimmed, lowercased) so uniqueness is case-insensitive. Passwords are
//! hashed with bcrypt before they reach the store and are never echoed back.
//!
//! ## Storage
//!
//! Users live behind the [`store::UserStore`] trait. The PostgreSQL adapter
//! enforces email uniqueness with a unique index, so two concurrent
//! registrations for the same email can never both succeed; the in-memory
//! adapter gives the same guarantee under a single lock.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
