//! Core data model for a minimal social network: users, posts and likes.
//! This crate is the single source of truth for relational invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::like::{Like, LikeId, LikePatch, NewLike};
pub use model::post::{NewPost, Post, PostId, PostPatch};
pub use model::user::{NewUser, User, UserId, UserPatch};
pub use model::validation::ValidationError;
pub use model::EntityKind;
pub use repo::like_repo::{LikeRepository, SqliteLikeRepository};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::like_service::LikeService;
pub use service::post_service::PostService;
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
