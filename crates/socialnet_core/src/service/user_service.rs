//! User access service.

use super::log_outcome;
use crate::model::user::{NewUser, User, UserId, UserPatch};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

/// Access component for users.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new user.
    ///
    /// Fails with `UniquenessViolation` when the email is already taken.
    pub fn create(&self, input: &NewUser) -> RepoResult<User> {
        let result = self.repo.create_user(input);
        let id = result.as_ref().ok().map(|user| user.id);
        log_outcome("user_create", id, result)
    }

    /// Returns every user in insertion order.
    pub fn find_all(&self) -> RepoResult<Vec<User>> {
        self.repo.list_users()
    }

    /// Returns `Ok(None)` when no user has this id.
    pub fn find_one(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }

    /// Applies present patch fields and refreshes `updated_at`.
    pub fn update(&self, id: UserId, patch: &UserPatch) -> RepoResult<User> {
        log_outcome("user_update", Some(id), self.repo.update_user(id, patch))
    }

    /// Deletes the user together with their posts and likes.
    pub fn remove(&self, id: UserId) -> RepoResult<()> {
        log_outcome("user_remove", Some(id), self.repo.delete_user(id))
    }
}
