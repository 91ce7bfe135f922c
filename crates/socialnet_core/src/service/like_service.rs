//! Like access service.

use super::log_outcome;
use crate::model::like::{Like, LikeId, LikePatch, NewLike};
use crate::repo::like_repo::LikeRepository;
use crate::repo::RepoResult;

pub struct LikeService<R: LikeRepository> {
    repo: R,
}

impl<R: LikeRepository> LikeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records that `user_id` likes `post_id`.
    ///
    /// A second like for the same pair fails with `UniquenessViolation`.
    pub fn create(&self, input: &NewLike) -> RepoResult<Like> {
        let result = self.repo.create_like(input);
        let id = result.as_ref().ok().map(|like| like.id);
        log_outcome("like_create", id, result)
    }

    pub fn find_all(&self) -> RepoResult<Vec<Like>> {
        self.repo.list_likes()
    }

    pub fn find_one(&self, id: LikeId) -> RepoResult<Option<Like>> {
        self.repo.get_like(id)
    }

    pub fn update(&self, id: LikeId, patch: &LikePatch) -> RepoResult<Like> {
        log_outcome("like_update", Some(id), self.repo.update_like(id, patch))
    }

    pub fn remove(&self, id: LikeId) -> RepoResult<()> {
        log_outcome("like_remove", Some(id), self.repo.delete_like(id))
    }
}
