//! Post access service.

use super::log_outcome;
use crate::model::post::{NewPost, Post, PostId, PostPatch};
use crate::repo::post_repo::PostRepository;
use crate::repo::RepoResult;

/// Access component for posts.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new post; the author must exist.
    pub fn create(&self, input: &NewPost) -> RepoResult<Post> {
        let result = self.repo.create_post(input);
        let id = result.as_ref().ok().map(|post| post.id);
        log_outcome("post_create", id, result)
    }

    pub fn find_all(&self) -> RepoResult<Vec<Post>> {
        self.repo.list_posts()
    }

    pub fn find_one(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.repo.get_post(id)
    }

    pub fn update(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        log_outcome("post_update", Some(id), self.repo.update_post(id, patch))
    }

    /// Deletes the post and every like on it.
    pub fn remove(&self, id: PostId) -> RepoResult<()> {
        log_outcome("post_remove", Some(id), self.repo.delete_post(id))
    }
}
