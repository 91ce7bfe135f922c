//! Like entity and its inputs.
//!
//! A like has no `updated_at`; the `(user_id, post_id)` pair is unique.

use super::post::PostId;
use super::user::UserId;
use serde::{Deserialize, Serialize};

pub type LikeId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: LikeId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLike {
    pub user_id: UserId,
    pub post_id: PostId,
}

impl NewLike {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self { user_id, post_id }
    }
}

/// Explicit overwrite of a like's references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
}

impl LikePatch {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.post_id.is_none()
    }
}
