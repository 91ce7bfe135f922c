//! Domain model for users, posts and likes.
//!
//! # Responsibility
//! - Define persisted entity shapes and the input shapes that create or
//!   patch them.
//! - Validate input at the model boundary before repositories write.
//!
//! # Invariants
//! - Identifiers are store-assigned, positive and never reused.
//! - Timestamps are epoch milliseconds assigned by the store.
//! - Patch fields set to `None` leave the stored value untouched.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod like;
pub mod post;
pub mod user;
pub mod validation;

/// Entity type tag used in errors, logs and schema lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Post,
    Like,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Post => "post",
            Self::Like => "like",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
