//! Like repository contract and SQLite implementation.
//!
//! # Invariants
//! - A user likes a given post at most once (`UNIQUE(user_id, post_id)`).
//! - Likes vanish with their user or post through store-level cascades.
//! - Likes carry no `updated_at`; an update only overwrites references.

use super::{ensure_connection_ready, map_write_error, RepoError, RepoResult};
use crate::db::schema::LIKES;
use crate::model::like::{Like, LikeId, LikePatch, NewLike};
use crate::model::EntityKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Persistence primitives for likes.
pub trait LikeRepository {
    fn create_like(&self, input: &NewLike) -> RepoResult<Like>;
    fn list_likes(&self) -> RepoResult<Vec<Like>>;
    fn get_like(&self, id: LikeId) -> RepoResult<Option<Like>>;
    fn update_like(&self, id: LikeId, patch: &LikePatch) -> RepoResult<Like>;
    fn delete_like(&self, id: LikeId) -> RepoResult<()>;
}

/// SQLite-backed like repository.
pub struct SqliteLikeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLikeRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &LIKES)?;
        Ok(Self { conn })
    }

    fn not_found(id: LikeId) -> RepoError {
        RepoError::NotFound {
            entity: EntityKind::Like,
            id,
        }
    }
}

impl LikeRepository for SqliteLikeRepository<'_> {
    fn create_like(&self, input: &NewLike) -> RepoResult<Like> {
        self.conn
            .query_row(
                &format!(
                    "INSERT INTO likes (user_id, post_id)
                     VALUES (?1, ?2)
                     RETURNING {};",
                    LIKES.select_list()
                ),
                params![input.user_id, input.post_id],
                parse_like_row,
            )
            .map_err(|err| map_write_error(EntityKind::Like, err))
    }

    fn list_likes(&self) -> RepoResult<Vec<Like>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM likes ORDER BY id ASC;",
            LIKES.select_list()
        ))?;
        let likes = stmt
            .query_map([], parse_like_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(likes)
    }

    fn get_like(&self, id: LikeId) -> RepoResult<Option<Like>> {
        let like = self
            .conn
            .query_row(
                &format!("SELECT {} FROM likes WHERE id = ?1;", LIKES.select_list()),
                [id],
                parse_like_row,
            )
            .optional()?;
        Ok(like)
    }

    fn update_like(&self, id: LikeId, patch: &LikePatch) -> RepoResult<Like> {
        // Nothing to write and no timestamp to refresh.
        if patch.is_empty() {
            return self.get_like(id)?.ok_or_else(|| Self::not_found(id));
        }

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE likes
                     SET
                        user_id = COALESCE(?2, user_id),
                        post_id = COALESCE(?3, post_id)
                     WHERE id = ?1
                     RETURNING {};",
                    LIKES.select_list()
                ),
                params![id, patch.user_id, patch.post_id],
                parse_like_row,
            )
            .optional()
            .map_err(|err| map_write_error(EntityKind::Like, err))?;

        updated.ok_or_else(|| Self::not_found(id))
    }

    fn delete_like(&self, id: LikeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM likes WHERE id = ?1;", [id])
            .map_err(|err| map_write_error(EntityKind::Like, err))?;

        if changed == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }
}

fn parse_like_row(row: &Row<'_>) -> rusqlite::Result<Like> {
    Ok(Like {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        post_id: row.get("post_id")?,
        created_at: row.get("created_at")?,
    })
}
