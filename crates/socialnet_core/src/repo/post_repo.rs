//! Post repository contract and SQLite implementation.
//!
//! # Invariants
//! - `author_id` must reference an existing user at write time.
//! - Deleting a post cascades to its likes in the store.

use super::{ensure_connection_ready, map_write_error, RepoError, RepoResult};
use crate::db::schema::{NOW_MS_SQL, POSTS};
use crate::model::post::{NewPost, Post, PostId, PostPatch};
use crate::model::EntityKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Persistence primitives for posts.
pub trait PostRepository {
    fn create_post(&self, input: &NewPost) -> RepoResult<Post>;
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &POSTS)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, input: &NewPost) -> RepoResult<Post> {
        input.validate()?;

        self.conn
            .query_row(
                &format!(
                    "INSERT INTO posts (title, content, author_id)
                     VALUES (?1, ?2, ?3)
                     RETURNING {};",
                    POSTS.select_list()
                ),
                params![input.title, input.content, input.author_id],
                parse_post_row,
            )
            .map_err(|err| map_write_error(EntityKind::Post, err))
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM posts ORDER BY id ASC;",
            POSTS.select_list()
        ))?;
        let posts = stmt
            .query_map([], parse_post_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let post = self
            .conn
            .query_row(
                &format!("SELECT {} FROM posts WHERE id = ?1;", POSTS.select_list()),
                [id],
                parse_post_row,
            )
            .optional()?;
        Ok(post)
    }

    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        patch.validate()?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE posts
                     SET
                        title = COALESCE(?2, title),
                        content = COALESCE(?3, content),
                        author_id = COALESCE(?4, author_id),
                        updated_at = {NOW_MS_SQL}
                     WHERE id = ?1
                     RETURNING {};",
                    POSTS.select_list()
                ),
                params![id, patch.title, patch.content, patch.author_id],
                parse_post_row,
            )
            .optional()
            .map_err(|err| map_write_error(EntityKind::Post, err))?;

        updated.ok_or(RepoError::NotFound {
            entity: EntityKind::Post,
            id,
        })
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id])
            .map_err(|err| map_write_error(EntityKind::Post, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Post,
                id,
            });
        }

        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        author_id: row.get("author_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
