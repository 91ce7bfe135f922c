//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `email` uniqueness is enforced by the store; duplicates surface as
//!   `RepoError::UniquenessViolation`.
//! - Deleting a user cascades to their posts and likes in the store.

use super::{ensure_connection_ready, map_write_error, RepoError, RepoResult};
use crate::db::schema::{NOW_MS_SQL, USERS};
use crate::model::user::{NewUser, User, UserId, UserPatch};
use crate::model::EntityKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Persistence primitives for users.
pub trait UserRepository {
    fn create_user(&self, input: &NewUser) -> RepoResult<User>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn update_user(&self, id: UserId, patch: &UserPatch) -> RepoResult<User>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository borrowing a caller-owned connection.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &USERS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, input: &NewUser) -> RepoResult<User> {
        input.validate()?;

        self.conn
            .query_row(
                &format!(
                    "INSERT INTO users (name, email)
                     VALUES (?1, ?2)
                     RETURNING {};",
                    USERS.select_list()
                ),
                params![input.name, input.email],
                parse_user_row,
            )
            .map_err(|err| map_write_error(EntityKind::User, err))
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY id ASC;",
            USERS.select_list()
        ))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1;", USERS.select_list()),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn update_user(&self, id: UserId, patch: &UserPatch) -> RepoResult<User> {
        patch.validate()?;

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE users
                     SET
                        name = COALESCE(?2, name),
                        email = COALESCE(?3, email),
                        updated_at = {NOW_MS_SQL}
                     WHERE id = ?1
                     RETURNING {};",
                    USERS.select_list()
                ),
                params![id, patch.name, patch.email],
                parse_user_row,
            )
            .optional()
            .map_err(|err| map_write_error(EntityKind::User, err))?;

        updated.ok_or(RepoError::NotFound {
            entity: EntityKind::User,
            id,
        })
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])
            .map_err(|err| map_write_error(EntityKind::User, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id,
            });
        }

        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
