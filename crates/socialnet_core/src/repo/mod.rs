//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Expose the persistence primitives (insert, list, get, update, delete)
//!   for each entity over a caller-owned connection.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Every primitive is exactly one SQL statement; a failed call leaves no
//!   partial write behind.
//! - Repositories hold no cached state between calls.
//! - Write paths validate input before issuing SQL.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::schema::EntitySchema;
use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod like_repo;
pub mod post_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surfaced by every repository and access-service operation.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before reaching storage.
    Validation(ValidationError),
    /// Write would duplicate a unique column or column set.
    UniquenessViolation { entity: EntityKind, detail: String },
    /// Write references a row that does not exist.
    ForeignKeyViolation { entity: EntityKind, detail: String },
    /// Update or delete targeted a missing id.
    NotFound { entity: EntityKind, id: i64 },
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Stable machine-readable code for logs and request-layer mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::UniquenessViolation { .. } => "uniqueness_violation",
            Self::ForeignKeyViolation { .. } => "foreign_key_violation",
            Self::NotFound { .. } => "not_found",
            Self::Db(_) => "db_error",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_required_table",
            Self::MissingRequiredColumn { .. } => "missing_required_column",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UniquenessViolation { entity, detail } => {
                write!(f, "{entity} uniqueness violation: {detail}")
            }
            Self::ForeignKeyViolation { entity, detail } => {
                write!(f, "{entity} references a missing row: {detail}")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a failed write statement into the semantic error taxonomy.
///
/// Only constraint failures are reclassified; everything else stays `Db`.
pub(crate) fn map_write_error(entity: EntityKind, err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            let detail = message
                .clone()
                .unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return RepoError::UniquenessViolation { entity, detail };
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return RepoError::ForeignKeyViolation { entity, detail };
                }
                _ => {}
            }
        }
    }
    RepoError::from(err)
}

/// Verifies that `conn` is migrated and carries the columns of `schema`.
pub(crate) fn ensure_connection_ready(conn: &Connection, schema: &EntitySchema) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, schema.table)? {
        return Err(RepoError::MissingRequiredTable(schema.table));
    }

    let existing = table_columns(conn, schema.table)?;
    for column in schema.column_names() {
        if !existing.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: schema.table,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::{ensure_connection_ready, map_write_error, RepoError};
    use crate::db::open_db_in_memory;
    use crate::db::schema::{LIKES, USERS};
    use crate::model::EntityKind;
    use rusqlite::Connection;

    #[test]
    fn unique_failure_maps_to_uniqueness_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES ('a');", [])
            .unwrap_err();

        let mapped = map_write_error(EntityKind::User, err);
        assert!(matches!(
            mapped,
            RepoError::UniquenessViolation { entity: EntityKind::User, ref detail } if detail.contains("t.v")
        ));
        assert_eq!(mapped.code(), "uniqueness_violation");
    }

    #[test]
    fn foreign_key_failure_maps_to_foreign_key_violation() {
        let conn = open_db_in_memory().unwrap();
        let err = conn
            .execute("INSERT INTO posts (title, content, author_id) VALUES ('t', 'c', 42);", [])
            .unwrap_err();

        let mapped = map_write_error(EntityKind::Post, err);
        assert!(matches!(
            mapped,
            RepoError::ForeignKeyViolation { entity: EntityKind::Post, .. }
        ));
    }

    #[test]
    fn not_null_failure_stays_db_error() {
        let conn = open_db_in_memory().unwrap();
        let err = conn
            .execute("INSERT INTO users (name, email) VALUES (NULL, 'a@x.com');", [])
            .unwrap_err();

        assert!(matches!(map_write_error(EntityKind::User, err), RepoError::Db(_)));
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = ensure_connection_ready(&conn, &USERS).unwrap_err();
        assert!(matches!(
            err,
            RepoError::UninitializedConnection {
                actual_version: 0,
                ..
            }
        ));
    }

    #[test]
    fn dropped_table_is_reported() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch("DROP TABLE likes;").unwrap();
        let err = ensure_connection_ready(&conn, &LIKES).unwrap_err();
        assert!(matches!(err, RepoError::MissingRequiredTable("likes")));
    }
}
