//! Declarative description of the relational schema.
//!
//! # Responsibility
//! - Declare every entity table, its columns and constraints exactly once.
//! - Render the description to SQLite DDL for migrations.
//! - Serve as the reference when verifying that a connection is usable.
//!
//! # Invariants
//! - Primary keys are `INTEGER PRIMARY KEY AUTOINCREMENT` and never reused.
//! - `created_at` / `updated_at` default to the current time in epoch ms.
//! - Every foreign key cascades on delete, so no orphan row survives a delete.
//! - `ENTITIES` is ordered so referenced tables precede referencing tables.

use crate::model::EntityKind;

/// SQL expression yielding the current time in epoch milliseconds.
///
/// `strftime('%s')` only has second resolution, so julian day is used.
pub const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

/// Semantic column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Store-assigned surrogate key.
    Id,
    /// Plain 64-bit integer (also used for foreign keys).
    Integer,
    /// UTF-8 text.
    Text,
    /// Epoch milliseconds.
    TimestampMs,
}

/// Value the store fills in when an insert omits the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    CurrentTimeMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    pub default: Option<ColumnDefault>,
}

/// Uniqueness constraint over one or more columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Action taken on dependent rows when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    /// Referenced entity; its `id` column is the target.
    pub references: EntityKind,
    pub on_delete: OnDelete,
}

/// Full storage description of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub entity: EntityKind,
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    pub unique: &'static [UniqueConstraint],
    pub foreign_keys: &'static [ForeignKey],
}

const fn id_column() -> ColumnDef {
    ColumnDef {
        name: "id",
        ty: ColumnType::Id,
        nullable: false,
        default: None,
    }
}

const fn required(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: false,
        default: None,
    }
}

const fn timestamp(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::TimestampMs,
        nullable: false,
        default: Some(ColumnDefault::CurrentTimeMs),
    }
}

pub const USERS: EntitySchema = EntitySchema {
    entity: EntityKind::User,
    table: "users",
    columns: &[
        id_column(),
        required("name", ColumnType::Text),
        required("email", ColumnType::Text),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    unique: &[UniqueConstraint {
        name: "uq_users_email",
        columns: &["email"],
    }],
    foreign_keys: &[],
};

pub const POSTS: EntitySchema = EntitySchema {
    entity: EntityKind::Post,
    table: "posts",
    columns: &[
        id_column(),
        required("title", ColumnType::Text),
        required("content", ColumnType::Text),
        required("author_id", ColumnType::Integer),
        timestamp("created_at"),
        timestamp("updated_at"),
    ],
    unique: &[],
    foreign_keys: &[ForeignKey {
        column: "author_id",
        references: EntityKind::User,
        on_delete: OnDelete::Cascade,
    }],
};

pub const LIKES: EntitySchema = EntitySchema {
    entity: EntityKind::Like,
    table: "likes",
    columns: &[
        id_column(),
        required("user_id", ColumnType::Integer),
        required("post_id", ColumnType::Integer),
        timestamp("created_at"),
    ],
    unique: &[UniqueConstraint {
        name: "uq_likes_user_post",
        columns: &["user_id", "post_id"],
    }],
    foreign_keys: &[
        ForeignKey {
            column: "user_id",
            references: EntityKind::User,
            on_delete: OnDelete::Cascade,
        },
        ForeignKey {
            column: "post_id",
            references: EntityKind::Post,
            on_delete: OnDelete::Cascade,
        },
    ],
};

/// All entities, referenced tables first.
pub const ENTITIES: &[EntitySchema] = &[USERS, POSTS, LIKES];

/// Returns the schema entry for one entity kind.
pub fn schema_for(entity: EntityKind) -> &'static EntitySchema {
    match entity {
        EntityKind::User => &USERS,
        EntityKind::Post => &POSTS,
        EntityKind::Like => &LIKES,
    }
}

impl EntitySchema {
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    /// Comma-separated column list in declaration order, for SELECT/RETURNING.
    pub fn select_list(&self) -> String {
        self.column_names().collect::<Vec<_>>().join(", ")
    }
}

/// Renders `CREATE TABLE` for one entity.
pub fn create_table_sql(schema: &EntitySchema) -> String {
    let mut parts: Vec<String> = schema.columns.iter().map(column_sql).collect();

    for constraint in schema.unique {
        parts.push(format!(
            "CONSTRAINT {} UNIQUE ({})",
            constraint.name,
            constraint.columns.join(", ")
        ));
    }

    for fk in schema.foreign_keys {
        parts.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}(id) ON DELETE {}",
            fk.column,
            schema_for(fk.references).table,
            on_delete_sql(fk.on_delete)
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        schema.table,
        parts.join(",\n    ")
    )
}

/// Renders DDL for every entity plus one index per foreign-key column.
pub fn render_schema_ddl() -> String {
    let mut statements = Vec::new();
    for schema in ENTITIES {
        statements.push(create_table_sql(schema));
        for fk in schema.foreign_keys {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column});",
                table = schema.table,
                column = fk.column
            ));
        }
    }
    statements.join("\n")
}

fn column_sql(column: &ColumnDef) -> String {
    if column.ty == ColumnType::Id {
        return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", column.name);
    }

    let mut sql = format!("{} {}", column.name, sql_type(column.ty));
    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = column.default {
        sql.push_str(&format!(" DEFAULT ({})", default_sql(default)));
    }
    sql
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Id | ColumnType::Integer | ColumnType::TimestampMs => "INTEGER",
        ColumnType::Text => "TEXT",
    }
}

fn default_sql(default: ColumnDefault) -> &'static str {
    match default {
        ColumnDefault::CurrentTimeMs => NOW_MS_SQL,
    }
}

fn on_delete_sql(action: OnDelete) -> &'static str {
    match action {
        OnDelete::Cascade => "CASCADE",
    }
}

#[cfg(test)]
mod tests {
    use super::{create_table_sql, render_schema_ddl, schema_for, ENTITIES, LIKES, USERS};
    use crate::model::EntityKind;

    #[test]
    fn entities_are_declared_before_their_dependents() {
        for (index, schema) in ENTITIES.iter().enumerate() {
            for fk in schema.foreign_keys {
                let referenced = ENTITIES
                    .iter()
                    .position(|candidate| candidate.entity == fk.references)
                    .expect("referenced entity must be registered");
                assert!(referenced < index, "{} references a later table", schema.table);
            }
        }
    }

    #[test]
    fn users_table_declares_autoincrement_id_and_unique_email() {
        let sql = create_table_sql(&USERS);
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("CONSTRAINT uq_users_email UNIQUE (email)"));
        assert!(sql.contains("email TEXT NOT NULL"));
    }

    #[test]
    fn likes_table_declares_composite_unique_and_cascading_fks() {
        let sql = create_table_sql(&LIKES);
        assert!(sql.contains("UNIQUE (user_id, post_id)"));
        assert!(sql.contains("FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE"));
        assert!(sql.contains("FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE"));
        assert!(!sql.contains("updated_at"));
    }

    #[test]
    fn rendered_ddl_indexes_every_foreign_key() {
        let ddl = render_schema_ddl();
        assert!(ddl.contains("idx_posts_author_id"));
        assert!(ddl.contains("idx_likes_user_id"));
        assert!(ddl.contains("idx_likes_post_id"));
    }

    #[test]
    fn schema_for_matches_entity_kind() {
        for kind in [EntityKind::User, EntityKind::Post, EntityKind::Like] {
            assert_eq!(schema_for(kind).entity, kind);
        }
        assert_eq!(USERS.select_list(), "id, name, email, created_at, updated_at");
    }
}
