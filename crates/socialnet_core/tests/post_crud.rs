use rusqlite::Connection;
use socialnet_core::db::open_db_in_memory;
use socialnet_core::{
    EntityKind, NewPost, NewUser, PostPatch, PostService, RepoError, SqlitePostRepository,
    SqliteUserRepository, User, UserService,
};

fn seed_user(conn: &Connection, name: &str, email: &str) -> User {
    UserService::new(SqliteUserRepository::try_new(conn).unwrap())
        .create(&NewUser::new(name, email))
        .unwrap()
}

fn posts(conn: &Connection) -> PostService<SqlitePostRepository<'_>> {
    PostService::new(SqlitePostRepository::try_new(conn).unwrap())
}

#[test]
fn create_post_for_existing_author() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "Alice", "a@x.com");

    let post = posts(&conn)
        .create(&NewPost::new("Hi", "World", alice.id))
        .unwrap();
    assert_eq!(post.id, 1);
    assert_eq!(post.title, "Hi");
    assert_eq!(post.content, "World");
    assert_eq!(post.author_id, alice.id);
    assert_eq!(post.created_at, post.updated_at);
}

#[test]
fn create_post_with_missing_author_fails_with_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let service = posts(&conn);

    let err = service.create(&NewPost::new("Hi", "World", 99)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ForeignKeyViolation {
            entity: EntityKind::Post,
            ..
        }
    ));
    assert!(service.find_all().unwrap().is_empty());
}

#[test]
fn update_applies_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "Alice", "a@x.com");
    let bob = seed_user(&conn, "Bob", "b@x.com");
    let service = posts(&conn);
    let post = service.create(&NewPost::new("Hi", "World", alice.id)).unwrap();

    let retitled = service
        .update(
            post.id,
            &PostPatch {
                title: Some("Hello".to_string()),
                ..PostPatch::default()
            },
        )
        .unwrap();
    assert_eq!(retitled.title, "Hello");
    assert_eq!(retitled.content, "World");
    assert_eq!(retitled.author_id, alice.id);
    assert_eq!(retitled.created_at, post.created_at);
    assert!(retitled.updated_at >= post.updated_at);

    let reassigned = service
        .update(
            post.id,
            &PostPatch {
                author_id: Some(bob.id),
                ..PostPatch::default()
            },
        )
        .unwrap();
    assert_eq!(reassigned.author_id, bob.id);
    assert_eq!(reassigned.title, "Hello");
}

#[test]
fn update_to_missing_author_fails_with_foreign_key_violation() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "Alice", "a@x.com");
    let service = posts(&conn);
    let post = service.create(&NewPost::new("Hi", "World", alice.id)).unwrap();

    let err = service
        .update(
            post.id,
            &PostPatch {
                author_id: Some(404),
                ..PostPatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "foreign_key_violation");
    assert_eq!(service.find_one(post.id).unwrap().unwrap().author_id, alice.id);
}

#[test]
fn update_refreshes_updated_at_and_keeps_created_at() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "Alice", "a@x.com");
    let service = posts(&conn);
    let post = service.create(&NewPost::new("Hi", "World", alice.id)).unwrap();
    conn.execute("UPDATE posts SET updated_at = 0, created_at = 0;", [])
        .unwrap();

    let updated = service
        .update(
            post.id,
            &PostPatch {
                content: Some("Edited".to_string()),
                ..PostPatch::default()
            },
        )
        .unwrap();
    assert!(updated.updated_at > 0);
    assert_eq!(updated.created_at, 0);
    assert_eq!(updated.content, "Edited");
    assert_eq!(updated.title, "Hi");
}

#[test]
fn find_all_and_find_one() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "Alice", "a@x.com");
    let service = posts(&conn);
    let first = service.create(&NewPost::new("one", "1", alice.id)).unwrap();
    let second = service.create(&NewPost::new("two", "2", alice.id)).unwrap();

    assert_eq!(service.find_all().unwrap(), vec![first.clone(), second]);
    assert_eq!(service.find_one(first.id).unwrap(), Some(first));
    assert_eq!(service.find_one(1234).unwrap(), None);
}

#[test]
fn update_and_remove_missing_post_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = posts(&conn);

    let err = service.update(5, &PostPatch::default()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Post,
            id: 5
        }
    ));
    assert!(matches!(
        service.remove(5).unwrap_err(),
        RepoError::NotFound { id: 5, .. }
    ));
}

#[test]
fn blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "Alice", "a@x.com");
    let service = posts(&conn);

    let err = service.create(&NewPost::new("  ", "body", alice.id)).unwrap_err();
    assert_eq!(err.code(), "validation_failed");
}
