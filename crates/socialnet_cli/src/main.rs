//! CLI smoke entry point.
//!
//! Usage: `socialnet_cli [db_path] [log_dir]`
//!
//! Opens the database (in-memory when `db_path` is omitted or `:memory:`),
//! optionally starts file logging, then prints version, schema version and
//! row counts per entity.

use log::info;
use socialnet_core::db::migrations::current_user_version;
use socialnet_core::db::{open_db, open_db_in_memory};
use socialnet_core::{
    core_version, default_log_level, init_logging, LikeService, PostService, SqliteLikeRepository,
    SqlitePostRepository, SqliteUserRepository, UserService,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("socialnet_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next();
    if let Some(log_dir) = args.next() {
        init_logging(default_log_level(), &log_dir)?;
    }

    let conn = match db_path.as_deref() {
        None | Some(":memory:") => open_db_in_memory()?,
        Some(path) => open_db(path)?,
    };

    let users = UserService::new(SqliteUserRepository::try_new(&conn)?).find_all()?;
    let posts = PostService::new(SqlitePostRepository::try_new(&conn)?).find_all()?;
    let likes = LikeService::new(SqliteLikeRepository::try_new(&conn)?).find_all()?;

    info!(
        "event=cli_probe module=cli status=ok users={} posts={} likes={}",
        users.len(),
        posts.len(),
        likes.len()
    );

    println!("socialnet_core version={}", core_version());
    println!("schema_version={}", current_user_version(&conn)?);
    println!("users={} posts={} likes={}", users.len(), posts.len(), likes.len());
    Ok(())
}
