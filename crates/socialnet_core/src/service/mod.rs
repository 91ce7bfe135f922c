//! Per-entity access services.
//!
//! # Responsibility
//! - Expose exactly `create`, `find_all`, `find_one`, `update`, `remove` per
//!   entity to the request layer.
//! - Delegate every call to one repository primitive.
//!
//! # Invariants
//! - Services never call each other; entities relate only through foreign
//!   keys in the store.
//! - Repository errors are returned unchanged; nothing is retried or cached.
//! - Logs carry ids and error codes only, never user-provided text.

use crate::repo::RepoResult;
use log::{debug, warn};

pub mod like_service;
pub mod post_service;
pub mod user_service;

/// Logs the outcome of a mutating call and passes the result through.
fn log_outcome<T>(event: &'static str, id: Option<i64>, result: RepoResult<T>) -> RepoResult<T> {
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match &result {
        Ok(_) => debug!("event={event} module=service status=ok id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error id={id} error_code={}",
            err.code()
        ),
    }
    result
}
