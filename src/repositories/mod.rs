//! Repositories module - storage access for every entity
//!
//! Each repository owns a clone of the connection pool. Category and dish
//! repositories are ownership-scoped: every operation takes the `AdminId`
//! resolved by the authentication middleware and filters on it. Checks and
//! mutations of one operation run inside a single transaction, and the
//! UNIQUE / FOREIGN KEY constraints of the schema back every check so a race
//! between two requests still ends in the same domain error.

pub mod administrator;
pub mod category;
pub mod dish;
pub mod gallery;
pub mod traits;

pub use traits::{Create, OwnedCreate, OwnedDelete, OwnedRead, OwnedUpdate};

pub use administrator::AdministratorRepository;
pub use category::CategoryRepository;
pub use dish::DishRepository;
pub use gallery::{GalleryPage, GalleryRepository};

use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

// single place to change when moving to another database driver
pub type PoolType = SqlitePool;

/// Starts a transaction that takes the write lock on `BEGIN`.
///
/// A deferred transaction that reads and then writes fails with `SQLITE_BUSY`
/// when another writer got there first; an immediate one waits on the busy
/// timeout instead, so its checks see the competing commit.
pub(crate) async fn begin_write(pool: &PoolType) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The entity does not exist or belongs to another administrator.
    #[error("{0}")]
    NotFound(&'static str),

    /// Uniqueness violation (email, category name per administrator).
    #[error("{0}")]
    Conflict(&'static str),

    /// The entity is still referenced by others and cannot be deleted.
    #[error("{0}")]
    HasDependents(&'static str),
}

/// Maps a UNIQUE violation raised by the database to `on_unique`, anything
/// else stays a database error
pub(crate) fn unique_violation_as(err: sqlx::Error, on_unique: RepositoryError) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => on_unique,
        _ => RepositoryError::Database(err),
    }
}

/// Maps a FOREIGN KEY violation raised by the database to `on_foreign_key`
pub(crate) fn foreign_key_violation_as(
    err: sqlx::Error,
    on_foreign_key: RepositoryError,
) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => on_foreign_key,
        _ => RepositoryError::Database(err),
    }
}
