//! Common repository traits
//!
//! This module defines generic interfaces for database operations. The
//! `Owned*` traits are the tenant-scoped variants: the owner is always passed
//! explicitly and an entity owned by someone else behaves exactly like a
//! missing one.

use super::RepositoryError;
use crate::entities::AdminId;

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, RepositoryError>;
}

/// Creates an entity owned by `owner`
///
/// Implementations set the owner column from `owner` only, never from `data`.
pub trait OwnedCreate<Entity, CreateDTO> {
    async fn create(&self, owner: AdminId, data: &CreateDTO) -> Result<Entity, RepositoryError>;
}

/// Reads an entity owned by `owner`
///
/// # Returns
/// * `Ok(Entity)` - Entity found and owned by `owner`
/// * `Err(RepositoryError::NotFound)` - missing, or owned by another administrator
pub trait OwnedRead<Entity, Id> {
    async fn read(&self, owner: AdminId, id: &Id) -> Result<Entity, RepositoryError>;
}

/// Partially updates an entity owned by `owner`
///
/// Only the fields present in `data` are written; the whole update commits or
/// nothing does.
pub trait OwnedUpdate<Entity, UpdateDTO, Id> {
    async fn update(
        &self,
        owner: AdminId,
        id: &Id,
        data: &UpdateDTO,
    ) -> Result<Entity, RepositoryError>;
}

/// Deletes an entity owned by `owner`
pub trait OwnedDelete<Id> {
    async fn delete(&self, owner: AdminId, id: &Id) -> Result<(), RepositoryError>;
}
