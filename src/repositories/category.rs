//! CategoryRepository - ownership-scoped categories

use super::{
    OwnedCreate, OwnedDelete, OwnedRead, OwnedUpdate, PoolType, RepositoryError,
    begin_write, foreign_key_violation_as, unique_violation_as,
};
use crate::dtos::{NewCategory, UpdateCategoryDTO};
use crate::entities::{AdminId, Category};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info, instrument, warn};

pub const CATEGORY_NOT_FOUND: &str = "Categoría no encontrada o sin permisos";
pub const DUPLICATE_NAME: &str = "Ya existe una categoría con ese nombre para este administrador";
pub const HAS_DISHES: &str = "No puedes eliminar: existen platos en esta categoría";

pub struct CategoryRepository {
    connection_pool: PoolType,
}

impl CategoryRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    /// Categories of `owner`, ordered by id
    #[instrument(skip(self), fields(admin_id = %owner))]
    pub async fn list(&self, owner: AdminId) -> Result<Vec<Category>, RepositoryError> {
        debug!("Listing categories");
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, admin_id FROM categories WHERE admin_id = ? ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.connection_pool)
        .await?;

        info!("Found {} categories", categories.len());
        Ok(categories)
    }
}

/// Looks up a category by id and owner on an open connection or transaction.
///
/// Existence and ownership are one predicate, so a foreign category is
/// indistinguishable from a missing one.
pub(crate) async fn find_owned_category(
    conn: &mut SqliteConnection,
    owner: AdminId,
    category_id: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, description, admin_id FROM categories WHERE id = ? AND admin_id = ?",
    )
    .bind(category_id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await
}

/// Lowercased copy stored beside a searchable column; the gallery compares
/// against it because SQLite's LOWER() leaves non-ASCII letters untouched
pub(crate) fn search_key(text: &str) -> String {
    text.to_lowercase()
}

/// True when `owner` already has a category called `name`, ignoring `exclude`
async fn name_taken(
    conn: &mut SqliteConnection,
    owner: AdminId,
    name: &str,
    exclude: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM categories WHERE name = ? AND admin_id = ? AND (? IS NULL OR id <> ?)",
    )
    .bind(name)
    .bind(owner)
    .bind(exclude)
    .bind(exclude)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

impl OwnedRead<Category, i64> for CategoryRepository {
    #[instrument(skip(self), fields(admin_id = %owner, category_id = %id))]
    async fn read(&self, owner: AdminId, id: &i64) -> Result<Category, RepositoryError> {
        debug!("Reading category");
        let mut conn = self.connection_pool.acquire().await?;
        find_owned_category(&mut conn, owner, *id)
            .await?
            .ok_or_else(|| {
                warn!("Category not found or owned by another administrator");
                RepositoryError::NotFound(CATEGORY_NOT_FOUND)
            })
    }
}

impl OwnedCreate<Category, NewCategory> for CategoryRepository {
    #[instrument(skip(self, data), fields(admin_id = %owner))]
    async fn create(&self, owner: AdminId, data: &NewCategory) -> Result<Category, RepositoryError> {
        debug!("Creating new category");
        let mut tx = begin_write(&self.connection_pool).await?;

        if name_taken(&mut tx, owner, &data.name, None).await? {
            warn!("Duplicate category name for administrator");
            return Err(RepositoryError::Conflict(DUPLICATE_NAME));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description, name_search, description_search, admin_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(search_key(&data.name))
        .bind(data.description.as_deref().map(search_key))
        .bind(owner)
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_violation_as(e, RepositoryError::Conflict(DUPLICATE_NAME)))?;

        tx.commit().await?;

        let new_id = result.last_insert_rowid();
        info!("Category created with id {}", new_id);

        Ok(Category {
            id: new_id,
            name: data.name.clone(),
            description: data.description.clone(),
            admin_id: owner,
        })
    }
}

impl OwnedUpdate<Category, UpdateCategoryDTO, i64> for CategoryRepository {
    #[instrument(skip(self, data), fields(admin_id = %owner, category_id = %id))]
    async fn update(
        &self,
        owner: AdminId,
        id: &i64,
        data: &UpdateCategoryDTO,
    ) -> Result<Category, RepositoryError> {
        debug!("Updating category");
        let mut tx = begin_write(&self.connection_pool).await?;

        let current = find_owned_category(&mut tx, owner, *id)
            .await?
            .ok_or(RepositoryError::NotFound(CATEGORY_NOT_FOUND))?;

        if data.is_empty() {
            debug!("No fields to update, returning current category");
            return Ok(current);
        }

        if let Some(ref name) = data.nombre {
            if name_taken(&mut tx, owner, name, Some(*id)).await? {
                warn!("Another category of this administrator already uses the name");
                return Err(RepositoryError::Conflict(DUPLICATE_NAME));
            }
        }

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE categories SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.nombre {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
            separated.push("name_search = ");
            separated.push_bind_unseparated(search_key(name));
        }
        if let Some(ref description) = data.descripcion {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
            separated.push("description_search = ");
            separated.push_bind_unseparated(description.as_deref().map(search_key));
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(*id);
        query_builder.push(" AND admin_id = ");
        query_builder.push_bind(owner);

        query_builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| unique_violation_as(e, RepositoryError::Conflict(DUPLICATE_NAME)))?;

        let updated = find_owned_category(&mut tx, owner, *id)
            .await?
            .ok_or(RepositoryError::NotFound(CATEGORY_NOT_FOUND))?;

        tx.commit().await?;
        info!("Category updated successfully");
        Ok(updated)
    }
}

impl OwnedDelete<i64> for CategoryRepository {
    #[instrument(skip(self), fields(admin_id = %owner, category_id = %id))]
    async fn delete(&self, owner: AdminId, id: &i64) -> Result<(), RepositoryError> {
        debug!("Deleting category");
        let mut tx = begin_write(&self.connection_pool).await?;

        find_owned_category(&mut tx, owner, *id)
            .await?
            .ok_or(RepositoryError::NotFound(CATEGORY_NOT_FOUND))?;

        // any dish counts, whoever owns it
        let dependents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes WHERE category_id = ?")
            .bind(*id)
            .fetch_one(&mut *tx)
            .await?;
        if dependents > 0 {
            warn!("Category still has {} dishes", dependents);
            return Err(RepositoryError::HasDependents(HAS_DISHES));
        }

        sqlx::query("DELETE FROM categories WHERE id = ? AND admin_id = ?")
            .bind(*id)
            .bind(owner)
            .execute(&mut *tx)
            .await
            .map_err(|e| foreign_key_violation_as(e, RepositoryError::HasDependents(HAS_DISHES)))?;

        tx.commit().await?;
        info!("Category deleted successfully");
        Ok(())
    }
}
