//! DishRepository - ownership-scoped dishes

use super::category::{CATEGORY_NOT_FOUND, find_owned_category};
use super::{
    OwnedCreate, OwnedDelete, OwnedRead, OwnedUpdate, PoolType, RepositoryError,
    begin_write, foreign_key_violation_as,
};
use crate::dtos::{NewDish, UpdateDishDTO};
use crate::entities::{AdminId, Dish};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

pub const DISH_NOT_FOUND: &str = "Plato no encontrado o sin permisos";
pub const NEW_CATEGORY_NOT_FOUND: &str = "La nueva categoría no existe o no te pertenece";

pub(crate) const DISH_COLUMNS: &str = "id, name, description, photo_url, price, prep_minutes, \
     servings, nutrition_info, created_at, category_id, admin_id";

/// Row as stored: the price is kept as decimal text so no digit is lost
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DishRow {
    id: i64,
    name: String,
    description: Option<String>,
    photo_url: String,
    price: Option<String>,
    prep_minutes: Option<i32>,
    servings: Option<i32>,
    nutrition_info: Option<String>,
    created_at: DateTime<Utc>,
    category_id: i64,
    admin_id: AdminId,
}

impl TryFrom<DishRow> for Dish {
    type Error = RepositoryError;

    fn try_from(row: DishRow) -> Result<Self, Self::Error> {
        let price = row
            .price
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid price for dish {}: {e}", row.id))
            })?
            .map(Dish::normalize_price);

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            photo_url: row.photo_url,
            price,
            prep_minutes: row.prep_minutes,
            servings: row.servings,
            nutrition_info: row.nutrition_info,
            created_at: row.created_at,
            category_id: row.category_id,
            admin_id: row.admin_id,
        })
    }
}

pub(crate) fn price_to_text(price: Option<&Decimal>) -> Option<String> {
    price.map(|p| Dish::normalize_price(*p).to_string())
}

pub struct DishRepository {
    connection_pool: PoolType,
}

impl DishRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    /// Dishes of `owner`, optionally restricted to one of its categories.
    ///
    /// A category filter naming a foreign or missing category fails with
    /// `NotFound` instead of returning an empty list.
    #[instrument(skip(self), fields(admin_id = %owner))]
    pub async fn list(
        &self,
        owner: AdminId,
        category_id: Option<i64>,
    ) -> Result<Vec<Dish>, RepositoryError> {
        debug!("Listing dishes");
        let mut conn = self.connection_pool.acquire().await?;

        let rows = match category_id {
            Some(category_id) => {
                if find_owned_category(&mut conn, owner, category_id).await?.is_none() {
                    warn!("Category filter {} not owned by administrator", category_id);
                    return Err(RepositoryError::NotFound(CATEGORY_NOT_FOUND));
                }
                let sql = format!(
                    "SELECT {DISH_COLUMNS} FROM dishes WHERE admin_id = ? AND category_id = ? ORDER BY id"
                );
                sqlx::query_as::<_, DishRow>(&sql)
                    .bind(owner)
                    .bind(category_id)
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => {
                let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE admin_id = ? ORDER BY id");
                sqlx::query_as::<_, DishRow>(&sql)
                    .bind(owner)
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        info!("Found {} dishes", rows.len());
        rows.into_iter().map(Dish::try_from).collect()
    }
}

async fn find_owned_dish(
    conn: &mut SqliteConnection,
    owner: AdminId,
    dish_id: i64,
) -> Result<Option<Dish>, RepositoryError> {
    let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = ? AND admin_id = ?");
    sqlx::query_as::<_, DishRow>(&sql)
        .bind(dish_id)
        .bind(owner)
        .fetch_optional(&mut *conn)
        .await?
        .map(Dish::try_from)
        .transpose()
}

impl OwnedRead<Dish, i64> for DishRepository {
    #[instrument(skip(self), fields(admin_id = %owner, dish_id = %id))]
    async fn read(&self, owner: AdminId, id: &i64) -> Result<Dish, RepositoryError> {
        debug!("Reading dish");
        let mut conn = self.connection_pool.acquire().await?;
        find_owned_dish(&mut conn, owner, *id).await?.ok_or_else(|| {
            warn!("Dish not found or owned by another administrator");
            RepositoryError::NotFound(DISH_NOT_FOUND)
        })
    }
}

impl OwnedCreate<Dish, NewDish> for DishRepository {
    #[instrument(skip(self, data), fields(admin_id = %owner, category_id = %data.category_id))]
    async fn create(&self, owner: AdminId, data: &NewDish) -> Result<Dish, RepositoryError> {
        debug!("Creating new dish");
        let mut tx = begin_write(&self.connection_pool).await?;

        if find_owned_category(&mut tx, owner, data.category_id).await?.is_none() {
            warn!("Target category not owned by administrator");
            return Err(RepositoryError::NotFound(CATEGORY_NOT_FOUND));
        }

        let created_at = Utc::now();
        let price = data.price.map(Dish::normalize_price);

        // the composite foreign key rejects a category of another administrator
        let result = sqlx::query(
            r#"
            INSERT INTO dishes (name, description, photo_url, price, prep_minutes, servings,
                                nutrition_info, created_at, category_id, admin_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.photo_url)
        .bind(price_to_text(price.as_ref()))
        .bind(data.prep_minutes)
        .bind(data.servings)
        .bind(&data.nutrition_info)
        .bind(created_at)
        .bind(data.category_id)
        .bind(owner)
        .execute(&mut *tx)
        .await
        .map_err(|e| foreign_key_violation_as(e, RepositoryError::NotFound(CATEGORY_NOT_FOUND)))?;

        tx.commit().await?;

        let new_id = result.last_insert_rowid();
        info!("Dish created with id {}", new_id);

        Ok(Dish {
            id: new_id,
            name: data.name.clone(),
            description: data.description.clone(),
            photo_url: data.photo_url.clone(),
            price,
            prep_minutes: data.prep_minutes,
            servings: data.servings,
            nutrition_info: data.nutrition_info.clone(),
            created_at,
            category_id: data.category_id,
            admin_id: owner,
        })
    }
}

impl OwnedUpdate<Dish, UpdateDishDTO, i64> for DishRepository {
    #[instrument(skip(self, data), fields(admin_id = %owner, dish_id = %id))]
    async fn update(
        &self,
        owner: AdminId,
        id: &i64,
        data: &UpdateDishDTO,
    ) -> Result<Dish, RepositoryError> {
        debug!("Updating dish");
        let mut tx = begin_write(&self.connection_pool).await?;

        let current = find_owned_dish(&mut tx, owner, *id)
            .await?
            .ok_or(RepositoryError::NotFound(DISH_NOT_FOUND))?;

        if data.is_empty() {
            debug!("No fields to update, returning current dish");
            return Ok(current);
        }

        // validated before any write so a rejected move leaves the dish untouched
        if let Some(category_id) = data.id_categoria {
            if find_owned_category(&mut tx, owner, category_id).await?.is_none() {
                warn!("New category {} not owned by administrator", category_id);
                return Err(RepositoryError::NotFound(NEW_CATEGORY_NOT_FOUND));
            }
        }

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE dishes SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.nombre {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(ref description) = data.descripcion {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }
        if let Some(ref photo_url) = data.foto_url {
            separated.push("photo_url = ");
            separated.push_bind_unseparated(photo_url);
        }
        if let Some(ref price) = data.precio {
            separated.push("price = ");
            separated.push_bind_unseparated(price_to_text(price.as_ref()));
        }
        if let Some(prep_minutes) = data.tiempo_preparacion_min {
            separated.push("prep_minutes = ");
            separated.push_bind_unseparated(prep_minutes);
        }
        if let Some(servings) = data.porciones {
            separated.push("servings = ");
            separated.push_bind_unseparated(servings);
        }
        if let Some(ref nutrition_info) = data.info_nutricional {
            separated.push("nutrition_info = ");
            separated.push_bind_unseparated(nutrition_info);
        }
        if let Some(category_id) = data.id_categoria {
            separated.push("category_id = ");
            separated.push_bind_unseparated(category_id);
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(*id);
        query_builder.push(" AND admin_id = ");
        query_builder.push_bind(owner);

        query_builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                foreign_key_violation_as(e, RepositoryError::NotFound(NEW_CATEGORY_NOT_FOUND))
            })?;

        let updated = find_owned_dish(&mut tx, owner, *id)
            .await?
            .ok_or(RepositoryError::NotFound(DISH_NOT_FOUND))?;

        tx.commit().await?;
        info!("Dish updated successfully");
        Ok(updated)
    }
}

impl OwnedDelete<i64> for DishRepository {
    #[instrument(skip(self), fields(admin_id = %owner, dish_id = %id))]
    async fn delete(&self, owner: AdminId, id: &i64) -> Result<(), RepositoryError> {
        debug!("Deleting dish");
        let result = sqlx::query("DELETE FROM dishes WHERE id = ? AND admin_id = ?")
            .bind(*id)
            .bind(owner)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!("Dish not found or owned by another administrator");
            return Err(RepositoryError::NotFound(DISH_NOT_FOUND));
        }

        info!("Dish deleted successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    const ALICE: AdminId = AdminId(1);
    const BOB: AdminId = AdminId(2);

    fn new_dish(category_id: i64) -> NewDish {
        NewDish {
            name: "Arroz con leche".to_string(),
            description: None,
            photo_url: "https://cdn.example.com/arroz.jpg".to_string(),
            price: Some(Decimal::from_str("12.5").unwrap()),
            prep_minutes: None,
            servings: None,
            nutrition_info: None,
            category_id,
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_list_scoped_and_filtered(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let all: Vec<i64> = repo.list(ALICE, None).await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(all, vec![1, 2, 3]);

        let ceviches: Vec<i64> =
            repo.list(ALICE, Some(2)).await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ceviches, vec![2, 3]);

        assert!(repo.list(ALICE, Some(3)).await.unwrap().is_empty());

        let foreign_filter = repo.list(ALICE, Some(4)).await;
        assert!(matches!(foreign_filter, Err(RepositoryError::NotFound(CATEGORY_NOT_FOUND))));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_read_prices(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let dish = repo.read(ALICE, &1).await.unwrap();
        assert_eq!(dish.price.map(|p| p.to_string()), Some("12.50".to_string()));

        let no_price = repo.read(ALICE, &3).await.unwrap();
        assert_eq!(no_price.price, None);

        assert!(matches!(repo.read(BOB, &1).await, Err(RepositoryError::NotFound(DISH_NOT_FOUND))));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_create_round_trips_price(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let created = repo.create(ALICE, &new_dish(3)).await.unwrap();
        assert_eq!(created.admin_id, ALICE);

        let stored = repo.read(ALICE, &created.id).await.unwrap();
        assert_eq!(stored.price.map(|p| p.to_string()), Some("12.50".to_string()));
        assert_eq!(stored.category_id, 3);
        assert_eq!(stored.prep_minutes, None);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_create_in_foreign_category(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let result = repo.create(BOB, &new_dish(1)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(CATEGORY_NOT_FOUND))));

        let missing = repo.create(BOB, &new_dish(999)).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(CATEGORY_NOT_FOUND))));
        Ok(())
    }

    /// The schema refuses a cross-tenant dish even without the application check
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_composite_key_backs_ownership(pool: SqlitePool) -> sqlx::Result<()> {
        let err = sqlx::query(
            "INSERT INTO dishes (name, photo_url, created_at, category_id, admin_id) VALUES ('x', 'u', '2025-01-01T00:00:00+00:00', 1, 2)",
        )
        .execute(&pool)
        .await
        .unwrap_err();

        let mapped = foreign_key_violation_as(err, RepositoryError::NotFound(CATEGORY_NOT_FOUND));
        assert!(matches!(mapped, RepositoryError::NotFound(_)));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_update_only_price(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);
        let before = repo.read(ALICE, &2).await.unwrap();

        let data = UpdateDishDTO {
            precio: Some(Some(Decimal::from_str("40").unwrap())),
            ..Default::default()
        };
        let after = repo.update(ALICE, &2, &data).await.unwrap();

        assert_eq!(after.price.map(|p| p.to_string()), Some("40.00".to_string()));
        assert_eq!(after.name, before.name);
        assert_eq!(after.photo_url, before.photo_url);
        assert_eq!(after.description, before.description);
        assert_eq!(after.prep_minutes, before.prep_minutes);
        assert_eq!(after.servings, before.servings);
        assert_eq!(after.nutrition_info, before.nutrition_info);
        assert_eq!(after.category_id, before.category_id);
        assert_eq!(after.created_at, before.created_at);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_update_clears_nullable_fields(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let data = UpdateDishDTO {
            precio: Some(None),
            info_nutricional: Some(None),
            ..Default::default()
        };
        let after = repo.update(ALICE, &2, &data).await.unwrap();
        assert_eq!(after.price, None);
        assert_eq!(after.nutrition_info, None);
        assert_eq!(after.prep_minutes, Some(20));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_update_rejected_move_is_atomic(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let data = UpdateDishDTO {
            nombre: Some("Renombrado".to_string()),
            id_categoria: Some(4),
            ..Default::default()
        };
        let result = repo.update(ALICE, &1, &data).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(NEW_CATEGORY_NOT_FOUND))));

        let unchanged = repo.read(ALICE, &1).await.unwrap();
        assert_eq!(unchanged.name, "Tequenos");
        assert_eq!(unchanged.category_id, 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_update_moves_between_own_categories(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        let data = UpdateDishDTO {
            id_categoria: Some(3),
            ..Default::default()
        };
        let moved = repo.update(ALICE, &1, &data).await.unwrap();
        assert_eq!(moved.category_id, 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins", "menu")))]
    async fn test_delete_scoped(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = DishRepository::new(pool);

        assert!(matches!(repo.delete(BOB, &1).await, Err(RepositoryError::NotFound(_))));
        repo.delete(ALICE, &1).await.unwrap();
        assert!(matches!(repo.read(ALICE, &1).await, Err(RepositoryError::NotFound(_))));
        Ok(())
    }
}
