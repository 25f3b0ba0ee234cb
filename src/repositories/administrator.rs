//! AdministratorRepository - identity records and credential lookup

use super::{Create, PoolType, RepositoryError, begin_write, unique_violation_as};
use crate::dtos::CreateAdministratorDTO;
use crate::entities::{AdminId, Administrator};
use tracing::{debug, info, instrument};

pub const DUPLICATE_EMAIL: &str = "Ya existe un administrador con ese email";

pub struct AdministratorRepository {
    connection_pool: PoolType,
}

impl AdministratorRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    /// Exact, case-sensitive email lookup
    #[instrument(skip(self, email))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Administrator>, RepositoryError> {
        debug!("Finding administrator by email");
        let admin = sqlx::query_as::<_, Administrator>(
            "SELECT id, name, email, password_hash, registered_at FROM administrators WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(admin)
    }
}

impl Create<Administrator, CreateAdministratorDTO> for AdministratorRepository {
    #[instrument(skip(self, data))]
    async fn create(&self, data: &CreateAdministratorDTO) -> Result<Administrator, RepositoryError> {
        debug!("Creating new administrator");
        let mut tx = begin_write(&self.connection_pool).await?;

        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM administrators WHERE email = ?")
            .bind(&data.email)
            .fetch_one(&mut *tx)
            .await?;
        if taken > 0 {
            debug!("Email already registered");
            return Err(RepositoryError::Conflict(DUPLICATE_EMAIL));
        }

        // the UNIQUE constraint on email settles concurrent registrations
        let result = sqlx::query(
            "INSERT INTO administrators (name, email, password_hash, registered_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.registered_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_violation_as(e, RepositoryError::Conflict(DUPLICATE_EMAIL)))?;

        tx.commit().await?;

        let new_id = AdminId(result.last_insert_rowid());
        info!("Administrator created with id {}", new_id);

        Ok(Administrator {
            id: new_id,
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            registered_at: data.registered_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::SqlitePool;

    fn new_admin(email: &str) -> CreateAdministratorDTO {
        CreateAdministratorDTO {
            name: "Dora".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            registered_at: Utc::now(),
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins")))]
    async fn test_find_by_email(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AdministratorRepository::new(pool);

        let admin = repo.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(admin.map(|a| a.id), Some(AdminId(1)));

        let missing = repo.find_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins")))]
    async fn test_create_and_read_back(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AdministratorRepository::new(pool);

        let created = repo.create(&new_admin("dora@example.com")).await.unwrap();
        let stored = repo.find_by_email("dora@example.com").await.unwrap().unwrap();

        assert_eq!(stored.id, created.id);
        assert_eq!(stored.password_hash, "$2b$04$hash");
        assert_eq!(stored.registered_at.timestamp(), created.registered_at.timestamp());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins")))]
    async fn test_create_duplicate_email(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = AdministratorRepository::new(pool);

        let result = repo.create(&new_admin("alice@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(DUPLICATE_EMAIL))));

        Ok(())
    }

    /// Bypassing the fast-path check still ends in a conflict
    #[sqlx::test(fixtures(path = "../../fixtures", scripts("admins")))]
    async fn test_unique_constraint_backs_the_check(pool: SqlitePool) -> sqlx::Result<()> {
        let err = sqlx::query(
            "INSERT INTO administrators (name, email, password_hash, registered_at) VALUES ('x', 'alice@example.com', 'h', '2025-01-01T00:00:00+00:00')",
        )
        .execute(&pool)
        .await
        .unwrap_err();

        let mapped = unique_violation_as(err, RepositoryError::Conflict(DUPLICATE_EMAIL));
        assert!(matches!(mapped, RepositoryError::Conflict(_)));

        Ok(())
    }
}
