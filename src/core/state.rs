//! Application state shared by every route and middleware

use crate::core::Config;
use crate::repositories::{
    AdministratorRepository, CategoryRepository, DishRepository, GalleryRepository, PoolType,
};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

pub struct AppState {
    pub administrators: AdministratorRepository,

    pub categories: CategoryRepository,

    pub dishes: DishRepository,

    /// Public read model, not scoped to an administrator
    pub gallery: GalleryRepository,

    /// Secret key used to sign and verify tokens
    pub jwt_secret: String,

    /// Lifetime of issued tokens
    pub jwt_expires_minutes: i64,

    pool: PoolType,
}

impl AppState {
    /// Wires every repository on the given pool.
    ///
    /// # Arguments
    /// * `pool` - Shared connection pool, migrations already applied
    /// * `jwt_secret` - Key for signing tokens
    /// * `jwt_expires_minutes` - Lifetime of issued tokens
    pub fn new(pool: PoolType, jwt_secret: String, jwt_expires_minutes: i64) -> Self {
        Self {
            administrators: AdministratorRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            dishes: DishRepository::new(pool.clone()),
            gallery: GalleryRepository::new(pool.clone()),
            jwt_secret,
            jwt_expires_minutes,
            pool,
        }
    }

    /// Opens the pool described by `config`, applies pending migrations and
    /// builds the state on top of it
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        info!("Database connection established");

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");

        Ok(Self::new(
            pool,
            config.jwt_secret.clone(),
            config.jwt_expires_minutes,
        ))
    }

    /// Waits for checked out connections and closes the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
