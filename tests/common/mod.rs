#![allow(dead_code)]

use axum_test::TestServer;
use menu_api::core::AppState;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const JWT_SECRET: &str = "secreto-de-pruebas-que-no-se-usa-en-produccion";

/// Builds an AppState on the test pool with a 15 minute token lifetime
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, JWT_SECRET.to_string(), 15))
}

/// Builds a TestServer around the application router
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = menu_api::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

#[derive(serde::Serialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

/// Signs a token for `admin_id` valid for `minutes` from now (negative means
/// already expired)
pub fn create_test_jwt_with_expiry(admin_id: i64, jwt_secret: &str, minutes: i64) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = Utc::now();
    let claims = Claims {
        sub: admin_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Token for `admin_id` valid for 15 minutes
pub fn create_test_jwt(admin_id: i64) -> String {
    create_test_jwt_with_expiry(admin_id, JWT_SECRET, 15)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Minimal valid body for `POST /api/platos`
pub fn dish_body(category_id: i64) -> Value {
    json!({
        "nombre": "Anticuchos",
        "foto_url": "https://cdn.example.com/anticuchos.jpg",
        "id_categoria": category_id
    })
}
