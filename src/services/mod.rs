//! Services module - HTTP handlers grouped by resource

pub mod auth;
pub mod category;
pub mod dish;
pub mod gallery;

pub use auth::{login_user, register_user};
pub use category::{
    create_category, delete_category, get_category, list_categories, update_category,
};
pub use dish::{create_dish, delete_dish, get_dish, list_dishes, update_dish};
pub use gallery::browse_gallery;

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Menu API en ejecución")
}
