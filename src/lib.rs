//! Menu API library - exposes the application modules for the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", configure_api_routes(state.clone()))
        .with_state(state)
}

/// Public routes are mounted beside the protected ones, outside the auth layer
fn configure_api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use services::*;

    let public_routes = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/galeria", get(browse_gallery));

    public_routes
        .merge(configure_category_routes(state.clone()))
        .merge(configure_dish_routes(state))
}

/// Configures the category CRUD routes
fn configure_category_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/categorias", get(list_categories).post(create_category))
        .route(
            "/categorias/{category_id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configures the dish CRUD routes
fn configure_dish_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/platos", get(list_dishes).post(create_dish))
        .route(
            "/platos/{dish_id}",
            get(get_dish).put(update_dish).delete(delete_dish),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
