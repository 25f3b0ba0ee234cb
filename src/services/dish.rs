//! Dish services - CRUD on the authenticated administrator's dishes

use crate::core::{AppError, AppJson, AppPath, AppQuery, AppState};
use crate::dtos::{CreateDishDTO, DishDTO, DishListQuery, MessageDTO, NewDish, UpdateDishDTO};
use crate::entities::AdminId;
use crate::repositories::{OwnedCreate, OwnedDelete, OwnedRead, OwnedUpdate};
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(state, params), fields(admin_id = %admin_id, category_id = ?params.id_categoria))]
pub async fn list_dishes(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppQuery(params): AppQuery<DishListQuery>,
) -> Result<Json<Vec<DishDTO>>, AppError> {
    debug!("Listing dishes");
    let dishes: Vec<DishDTO> = state
        .dishes
        .list(admin_id, params.id_categoria)
        .await?
        .into_iter()
        .map(DishDTO::from)
        .collect();

    info!("Returning {} dishes", dishes.len());
    Ok(Json(dishes))
}

#[instrument(skip(state), fields(admin_id = %admin_id))]
pub async fn get_dish(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppPath(dish_id): AppPath<i64>,
) -> Result<Json<DishDTO>, AppError> {
    let dish = state.dishes.read(admin_id, &dish_id).await?;
    Ok(Json(DishDTO::from(dish)))
}

#[instrument(skip(state, body), fields(admin_id = %admin_id))]
pub async fn create_dish(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppJson(body): AppJson<CreateDishDTO>,
) -> Result<(StatusCode, Json<DishDTO>), AppError> {
    debug!("Creating dish");
    let new_dish = NewDish::try_from(body)?;
    let dish = state.dishes.create(admin_id, &new_dish).await?;

    info!("Dish {} created", dish.id);
    Ok((StatusCode::CREATED, Json(DishDTO::from(dish))))
}

#[instrument(skip(state, body), fields(admin_id = %admin_id))]
pub async fn update_dish(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppPath(dish_id): AppPath<i64>,
    AppJson(body): AppJson<UpdateDishDTO>,
) -> Result<Json<DishDTO>, AppError> {
    debug!("Updating dish");
    body.validate()?;
    let dish = state.dishes.update(admin_id, &dish_id, &body).await?;

    info!("Dish {} updated", dish.id);
    Ok(Json(DishDTO::from(dish)))
}

#[instrument(skip(state), fields(admin_id = %admin_id))]
pub async fn delete_dish(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppPath(dish_id): AppPath<i64>,
) -> Result<Json<MessageDTO>, AppError> {
    state.dishes.delete(admin_id, &dish_id).await?;

    info!("Dish {} deleted", dish_id);
    Ok(Json(MessageDTO::new("Plato eliminado")))
}
