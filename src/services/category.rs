//! Category services - CRUD on the authenticated administrator's categories

use crate::core::{AppError, AppJson, AppPath, AppState};
use crate::dtos::{CategoryDTO, CreateCategoryDTO, MessageDTO, NewCategory, UpdateCategoryDTO};
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

#[instrument(skip(state), fields(admin_id = %admin_id))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
) -> Result<Json<Vec<CategoryDTO>>, AppError> {
    debug!("Listing categories");
    let categories: Vec<CategoryDTO> = state
        .categories
        .list(admin_id)
        .await?
        .into_iter()
        .map(CategoryDTO::from)
        .collect();

    info!("Returning {} categories", categories.len());
    Ok(Json(categories))
}

#[instrument(skip(state), fields(admin_id = %admin_id))]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppPath(category_id): AppPath<i64>,
) -> Result<Json<CategoryDTO>, AppError> {
    let category = state.categories.read(admin_id, &category_id).await?;
    Ok(Json(CategoryDTO::from(category)))
}

#[instrument(skip(state, body), fields(admin_id = %admin_id))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppJson(body): AppJson<CreateCategoryDTO>,
) -> Result<(StatusCode, Json<CategoryDTO>), AppError> {
    debug!("Creating category");
    let new_category = NewCategory::try_from(body)?;
    let category = state.categories.create(admin_id, &new_category).await?;

    info!("Category {} created", category.id);
    Ok((StatusCode::CREATED, Json(CategoryDTO::from(category))))
}

#[instrument(skip(state, body), fields(admin_id = %admin_id))]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppPath(category_id): AppPath<i64>,
    AppJson(body): AppJson<UpdateCategoryDTO>,
) -> Result<Json<CategoryDTO>, AppError> {
    debug!("Updating category");
    body.validate()?;
    let category = state.categories.update(admin_id, &category_id, &body).await?;

    info!("Category {} updated", category.id);
    Ok(Json(CategoryDTO::from(category)))
}

#[instrument(skip(state), fields(admin_id = %admin_id))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(admin_id): Extension<AdminId>,
    AppPath(category_id): AppPath<i64>,
) -> Result<Json<MessageDTO>, AppError> {
    state.categories.delete(admin_id, &category_id).await?;

    info!("Category {} deleted", category_id);
    Ok(Json(MessageDTO::new("Categoría eliminada")))
}
