//! Gallery service - public listing of every administrator's menu

use crate::core::{AppError, AppQuery, AppState};
use crate::dtos::{DishDTO, GalleryCategoryDTO, GalleryPageDTO, GalleryQuery};
use axum::extract::{Json, State};
use std::sync::Arc;
use tracing::{info, instrument};

#[instrument(skip(state, params))]
pub async fn browse_gallery(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<GalleryQuery>,
) -> Result<Json<GalleryPageDTO>, AppError> {
    let page = params.page();
    let per_page = params.per_page();

    let result = state.gallery.browse(page, per_page, params.search()).await?;

    let categorias = result
        .categories
        .into_iter()
        .map(|(category, dishes)| GalleryCategoryDTO {
            id_categoria: category.id,
            nombre: category.name,
            descripcion: category.description,
            platos: dishes.into_iter().map(DishDTO::from).collect(),
        })
        .collect::<Vec<_>>();

    info!(page, per_page, total = result.total, "Gallery page served");
    Ok(Json(GalleryPageDTO {
        page,
        per_page,
        total: result.total,
        categorias,
    }))
}
