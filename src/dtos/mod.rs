//! DTOs module - Data Transfer Objects
//!
//! Request and response shapes of the HTTP API. Field names follow the public
//! JSON contract; entities keep the internal names.

pub mod administrator;
pub mod category;
pub mod dish;
pub mod gallery;

pub use administrator::{
    AdministratorDTO, CreateAdministratorDTO, LoginDTO, LoginResponseDTO, RegisterDTO,
};
pub use category::{CategoryDTO, CreateCategoryDTO, NewCategory, UpdateCategoryDTO};
pub use dish::{CreateDishDTO, DishDTO, DishListQuery, NewDish, UpdateDishDTO};
pub use gallery::{GalleryCategoryDTO, GalleryPageDTO, GalleryQuery};

use serde::{Deserialize, Deserializer, Serialize};

/// Plain confirmation body, e.g. `{"mensaje": "Plato eliminado"}`
#[derive(Serialize, Debug)]
pub struct MessageDTO {
    pub mensaje: &'static str,
}

impl MessageDTO {
    pub fn new(mensaje: &'static str) -> Self {
        Self { mensaje }
    }
}

/// Deserializer for nullable fields of partial updates.
///
/// Paired with `#[serde(default)]`: an absent key stays `None`, an explicit
/// `null` becomes `Some(None)` and a value becomes `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
