//! Dish DTOs

use super::nullable;
use crate::entities::Dish;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Wire shape of a dish; `precio` serializes as a decimal string ("12.50")
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DishDTO {
    pub id_plato: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub foto_url: String,
    pub precio: Option<Decimal>,
    pub tiempo_preparacion_min: Option<i32>,
    pub porciones: Option<i32>,
    pub info_nutricional: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub id_categoria: i64,
    pub id_administrador: i64,
}

impl From<Dish> for DishDTO {
    fn from(value: Dish) -> Self {
        Self {
            id_plato: value.id,
            nombre: value.name,
            descripcion: value.description,
            foto_url: value.photo_url,
            precio: value.price,
            tiempo_preparacion_min: value.prep_minutes,
            porciones: value.servings,
            info_nutricional: value.nutrition_info,
            fecha_creacion: value.created_at,
            id_categoria: value.category_id,
            id_administrador: value.admin_id.0,
        }
    }
}

/// Body of `POST /api/platos`
#[derive(Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_create_price"))]
pub struct CreateDishDTO {
    #[validate(
        required(message = "Debes enviar 'nombre', 'foto_url' e 'id_categoria'"),
        length(min = 1, max = 50, message = "'nombre' debe tener entre 1 y 50 caracteres")
    )]
    pub nombre: Option<String>,

    pub descripcion: Option<String>,

    #[validate(
        required(message = "Debes enviar 'nombre', 'foto_url' e 'id_categoria'"),
        length(min = 1, max = 255, message = "'foto_url' debe tener entre 1 y 255 caracteres")
    )]
    pub foto_url: Option<String>,

    #[validate(required(message = "Debes enviar 'nombre', 'foto_url' e 'id_categoria'"))]
    pub id_categoria: Option<i64>,

    pub precio: Option<Decimal>,
    pub tiempo_preparacion_min: Option<i32>,
    pub porciones: Option<i32>,
    pub info_nutricional: Option<String>,
}

/// Validated insert payload handed to the repository, price already normalized
#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub description: Option<String>,
    pub photo_url: String,
    pub price: Option<Decimal>,
    pub prep_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub nutrition_info: Option<String>,
    pub category_id: i64,
}

impl TryFrom<CreateDishDTO> for NewDish {
    type Error = ValidationErrors;

    fn try_from(value: CreateDishDTO) -> Result<Self, Self::Error> {
        value.validate()?;
        // presence of nombre, foto_url and id_categoria checked by validate()
        Ok(Self {
            name: value.nombre.unwrap_or_default(),
            description: value.descripcion,
            photo_url: value.foto_url.unwrap_or_default(),
            price: value.precio.map(Dish::normalize_price),
            prep_minutes: value.tiempo_preparacion_min,
            servings: value.porciones,
            nutrition_info: value.info_nutricional,
            category_id: value.id_categoria.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /api/platos/{id}`; absent keys are left untouched
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_update_price"))]
pub struct UpdateDishDTO {
    #[validate(length(min = 1, max = 50, message = "'nombre' debe tener entre 1 y 50 caracteres"))]
    pub nombre: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub descripcion: Option<Option<String>>,

    #[validate(length(min = 1, max = 255, message = "'foto_url' debe tener entre 1 y 255 caracteres"))]
    pub foto_url: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub precio: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "nullable")]
    pub tiempo_preparacion_min: Option<Option<i32>>,

    #[serde(default, deserialize_with = "nullable")]
    pub porciones: Option<Option<i32>>,

    #[serde(default, deserialize_with = "nullable")]
    pub info_nutricional: Option<Option<String>>,

    pub id_categoria: Option<i64>,
}

impl UpdateDishDTO {
    /// True when the body lists no column to change
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.descripcion.is_none()
            && self.foto_url.is_none()
            && self.precio.is_none()
            && self.tiempo_preparacion_min.is_none()
            && self.porciones.is_none()
            && self.info_nutricional.is_none()
            && self.id_categoria.is_none()
    }
}

/// Query of `GET /api/platos`
#[derive(Deserialize, Debug, Default)]
pub struct DishListQuery {
    #[serde(default)]
    pub id_categoria: Option<i64>,
}

fn check_price(price: Option<&Decimal>) -> Result<(), ValidationError> {
    match price {
        Some(price) if !Dish::price_fits(price) => {
            let mut err = ValidationError::new("range");
            err.message = Some("'precio' debe ser menor que 1000000.00".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn validate_create_price(dto: &CreateDishDTO) -> Result<(), ValidationError> {
    check_price(dto.precio.as_ref())
}

fn validate_update_price(dto: &UpdateDishDTO) -> Result<(), ValidationError> {
    check_price(dto.precio.as_ref().and_then(Option::as_ref))
}
