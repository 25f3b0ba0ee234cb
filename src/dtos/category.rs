//! Category DTOs

use super::nullable;
use crate::entities::Category;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

const MAX_DESCRIPTION: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategoryDTO {
    pub id_categoria: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub id_administrador: i64,
}

impl From<Category> for CategoryDTO {
    fn from(value: Category) -> Self {
        Self {
            id_categoria: value.id,
            nombre: value.name,
            descripcion: value.description,
            id_administrador: value.admin_id.0,
        }
    }
}

/// Body of `POST /api/categorias`
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateCategoryDTO {
    #[validate(
        required(message = "El campo 'nombre' es obligatorio"),
        length(min = 1, max = 30, message = "'nombre' debe tener entre 1 y 30 caracteres")
    )]
    pub nombre: Option<String>,

    #[validate(length(max = 100, message = "'descripcion' admite hasta 100 caracteres"))]
    pub descripcion: Option<String>,
}

/// Validated insert payload handed to the repository
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl TryFrom<CreateCategoryDTO> for NewCategory {
    type Error = ValidationErrors;

    fn try_from(value: CreateCategoryDTO) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            // presence checked by validate()
            name: value.nombre.unwrap_or_default(),
            description: value.descripcion,
        })
    }
}

/// Body of `PUT /api/categorias/{id}`; absent keys are left untouched
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_update_category"))]
pub struct UpdateCategoryDTO {
    #[validate(length(min = 1, max = 30, message = "'nombre' debe tener entre 1 y 30 caracteres"))]
    pub nombre: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub descripcion: Option<Option<String>>,
}

impl UpdateCategoryDTO {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.descripcion.is_none()
    }
}

fn validate_update_category(dto: &UpdateCategoryDTO) -> Result<(), ValidationError> {
    match &dto.descripcion {
        Some(Some(description)) if description.chars().count() > MAX_DESCRIPTION => {
            let mut err = ValidationError::new("length");
            err.message = Some("'descripcion' admite hasta 100 caracteres".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
