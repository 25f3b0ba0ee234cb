//! Administrator DTOs - registration, login and public profile

use crate::entities::Administrator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/register`
#[derive(Deserialize, Debug, Validate)]
pub struct RegisterDTO {
    #[validate(
        required(message = "El campo 'nombre' es obligatorio"),
        length(min = 1, max = 50, message = "'nombre' debe tener entre 1 y 50 caracteres")
    )]
    pub nombre: Option<String>,

    #[validate(
        required(message = "El campo 'email' es obligatorio"),
        length(min = 1, max = 100, message = "'email' debe tener entre 1 y 100 caracteres")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "El campo 'password' es obligatorio"),
        length(min = 1, message = "'password' no puede estar vacío")
    )]
    pub password: Option<String>,
}

/// Body of `POST /api/login`
#[derive(Deserialize, Debug, Validate)]
pub struct LoginDTO {
    #[validate(
        required(message = "Debes proporcionar 'email'"),
        length(min = 1, message = "Debes proporcionar 'email'")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Debes proporcionar 'password'"),
        length(min = 1, message = "Debes proporcionar 'password'")
    )]
    pub password: Option<String>,
}

/// Insert payload for the administrators table, password already hashed
#[derive(Debug, Clone)]
pub struct CreateAdministratorDTO {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
}

/// Public profile; the password hash is never part of it
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdministratorDTO {
    pub id_administrador: i64,
    pub nombre: String,
    pub email: String,
    pub fecha_registro: DateTime<Utc>,
}

impl From<Administrator> for AdministratorDTO {
    fn from(value: Administrator) -> Self {
        Self {
            id_administrador: value.id.0,
            nombre: value.name,
            email: value.email,
            fecha_registro: value.registered_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct LoginResponseDTO {
    pub access_token: String,
    pub admin: AdministratorDTO,
}
