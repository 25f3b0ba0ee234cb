//! Auth services - administrator registration and login

use crate::core::{AppError, AppJson, AppState, encode_jwt};
use crate::dtos::{
    AdministratorDTO, CreateAdministratorDTO, LoginDTO, LoginResponseDTO, MessageDTO, RegisterDTO,
};
use crate::entities::Administrator;
use crate::repositories::Create;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

pub const INVALID_CREDENTIALS: &str = "Email o contraseña inválidos";

#[instrument(skip(state, body))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<RegisterDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    debug!("Registering new administrator");
    body.validate()?;
    let (Some(name), Some(email), Some(password)) = (body.nombre, body.email, body.password)
    else {
        return Err(AppError::bad_request("Faltan campos obligatorios o son inválidos"));
    };

    let password_hash = Administrator::hash_password(&password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AppError::internal_server_error("Error interno del servidor")
    })?;

    let new_admin = CreateAdministratorDTO {
        name,
        email,
        password_hash,
        registered_at: Utc::now(),
    };
    let admin = state.administrators.create(&new_admin).await?;

    info!("Administrator {} registered", admin.id);
    Ok((
        StatusCode::CREATED,
        Json(MessageDTO::new("Administrador creado exitosamente")),
    ))
}

/// Unknown email and wrong password answer with the same 401 body.
#[instrument(skip(state, body))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt");
    body.validate()?;
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::bad_request("Debes proporcionar 'email' y 'password'"));
    };

    let admin = match state.administrators.find_by_email(&email).await? {
        Some(admin) if admin.verify_password(&password) => admin,
        Some(_) => {
            warn!("Login rejected");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            // same bcrypt cost as a wrong password
            Administrator::verify_unknown_account(&password);
            warn!("Login rejected");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = encode_jwt(admin.id, &state.jwt_secret, state.jwt_expires_minutes)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Error interno del servidor"))?,
    );

    info!("Administrator {} logged in", admin.id);
    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponseDTO {
            access_token: token,
            admin: AdministratorDTO::from(admin),
        }),
    ))
}
