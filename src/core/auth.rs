use crate::core::{AppError, AppState};
use crate::entities::AdminId;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub const INVALID_TOKEN: &str = "Token inválido o ausente";

/// Content of the signed token. `sub` carries the administrator id as text.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[instrument(skip(secret), fields(admin_id = %admin_id))]
pub fn encode_jwt(admin_id: AdminId, secret: &str, expires_minutes: i64) -> Result<String, JwtError> {
    debug!("Encoding JWT token for administrator");
    let now = Utc::now();
    let exp = (now + Duration::minutes(expires_minutes)).timestamp() as usize;
    let iat = now.timestamp() as usize;
    let claims = Claims {
        sub: admin_id.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .inspect(|_| info!("JWT token encoded successfully"))
    .inspect_err(|e| error!("Failed to encode JWT token: {:?}", e))
}

/// Verifies signature and expiry
#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .inspect_err(|e| warn!("Failed to decode JWT token: {}", e))
}

/// Resolves the `Authorization: Bearer <token>` header to the administrator
/// it was issued for.
///
/// Missing header, wrong scheme, bad signature, expired token and a subject
/// that is not an id all end in the same `401`. The database is not touched:
/// the token alone is the identity.
pub fn resolve(header: Option<&http::HeaderValue>, secret: &str) -> Result<AdminId, AppError> {
    let header = header
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::unauthorized(INVALID_TOKEN)
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized(INVALID_TOKEN)
        })?;

    let mut parts = header.split_whitespace();
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => {
            warn!("Authorization header is not a bearer token");
            return Err(AppError::unauthorized(INVALID_TOKEN));
        }
    };

    let token_data =
        decode_jwt(token, secret).map_err(|_| AppError::unauthorized(INVALID_TOKEN))?;

    token_data
        .claims
        .sub
        .parse::<i64>()
        .map(AdminId)
        .map_err(|_| {
            warn!("Token subject is not an administrator id");
            AppError::unauthorized(INVALID_TOKEN)
        })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let admin_id = resolve(
        req.headers().get(http::header::AUTHORIZATION),
        &state.jwt_secret,
    )?;

    debug!("Request authenticated for administrator {}", admin_id);
    req.extensions_mut().insert(admin_id);
    Ok(next.run(req).await)
}
