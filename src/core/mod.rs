//! Core module - infrastructure shared by every handler
//!
//! - Authentication and JWT
//! - Configuration
//! - Error handling and rejection-mapping extractors
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;

pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use error::AppError;
pub use extract::{AppJson, AppPath, AppQuery};
pub use state::AppState;
