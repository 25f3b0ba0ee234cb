//! Category entity - menu section owned by one administrator

use super::AdminId;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: AdminId,
}
