//! Entities module - domain records persisted in the database
//!
//! Each entity maps one table. Entities never leave the server as-is: the
//! wire representation lives in `dtos`.

pub mod administrator;
pub mod category;
pub mod dish;

pub use administrator::{AdminId, Administrator};
pub use category::Category;
pub use dish::Dish;
