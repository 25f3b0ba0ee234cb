//! Gallery DTOs - public paginated listing

use super::DishDTO;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// Query of `GET /api/galeria`.
///
/// Values are kept raw: a non numeric `page` or `per_page` falls back to the
/// default instead of rejecting the request.
#[derive(Deserialize, Debug, Default)]
pub struct GalleryQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
}

impl GalleryQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(DEFAULT_PAGE)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|per_page| *per_page >= 1)
            .map_or(DEFAULT_PER_PAGE, |per_page| per_page.min(MAX_PER_PAGE))
    }

    /// Search term, `None` when absent or blank
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GalleryCategoryDTO {
    pub id_categoria: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub platos: Vec<DishDTO>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GalleryPageDTO {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub categorias: Vec<GalleryCategoryDTO>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, per_page: Option<&str>, search: Option<&str>) -> GalleryQuery {
        GalleryQuery {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        let q = query(None, None, None);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 10);
        assert_eq!(q.search(), None);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let q = query(Some("abc"), Some("-3"), Some(""));
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 10);
        assert_eq!(q.search(), None);

        let q = query(Some("0"), Some("0"), None);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 10);
    }

    #[test]
    fn test_per_page_is_capped() {
        let q = query(Some("3"), Some("1000"), Some("cevich"));
        assert_eq!(q.page(), 3);
        assert_eq!(q.per_page(), MAX_PER_PAGE);
        assert_eq!(q.search(), Some("cevich"));
    }
}
