//! GalleryRepository - public cross-tenant read model

use super::category::search_key;
use super::dish::{DISH_COLUMNS, DishRow};
use super::{PoolType, RepositoryError};
use crate::entities::{Category, Dish};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// One page of categories with every dish they hold
#[derive(Debug)]
pub struct GalleryPage {
    /// Number of categories matching the search, across all pages
    pub total: i64,
    pub categories: Vec<(Category, Vec<Dish>)>,
}

pub struct GalleryRepository {
    connection_pool: PoolType,
}

/// Turns a search term into a LIKE pattern over the lowercased search
/// columns, where `%` and `_` match literally
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search_key(search).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_search_filter<'a>(query_builder: &mut QueryBuilder<'a, Sqlite>, pattern: &'a Option<String>) {
    if let Some(pattern) = pattern {
        query_builder.push(" WHERE (name_search LIKE ");
        query_builder.push_bind(pattern);
        query_builder.push(" ESCAPE '\\' OR COALESCE(description_search, '') LIKE ");
        query_builder.push_bind(pattern);
        query_builder.push(" ESCAPE '\\')");
    }
}

impl GalleryRepository {
    pub fn new(connection_pool: PoolType) -> Self {
        Self { connection_pool }
    }

    /// Categories of every administrator ordered by id, filtered by a
    /// case-insensitive substring of name or description.
    ///
    /// `page` and `per_page` are expected already clamped to positive values.
    #[instrument(skip(self))]
    pub async fn browse(
        &self,
        page: i64,
        per_page: i64,
        search: Option<&str>,
    ) -> Result<GalleryPage, RepositoryError> {
        debug!("Browsing gallery");
        let pattern = search.map(like_pattern);
        // count and page read the same snapshot
        let mut tx = self.connection_pool.begin().await?;

        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM categories");
        push_search_filter(&mut count_query, &pattern);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await?;

        let offset = (page - 1).saturating_mul(per_page);
        let mut page_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, description, admin_id FROM categories");
        push_search_filter(&mut page_query, &pattern);
        page_query.push(" ORDER BY id LIMIT ");
        page_query.push_bind(per_page);
        page_query.push(" OFFSET ");
        page_query.push_bind(offset);
        let categories: Vec<Category> = page_query
            .build_query_as::<Category>()
            .fetch_all(&mut *tx)
            .await?;

        if categories.is_empty() {
            tx.commit().await?;
            info!("Gallery page {} is empty out of {} categories", page, total);
            return Ok(GalleryPage {
                total,
                categories: Vec::new(),
            });
        }

        let mut dish_query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE category_id IN ("
        ));
        let mut separated = dish_query.separated(", ");
        for category in &categories {
            separated.push_bind(category.id);
        }
        dish_query.push(") ORDER BY id");
        let rows: Vec<DishRow> = dish_query
            .build_query_as::<DishRow>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut dishes_by_category: HashMap<i64, Vec<Dish>> = HashMap::new();
        for row in rows {
            let dish = Dish::try_from(row)?;
            dishes_by_category
                .entry(dish.category_id)
                .or_default()
                .push(dish);
        }

        let categories: Vec<(Category, Vec<Dish>)> = categories
            .into_iter()
            .map(|category| {
                let dishes = dishes_by_category.remove(&category.id).unwrap_or_default();
                (category, dishes)
            })
            .collect();

        info!(
            "Gallery page {} has {} of {} categories",
            page,
            categories.len(),
            total
        );
        Ok(GalleryPage { total, categories })
    }
}
