//! Integration tests for the public gallery
//!
//! GET /api/galeria?page=&per_page=&search=

mod common;

#[cfg(test)]
mod gallery_tests {
    use super::common::*;
    use axum_test::http::{HeaderName, StatusCode};
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    fn category_ids(page: &Value) -> Vec<i64> {
        page["categorias"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id_categoria"].as_i64().unwrap())
            .collect()
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("admins", "menu")))]
    async fn test_default_page(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/api/galeria").await;
        response.assert_status_ok();

        let page: Value = response.json();
        assert_eq!(page["page"], 1);
        assert_eq!(page["per_page"], 10);
        assert_eq!(page["total"], 5);
        assert_eq!(category_ids(&page), vec![1, 2, 3, 4, 5]);

        let ceviches = &page["categorias"][1];
        assert_eq!(ceviches["nombre"], "Ceviches");
        let dish_ids: Vec<i64> = ceviches["platos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id_plato"].as_i64().unwrap())
            .collect();
        assert_eq!(dish_ids, vec![2, 3]);
        assert_eq!(ceviches["platos"][0]["precio"], "35.00");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("admins", "menu")))]
    async fn test_search_is_case_insensitive(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/api/galeria")
            .add_query_param("search", "cevich")
            .await;
        response.assert_status_ok();

        let page: Value = response.json();
        assert_eq!(page["total"], 2);
        // category 5 matches through its description only
        assert_eq!(category_ids(&page), vec![2, 5]);
        assert_eq!(page["categorias"][1]["platos"][0]["nombre"], "Chupe de camarones");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("admins", "menu")))]
    async fn test_page_beyond_data(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/api/galeria")
            .add_query_param("page", 9)
            .add_query_param("per_page", 2)
            .await;
        response.assert_status_ok();

        let page: Value = response.json();
        assert_eq!(page["page"], 9);
        assert_eq!(page["total"], 5);
        assert!(page["categorias"].as_array().unwrap().is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("admins", "menu")))]
    async fn test_parameters_are_clamped(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let page: Value = server
            .get("/api/galeria")
            .add_query_param("page", 0)
            .add_query_param("per_page", 500)
            .await
            .json();
        assert_eq!(page["page"], 1);
        assert_eq!(page["per_page"], 100);

        let page: Value = server
            .get("/api/galeria")
            .add_query_param("page", "abc")
            .add_query_param("per_page", -3)
            .await
            .json();
        assert_eq!(page["page"], 1);
        assert_eq!(page["per_page"], 10);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("admins", "menu")))]
    async fn test_search_accented_uppercase_name(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .post("/api/categorias")
            .add_header(
                HeaderName::from_static("authorization"),
                bearer(&create_test_jwt(3)),
            )
            .json(&json!({ "nombre": "ÑOQUIS" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();

        for search in ["ÑOQUIS", "ñoquis", "Ñoquis"] {
            let page: Value = server
                .get("/api/galeria")
                .add_query_param("search", search)
                .await
                .json();
            assert_eq!(page["total"], 1, "search {:?}", search);
            assert_eq!(page["categorias"][0]["id_categoria"], created["id_categoria"]);
            assert_eq!(page["categorias"][0]["nombre"], "ÑOQUIS");
        }
        Ok(())
    }
}
