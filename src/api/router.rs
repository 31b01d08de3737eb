//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum
//! server. Routes are nested under `/api/`.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router with all routes under `/api/`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route("/patients/:id", get(endpoints::patients::detail))
        .route(
            "/patients/:id/contact",
            put(endpoints::patients::update_contact),
        )
        .route(
            "/doctors",
            get(endpoints::doctors::list).post(endpoints::doctors::create),
        )
        .route("/doctors/:id", get(endpoints::doctors::detail))
        .route(
            "/doctors/:id/availability",
            put(endpoints::doctors::set_availability),
        )
        .route("/doctors/:id/fee", put(endpoints::doctors::update_fee))
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        // Static before param: /sweep must not be captured by /:id
        .route("/appointments/sweep", post(endpoints::appointments::sweep))
        .route("/appointments/:id", get(endpoints::appointments::detail))
        .route(
            "/appointments/:id/cancel",
            post(endpoints::appointments::cancel),
        )
        .route(
            "/appointments/:id/complete",
            post(endpoints::appointments::complete),
        )
        .route(
            "/lab-tests",
            get(endpoints::lab_tests::list).post(endpoints::lab_tests::create),
        )
        .route("/lab-tests/sweep", post(endpoints::lab_tests::sweep))
        .route("/lab-tests/:id", get(endpoints::lab_tests::detail))
        .route("/lab-tests/:id/taken", post(endpoints::lab_tests::mark_taken))
        .route(
            "/lab-tests/:id/result",
            post(endpoints::lab_tests::record_result),
        )
        .route("/lab-tests/:id/cancel", post(endpoints::lab_tests::cancel))
        .route(
            "/catalog",
            get(endpoints::catalog::list).post(endpoints::catalog::create),
        )
        .route("/catalog/:id", delete(endpoints::catalog::deactivate))
        .route("/notifications", get(endpoints::notifications::list))
        .route(
            "/notifications/:id/read",
            post(endpoints::notifications::mark_read),
        )
        .route(
            "/settings/:key",
            get(endpoints::settings::get).put(endpoints::settings::put),
        )
        .route("/fees/quote", get(endpoints::fees::quote))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::core_state::CoreState;
    use crate::db::sqlite::open_database;

    fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        // Create the schema up front so handlers find it
        open_database(&db_path).unwrap();
        let core = Arc::new(CoreState::new(db_path));
        (api_router(core), dir)
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/wards")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_appointment_is_404_with_body() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/api/appointments/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn fee_quote_matches_formula() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/fees/quote?base=1000&doctor_pct=10&dept_pct=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 1150);
    }

    #[tokio::test]
    async fn nan_fee_quote_is_rejected() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/fees/quote?base=NaN&doctor_pct=10&dept_pct=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn doctor_fee_route_reprices_and_rejects_negative() {
        let (router, _dir) = test_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/doctors")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Dr. Rao","department":"cardiology","fee_percentage":10.0}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let doctor: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let id = doctor["id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/doctors/{id}/fee"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"fee_percentage":12.5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let updated: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(updated["fee_percentage"], 12.5);

        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/doctors/{id}/fee"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"fee_percentage":-5.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sweep_route_is_not_captured_by_id_param() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/appointments/sweep")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["swept"], 0);
    }
}
