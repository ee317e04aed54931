use axum::{http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};

use crate::core::middleware;
use crate::core::openapi::{ApiDoc, ApiInfoModifier};
use crate::features::map::{self, MapService};
use crate::features::page;
use crate::features::reports::{self, ReportService};
use crate::features::submissions::{self, SubmissionService};

/// Services shared by every request
#[derive(Clone)]
pub struct AppServices {
    pub report_service: Arc<ReportService>,
    pub map_service: Arc<MapService>,
    pub submission_service: Arc<SubmissionService>,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    let mut openapi = ApiDoc::openapi();
    ApiInfoModifier {
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
    .modify(&mut openapi);
    Json(openapi)
}

/// Build the application router
pub fn build_router(services: AppServices, cors_allowed_origins: Vec<String>) -> Router {
    Router::new()
        .merge(page::routes(
            Arc::clone(&services.report_service),
            Arc::clone(&services.map_service),
        ))
        .merge(reports::routes(Arc::clone(&services.report_service)))
        .merge(map::routes(Arc::clone(&services.map_service)))
        .merge(submissions::routes(
            Arc::clone(&services.submission_service),
            Arc::clone(&services.report_service),
        ))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::cors_layer(cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MapConfig;
    use crate::features::map::LeafletCanvas;
    use crate::shared::constants::{MAX_PHOTO_SIZE, MSG_ATTACH_PHOTO, MSG_PHOTO_TOO_LARGE};
    use crate::shared::test_helpers::FakeFormEndpoint;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    const SCENARIO_SEED: &str = r#"[{"id":1,"lat":10,"lng":20,"severity":"High","description":"flood","city":"X","state":"Y"}]"#;

    struct TestApp {
        server: TestServer,
        endpoint: Arc<FakeFormEndpoint>,
    }

    async fn test_app(endpoint: FakeFormEndpoint, seed: Option<&str>) -> TestApp {
        let endpoint = Arc::new(endpoint);
        let report_service = Arc::new(ReportService::new());
        let map_service = Arc::new(MapService::new(
            MapConfig::default(),
            Box::new(LeafletCanvas::new()),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            endpoint.clone(),
            Arc::clone(&report_service),
            Arc::clone(&map_service),
        ));

        if let Some(seed) = seed {
            let records = crate::features::reports::services::parse_seed(seed).unwrap();
            let loaded = report_service.load_seed(records).await;
            map_service.place_report_markers(&loaded).await;
        }

        let router = build_router(
            AppServices {
                report_service,
                map_service,
                submission_service,
            },
            vec!["*".to_string()],
        );

        TestApp {
            server: TestServer::new(router).unwrap(),
            endpoint,
        }
    }

    fn form_with_photo(photo: Vec<u8>) -> MultipartForm {
        MultipartForm::new()
            .add_text("name", "Asha")
            .add_text("phone", "9800000000")
            .add_text("email", "asha@example.com")
            .add_text("location", "19.07600, 72.87770")
            .add_text("severity", "Medium")
            .add_text("description", "water up to the kerb")
            .add_part(
                "photo",
                Part::bytes(photo)
                    .file_name("kerb.jpg")
                    .mime_type("image/jpeg"),
            )
    }

    #[tokio::test]
    async fn test_seed_scenario_one_red_marker_one_card() {
        let app = test_app(FakeFormEndpoint::replying("Success"), Some(SCENARIO_SEED)).await;

        let map: Value = app.server.get("/api/map").await.json();
        let markers = map["data"]["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0]["icon"]["color"], "red");
        assert!(map["data"]["fitted_bounds"].is_object());

        let html = app.server.get("/fragments/reports").await.text();
        assert_eq!(html.matches("class=\"report-card\"").count(), 1);
        assert!(html.contains(">High</span>"));
    }

    #[tokio::test]
    async fn test_unknown_seed_severity_gets_green_marker() {
        let seed = r#"[
            {"id":1,"lat":10,"lng":20,"severity":"High","description":"flood","city":"X","state":"Y"},
            {"id":2,"lat":11,"lng":21,"severity":"Severe","description":"river","city":"Z","state":"W"}
        ]"#;
        let app = test_app(FakeFormEndpoint::replying("Success"), Some(seed)).await;

        let map: Value = app.server.get("/api/map").await.json();
        let colors: Vec<&str> = map["data"]["markers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["icon"]["color"].as_str().unwrap())
            .collect();
        assert_eq!(colors, vec!["red", "green"]);
    }

    #[tokio::test]
    async fn test_empty_seed_renders_no_reports() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;

        let response = app.server.get("/").await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("No reports submitted yet."));
        assert!(html.contains("leaflet-map"));
    }

    #[tokio::test]
    async fn test_successful_submission_flow() {
        let app = test_app(FakeFormEndpoint::replying("Success"), Some(SCENARIO_SEED)).await;
        app.server
            .put("/api/map/pin")
            .json(&json!({"lat": 19.076, "lng": 72.8777}))
            .await
            .assert_status_ok();

        let response = app
            .server
            .post("/api/submissions")
            .multipart(form_with_photo(b"jpeg".to_vec()))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Report submitted successfully!");
        assert_eq!(body["data"]["form_reset"], true);
        assert_eq!(body["data"]["report"]["status"], "Submitted");
        assert_eq!(body["data"]["marker"]["icon"]["color"], "orange");
        assert!(body["data"]["reports_html"]
            .as_str()
            .unwrap()
            .contains("Submitted Reports (2)"));

        let reports: Value = app.server.get("/api/reports").await.json();
        assert_eq!(reports["meta"]["total"], 2);

        let map: Value = app.server.get("/api/map").await.json();
        assert!(map["data"]["pending_pin"].is_null());
        assert_eq!(map["data"]["markers"].as_array().unwrap().len(), 2);

        let payload = &app.endpoint.calls()[0];
        assert_eq!(payload.name, "Asha");
        assert_eq!(payload.severity, "Medium");
        assert_eq!(payload.image.name, "kerb.jpg");

        let id = body["data"]["report"]["id"].as_i64().unwrap();
        let photo = app.server.get(&format!("/api/reports/{}/photo", id)).await;
        photo.assert_status_ok();
        assert_eq!(&photo.as_bytes()[..], b"jpeg");
    }

    #[tokio::test]
    async fn test_endpoint_error_is_shown_verbatim() {
        let app = test_app(
            FakeFormEndpoint::replying("Duplicate entry"),
            Some(SCENARIO_SEED),
        )
        .await;

        let response = app
            .server
            .post("/api/submissions")
            .multipart(form_with_photo(b"jpeg".to_vec()))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("Duplicate entry"));

        let reports: Value = app.server.get("/api/reports").await.json();
        assert_eq!(reports["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_missing_photo_is_rejected_without_network() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;
        let form = MultipartForm::new()
            .add_text("location", "19.07600, 72.87770")
            .add_text("severity", "High");

        let response = app.server.post("/api/submissions").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], MSG_ATTACH_PHOTO);
        assert_eq!(app.endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_photo_is_rejected_without_network() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;

        let response = app
            .server
            .post("/api/submissions")
            .multipart(form_with_photo(vec![0u8; MAX_PHOTO_SIZE + 1]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], MSG_PHOTO_TOO_LARGE);
        assert_eq!(app.endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn test_photo_over_body_limit_gets_size_message() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;

        let response = app
            .server
            .post("/api/submissions")
            .multipart(form_with_photo(vec![0u8; 30 * 1024 * 1024]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], MSG_PHOTO_TOO_LARGE);
        assert_eq!(app.endpoint.call_count(), 0);

        let reports: Value = app.server.get("/api/reports").await.json();
        assert_eq!(reports["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_status_change_touches_only_status() {
        let seed = r#"[
            {"id":1,"lat":10,"lng":20,"severity":"High","description":"flood","city":"X","state":"Y"},
            {"id":2,"lat":11,"lng":21,"severity":"Low","description":"puddle","city":"Z","state":"W"}
        ]"#;
        let app = test_app(FakeFormEndpoint::replying("Success"), Some(seed)).await;
        let before: Value = app.server.get("/api/reports").await.json();

        let response = app
            .server
            .patch("/api/reports/2/status")
            .json(&json!({"status": "Under Review"}))
            .await;
        response.assert_status_ok();

        let after: Value = app.server.get("/api/reports").await.json();
        assert_eq!(after["data"][0], before["data"][0]);

        let mut expected = before["data"][1].clone();
        expected["status"] = json!("Under Review");
        assert_eq!(after["data"][1], expected);
    }

    #[tokio::test]
    async fn test_status_change_rejects_unknown_status_and_report() {
        let app = test_app(FakeFormEndpoint::replying("Success"), Some(SCENARIO_SEED)).await;

        app.server
            .patch("/api/reports/1/status")
            .json(&json!({"status": "Archived"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .patch("/api/reports/404/status")
            .json(&json!({"status": "Closed"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pin_replaces_previous_and_fills_location() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;

        app.server
            .put("/api/map/pin")
            .json(&json!({"lat": 1.0, "lng": 2.0}))
            .await;
        let body: Value = app
            .server
            .put("/api/map/pin")
            .json(&json!({"lat": 28.6139, "lng": 77.209}))
            .await
            .json();
        assert_eq!(body["data"]["location"], "28.61390, 77.20900");

        let page = app.server.get("/").await.text();
        assert!(page.contains(r#"value="28.61390, 77.20900""#));

        app.server.delete("/api/map/pin").await.assert_status_ok();
        let map: Value = app.server.get("/api/map").await.json();
        assert!(map["data"]["pending_pin"].is_null());
    }

    #[tokio::test]
    async fn test_invalid_pin_latitude() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;
        app.server
            .put("/api/map/pin")
            .json(&json!({"lat": 123.0, "lng": 2.0}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submission_state_starts_idle() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;
        let body: Value = app.server.get("/api/submissions/state").await.json();
        assert_eq!(body["data"]["phase"]["phase"], "idle");
        assert!(body["data"]["last_outcome"].is_null());
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let app = test_app(FakeFormEndpoint::replying("Success"), None).await;
        app.server.get("/health").await.assert_status_ok();

        let doc: Value = app.server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"]["/api/submissions"].is_object());
    }
}
