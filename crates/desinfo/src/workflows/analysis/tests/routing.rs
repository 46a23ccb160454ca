use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::analysis::router::{analysis_router, report_handler, RenderRequest};
use crate::workflows::analysis::domain::{Category, ClassifiedStatement};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serializable")))
        .expect("request builds")
}

#[tokio::test]
async fn models_route_lists_valid_models() {
    let router = analysis_router(scripted_service(&["WAHR"]));

    let response = router
        .oneshot(
            Request::get("/api/v1/models")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let models = payload["models"].as_array().expect("models array");
    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["id"], "1");
    assert_eq!(models[0]["label"], "alpha (OpenAI)");
}

#[tokio::test]
async fn models_route_reports_unavailable_service() {
    let router = analysis_router(build_service(
        ScriptedClassifier::new(&["WAHR"]),
        StaticCatalog(Vec::new()),
    ));

    let response = router
        .oneshot(
            Request::get("/api/v1/models")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn analysis_route_returns_the_view() {
    let router = analysis_router(scripted_service(&["FRAME"]));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/analyses",
            json!({ "text": "Eine aufgeladene Aussage", "model_id": "2" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["model"]["modelName"], "beta");
    assert_eq!(payload["view"]["score"]["score_display"], "1.0");
    assert_eq!(payload["view"]["score"]["grade"], "B");
    assert_eq!(payload["view"]["metrics"].as_array().map(Vec::len), Some(5));
    assert!(payload["downloads"]["docx"]
        .as_str()
        .is_some_and(|name| name.ends_with(".docx")));
}

#[tokio::test]
async fn analysis_route_rejects_short_input() {
    let router = analysis_router(scripted_service(&["WAHR"]));

    let response = router
        .oneshot(json_request("POST", "/api/v1/analyses", json!({ "text": "kurz" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("at least 10")));
}

#[tokio::test]
async fn report_route_streams_downloads() {
    let router = analysis_router(scripted_service(&["WAHR"]));
    let records = vec![
        ClassifiedStatement::new("Die Erde ist rund.", Category::Wahr, "belegt", 0),
        ClassifiedStatement::new("Der Mond ist aus Käse.", Category::Falsch, "widerlegt", 5),
    ];

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reports/html",
            json!({ "records": records }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"DesInfo_Report_"));
    assert!(disposition.ends_with(".html\""));

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let html = String::from_utf8(body.to_vec()).expect("utf-8");
    let falsch = html.find("FALSCH (1)").expect("FALSCH section");
    let wahr = html.find("WAHR (1)").expect("WAHR section");
    assert!(falsch < wahr);
}

#[tokio::test]
async fn report_handler_rejects_unknown_formats() {
    let response = report_handler(
        State(scripted_service(&["WAHR"])),
        Path("odt".to_string()),
        axum::Json(RenderRequest {
            records: Vec::new(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
