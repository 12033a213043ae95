use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::Path;
use tower::ServiceExt;
use zelo::domain::config::ApiConfig;
use zelo_server::Server;

async fn app(factors_path: Option<&Path>) -> Router {
    let mut cfg = ApiConfig::default();
    cfg.factors.path = factors_path.map(Path::to_path_buf);
    Server::builder().config(cfg).build().await.unwrap().into_router()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value =
        if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn health_reports_up() {
    let (status, body) = send(app(None).await, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["features"]["Calculators"], "ready");
}

#[tokio::test]
async fn health_is_degraded_until_factors_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Some(&dir.path().join("absent.json"))).await;

    let (status, body) = send(app.clone(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    let reason = body["features"]["Calculators"].as_str().unwrap();
    assert!(reason.contains("absent.json"), "{reason}");

    let replace = Some(json!({ "cristal_to_liquido": 0.9 }));
    let (status, _) = send(app.clone(), Method::PUT, "/api/conversion-factors", replace).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app, Method::GET, "/health", None).await;
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn calculate_returns_report() {
    let request = json!({
        "kind": "tank_dilution",
        "fields": { "currentBrix": "65", "targetBrix": 11, "currentVolume": 100 }
    });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "tank_dilution");
    assert_eq!(body["outcome"]["possible"], true);
    let water = body["outcome"]["metrics"][0]["value"].as_f64().unwrap();
    assert!((water - 490.909).abs() < 0.01);
}

#[tokio::test]
async fn not_possible_is_still_ok() {
    let request = json!({
        "kind": "tank_dilution",
        "fields": { "currentBrix": 10, "targetBrix": 11, "currentVolume": 100 }
    });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["possible"], false);
    assert!(body["outcome"]["message"].is_string());
}

#[tokio::test]
async fn invalid_field_is_unprocessable() {
    let request = json!({
        "kind": "net_weight",
        "fields": { "grossWeight": "abc", "tare": 10 }
    });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["field"], "grossWeight");
}

#[tokio::test]
async fn null_field_is_reported_as_missing() {
    let request = json!({ "kind": "ratio", "fields": { "brix": 12, "acidity": null } });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["field"], "acidity");
}

#[tokio::test]
async fn list_fields_take_strings_and_numbers() {
    let request = json!({ "kind": "tare_average", "fields": { "weights": ["12.1", 12.3] } });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    let mean = body["outcome"]["metrics"][0]["value"].as_f64().unwrap();
    assert!((mean - 12.2).abs() < 0.01);

    let request = json!({ "kind": "tare_average", "fields": { "weights": ["12.1", "x"] } });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["field"], "weights");
}

#[tokio::test]
async fn malformed_body_gets_a_json_error() {
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(json!({ "kind": 5 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_body");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/calculate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"kind\":"))
        .unwrap();
    let response = app(None).await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "invalid_body");
}

#[tokio::test]
async fn unknown_kind_is_unprocessable() {
    let request = json!({ "kind": "flux_capacitor", "fields": {} });
    let (status, body) =
        send(app(None).await, Method::POST, "/api/calculate", Some(request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "unknown_kind");
    assert_eq!(body["field"], "kind");
}

#[tokio::test]
async fn catalogue_lists_and_searches() {
    let (status, all) = send(app(None).await, Method::GET, "/api/calculators", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 29);

    let (_, tanks) = send(app(None).await, Method::GET, "/api/calculators?q=Tanks", None).await;
    let tanks = tanks.as_array().unwrap();
    assert_eq!(tanks.len(), 7);
    assert!(tanks.iter().all(|d| d["category"] == "tanks"));

    let (_, short) = send(app(None).await, Method::GET, "/api/calculators?q=t", None).await;
    assert!(short.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn factors_can_be_replaced_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("factors.json");
    let app = app(Some(&path)).await;

    let (status, body) = send(app.clone(), Method::GET, "/api/conversion-factors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "defaults");
    assert_eq!(body["factors"]["cristal_to_liquido"], 0.85);

    let (status, body) = send(
        app.clone(),
        Method::PUT,
        "/api/conversion-factors",
        Some(json!({ "cristal_to_liquido": 0.9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "manual");
    assert_eq!(body["factors"]["cristal_to_liquido"], 0.9);
    assert!(path.exists());

    let request = json!({
        "kind": "sugar_conversion",
        "fields": { "direction": "crystalToLiquid", "quantity": 100 }
    });
    let (_, report) = send(app, Method::POST, "/api/calculate", Some(request)).await;
    let liquid = report["outcome"]["metrics"][0]["value"].as_f64().unwrap();
    assert!((liquid - 90.0).abs() < 1e-9);
}

#[tokio::test]
async fn invalid_factor_is_rejected() {
    let app = app(None).await;
    let (status, body) = send(
        app.clone(),
        Method::PUT,
        "/api/conversion-factors",
        Some(json!({ "acido_citrico_fator": -1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_factor");

    let (_, body) = send(app, Method::GET, "/api/conversion-factors", None).await;
    assert_eq!(body["factors"]["acido_citrico_fator"], 1.0);
}

#[tokio::test]
async fn remote_factors_are_not_written_to_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("factors.json");
    let mut cfg = ApiConfig::default();
    cfg.factors.url = Some("http://127.0.0.1:9/factors".to_owned());
    cfg.factors.path = Some(path.clone());
    cfg.factors.timeout_seconds = 1;
    let app = Server::builder().config(cfg).build().await.unwrap().into_router();

    let replace = Some(json!({ "cristal_to_liquido": 0.9 }));
    let (status, body) = send(app, Method::PUT, "/api/conversion-factors", replace).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "manual");
    assert!(!path.exists());
}
