use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use zelo_domain::factors::{ConversionFactors, FactorMap};
use zelo_factors::{FactorLoader, FactorOrigin, FactorSource, FactorStore, LoadedFactors};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/factors")
}

fn remote(url: String) -> FactorLoader {
    FactorLoader::new(FactorSource::Remote { url, timeout: Duration::from_secs(5) })
}

#[tokio::test]
async fn defaults_source_yields_defaults() {
    let loaded = FactorLoader::new(FactorSource::Defaults).load().await;
    assert_eq!(loaded, LoadedFactors::defaults());
}

#[tokio::test]
async fn file_overrides_named_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("factors.json");
    let body = r#"{"acido_citrico_fator": 1.05, "brix_correcao_temp.25": 0.985}"#;
    std::fs::write(&path, body).unwrap();

    let loaded = FactorLoader::new(FactorSource::File(path)).load().await;
    assert_eq!(loaded.origin, FactorOrigin::File);
    assert!(loaded.warning.is_none());
    assert_eq!(loaded.factors.citric_acid, 1.05);
    assert_eq!(loaded.factors.brix_correction(25.0), 0.985);
    assert_eq!(loaded.factors.crystal_to_liquid, 0.85);
}

#[tokio::test]
async fn missing_file_falls_back_with_warning() {
    let source = FactorSource::File(PathBuf::from("/nonexistent/factors.json"));
    let loaded = FactorLoader::new(source).load().await;
    assert_eq!(loaded.origin, FactorOrigin::Defaults);
    assert_eq!(loaded.factors, ConversionFactors::default());
    assert!(loaded.warning.is_some());
}

#[tokio::test]
async fn remote_factors_are_applied() {
    let body = serde_json::json!({ "cristal_to_liquido": 0.9, "other": 2.0 });
    let app = Router::new().route("/factors", get(move || async move { axum::Json(body) }));
    let url = serve(app).await;

    let loaded = remote(url).try_load().await.unwrap();
    assert_eq!(loaded.origin, FactorOrigin::Remote);
    assert_eq!(loaded.factors.crystal_to_liquid, 0.9);
    assert_eq!(loaded.factors.liquid_to_crystal, 1.18);
}

#[tokio::test]
async fn remote_server_error_falls_back() {
    let app = Router::new().route("/factors", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let url = serve(app).await;

    let loader = remote(url);
    assert!(loader.try_load().await.is_err());

    let loaded = loader.load().await;
    assert_eq!(loaded.origin, FactorOrigin::Defaults);
    assert_eq!(loaded.factors, ConversionFactors::default());
    assert!(loaded.warning.is_some_and(|w| w.contains("500")));
}

#[tokio::test]
async fn remote_malformed_body_falls_back() {
    let app = Router::new().route("/factors", get(|| async { "[1, 2, 3]" }));
    let url = serve(app).await;

    let loaded = remote(url).load().await;
    assert_eq!(loaded.origin, FactorOrigin::Defaults);
    assert!(loaded.warning.is_some_and(|w| w.contains("Malformed")));
}

#[tokio::test]
async fn remote_out_of_range_value_falls_back() {
    let body = serde_json::json!({ "liquido_to_cristal": -1.0 });
    let app = Router::new().route("/factors", get(move || async move { axum::Json(body) }));
    let url = serve(app).await;

    let loaded = remote(url).load().await;
    assert_eq!(loaded.factors, ConversionFactors::default());
    assert!(loaded.warning.is_some());
}

#[tokio::test]
async fn store_replace_persists_and_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("factors.json");
    let store = FactorStore::new(LoadedFactors::defaults(), Some(path.clone()));

    let overrides = FactorMap::from([("acido_citrico_fator".to_owned(), 1.2)]);
    let active = store.replace(&overrides).await.unwrap();
    assert_eq!(active.citric_acid, 1.2);
    assert_eq!(store.snapshot().origin, FactorOrigin::Manual);

    let reloaded = FactorLoader::new(FactorSource::File(path)).try_load().await.unwrap();
    assert_eq!(reloaded.factors, store.factors());
}

#[tokio::test]
async fn store_replace_rejects_invalid_and_keeps_current() {
    let store = FactorStore::new(LoadedFactors::defaults(), None);
    let overrides = FactorMap::from([("cristal_to_liquido".to_owned(), f64::NAN)]);

    assert!(store.replace(&overrides).await.is_err());
    assert_eq!(store.snapshot(), LoadedFactors::defaults());
}

#[tokio::test]
async fn last_replace_wins() {
    let store = FactorStore::new(LoadedFactors::defaults(), None);
    store.replace(&FactorMap::from([("acido_citrico_fator".to_owned(), 1.1)])).await.unwrap();
    store.replace(&FactorMap::from([("cristal_to_liquido".to_owned(), 0.8)])).await.unwrap();

    let factors = store.factors();
    assert_eq!(factors.crystal_to_liquid, 0.8);
    assert_eq!(factors.citric_acid, 1.0);
}
