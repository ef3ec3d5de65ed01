use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use catalog_search::search::DEFAULT_RESULTS;
use catalog_search::web::{routes::create_router, AppState};
use catalog_search::{metrics, Config};

use crate::helpers::test_harness::TestHarness;

fn router(harness: &TestHarness) -> Result<Router> {
    metrics::register_metrics();
    let engine = Arc::new(harness.build()?);
    Ok(create_router(AppState::new(engine, Config::default())))
}

async fn get(app: Router, uri: &str) -> Result<(StatusCode, Vec<u8>)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

async fn get_json(app: Router, uri: &str) -> Result<(StatusCode, serde_json::Value)> {
    let (status, body) = get(app, uri).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_search_endpoint() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, body) = get_json(router(&harness)?, "/search?q=cotton").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "cotton");

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), DEFAULT_RESULTS);
    for product in results {
        for field in ["id", "name", "description", "price"] {
            assert!(product.get(field).is_some(), "missing {}", field);
        }
    }
    assert!(results
        .iter()
        .any(|p| p["name"] == "Organic Cotton T-Shirt"));
    Ok(())
}

#[tokio::test]
async fn test_search_without_query() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, body) = get_json(router(&harness)?, "/search").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "");
    assert_eq!(body["results"].as_array().map(|r| r.len()), Some(DEFAULT_RESULTS));
    Ok(())
}

#[tokio::test]
async fn test_search_with_encoded_query() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, body) = get_json(router(&harness)?, "/search?q=Women%27s%20LINEN%21%21").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "Women's LINEN!!");
    assert_eq!(body["results"][0]["name"], "Women's Linen Shirt");
    Ok(())
}

#[tokio::test]
async fn test_api_search_scored() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, body) = get_json(router(&harness)?, "/api/search?q=desk%20lamp&limit=3").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["took_ms"].is_u64());

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["product"]["name"], "LED Desk Lamp");

    let scores: Vec<f64> = results
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    Ok(())
}

#[tokio::test]
async fn test_api_search_rejects_bad_limit() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, _) = get(router(&harness)?, "/api/search?q=mug&limit=many").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, body) = get_json(router(&harness)?, "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["products"], harness.catalog.len());
    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint() -> Result<()> {
    let harness = TestHarness::new()?;
    let app = router(&harness)?;
    get(app.clone(), "/search?q=mug").await?;

    let (status, body) = get(app, "/metrics").await?;
    let text = String::from_utf8(body)?;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("catalog_search_requests_total"));
    assert!(text.contains("catalog_search_products_total"));
    Ok(())
}

#[tokio::test]
async fn test_index_page() -> Result<()> {
    let harness = TestHarness::new()?;
    let (status, body) = get(router(&harness)?, "/").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body)?.contains("Catalog Search"));
    Ok(())
}
