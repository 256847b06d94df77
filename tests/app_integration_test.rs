// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::Server;
use seo_crawler::app::{create_router, AppState, VERSION};
use seo_crawler::models::version::{HealthResponse, VersionResponse};
use seo_crawler::services::classifier::{Classifier, StatisticalClassifier};
use seo_crawler::services::metadata::MetadataFetcher;
use seo_crawler::services::robots::RobotsCache;
use seo_crawler::{CrawlResult, Pipeline};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn create_test_app(config_dir: &TempDir) -> Router {
    std::fs::write(
        config_dir.path().join("dev.ini"),
        "[COMMON]\nuser_agent = SEOPOCCrawlerBot/0.1\ntimeout = 5\n",
    )
    .unwrap();

    let pipeline = Pipeline::new(
        Arc::new(RobotsCache::default()),
        MetadataFetcher::default(),
        Classifier::new(Arc::new(StatisticalClassifier::trained())),
    );

    create_router(AppState {
        pipeline: Arc::new(pipeline),
        config_dir: config_dir.path().to_path_buf(),
    })
}

fn crawl_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/crawl")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_version_endpoint_response() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert_eq!(content_type, "application/json");

    let version: VersionResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(version.agent, "seo-crawler");
    assert_eq!(version.version, VERSION);
    assert_eq!(version.version.split('.').count(), 3);
}

#[tokio::test]
async fn test_invalid_route_returns_404() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/invalid").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_crawl_unknown_env_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let response = app
        .oneshot(crawl_request(serde_json::json!({
            "url": "https://example.com/",
            "env": "staging"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(message.contains("Configuration error"));
}

#[tokio::test]
async fn test_crawl_returns_result_json() {
    let mut server = Server::new_async().await;
    let _robots = server
        .mock("GET", "/robots.txt")
        .with_status(404)
        .create_async()
        .await;
    let _page = server
        .mock("GET", "/article")
        .with_status(200)
        .with_body(
            "<html><head><title>Leak</title></head>\
             <body><h1>Snowden</h1><p>politics politics</p></body></html>",
        )
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);
    let url = format!("{}/article", server.url());

    let response = app
        .oneshot(crawl_request(serde_json::json!({ "url": url, "use_ml": true })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: CrawlResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(result.url, url);
    assert_eq!(result.error, "");
    assert_eq!(result.h1, "Snowden");
    assert_eq!(result.classification.as_deref(), Some("news"));
    assert_eq!(result.topics, vec!["politics", "snowden"]);
}

#[tokio::test]
async fn test_crawl_disallowed_reports_error_in_body() {
    let mut server = Server::new_async().await;
    let _robots = server
        .mock("GET", "/robots.txt")
        .with_status(200)
        .with_body("User-agent: *\nDisallow: /\n")
        .create_async()
        .await;
    let page = server
        .mock("GET", "/")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);
    let url = format!("{}/", server.url());

    let response = app
        .oneshot(crawl_request(serde_json::json!({ "url": url })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: CrawlResult = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(result.error, "Disallowed by robots.txt");
    assert_eq!(result.title, "");
    assert!(result.topics.is_empty());

    page.assert_async().await;
}
