mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_banner_reports_service_metadata() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(
        body["message"].as_str().unwrap_or_default().contains("Tareas"),
        "unexpected banner: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn health_degrades_when_the_store_is_down() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["service"], "sgt-api");
    assert_eq!(body["database"], "disconnected");
    Ok(())
}

#[tokio::test]
async fn ready_stays_200_and_reports_flags() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/ready", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["database"], "disconnected");
    Ok(())
}
