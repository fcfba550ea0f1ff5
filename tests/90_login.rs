mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn login_surfaces_an_unreachable_provider() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": "ana@example.com", "password": "Secreta1!" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Identity provider unreachable");
    assert_eq!(body["code"], "BAD_GATEWAY");
    Ok(())
}

#[tokio::test]
async fn user_create_consults_the_provider_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // A well-formed create with the provider down must fail at the provider,
    // before any local duplicate checks run.
    let res = client
        .post(format!("{}/usuarios", server.base_url))
        .bearer_auth(common::token("admin"))
        .json(&json!({
            "email": "ana@example.com",
            "nombre": "Ana",
            "rol": "65a1b2c3d4e5f6a7b8c9d0e1",
            "password": "Secreta1!"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Identity provider unreachable");
    Ok(())
}

#[tokio::test]
async fn login_requires_a_complete_body() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": "ana@example.com" }))
        .send()
        .await?;
    assert!(
        res.status().is_client_error(),
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn login_is_public() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No Authorization header: the request must reach the handler, not die
    // at the gate. With the provider down that means a gateway error.
    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": "ana@example.com", "password": "Secreta1!" }))
        .send()
        .await?;
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    Ok(())
}
