mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn weak_password_is_rejected_before_the_provider() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // The provider URL points at a closed port; getting a validation error
    // instead of a gateway error proves the policy runs first.
    let res = client
        .post(format!("{}/usuarios", server.base_url))
        .bearer_auth(common::token("admin"))
        .json(&json!({
            "email": "ana@example.com",
            "nombre": "Ana",
            "rol": "65a1b2c3d4e5f6a7b8c9d0e1",
            "password": "corta"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(
        body["field_errors"]["password"].is_string(),
        "expected password field error: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn missing_password_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/usuarios", server.base_url))
        .bearer_auth(common::token("admin"))
        .json(&json!({
            "email": "ana@example.com",
            "nombre": "Ana",
            "rol": "65a1b2c3d4e5f6a7b8c9d0e1"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Missing required fields");
    assert_eq!(body["field_errors"]["password"], "This field is required");
    Ok(())
}

#[tokio::test]
async fn out_of_range_progress_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/tareas", server.base_url))
        .bearer_auth(common::token("usuario"))
        .json(&json!({
            "id_proyecto": "65a1b2c3d4e5f6a7b8c9d0e1",
            "actividad": "Revisar PRs",
            "avance": 150.0
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["avance"], "must be between 0 and 100");
    Ok(())
}

#[tokio::test]
async fn malformed_json_body_is_a_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/roles", server.base_url))
        .bearer_auth(common::token("admin"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{")
        .send()
        .await?;
    assert!(
        res.status().is_client_error(),
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}
