mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::Value;

#[tokio::test]
async fn missing_header_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/roles", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Authorization header missing.");
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/roles", server.base_url))
        .header(header::AUTHORIZATION, "Token abc123")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(
        body["message"],
        "Invalid Authorization header. Expected 'Bearer <token>'."
    );
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/roles", server.base_url))
        .bearer_auth("no-es-un-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(
        message.starts_with("Invalid token or expired token"),
        "unexpected message: {}",
        message
    );
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/roles", server.base_url))
        .bearer_auth(common::token_expirado())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("expired"), "unexpected message: {}", message);
    Ok(())
}

#[tokio::test]
async fn empty_role_is_an_inactive_user() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/tareas", server.base_url))
        .bearer_auth(common::token(""))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Inactive user.");
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_reach_catalogs() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/roles", server.base_url))
        .bearer_auth(common::token("usuario"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "User is not an administrator.");
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_delete_users() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Shares the user-gated path with GET/PUT; the admin check is enforced
    // inside the handler and must still hold.
    let res = client
        .delete(format!("{}/usuarios/{}", server.base_url, common::USUARIO_ID))
        .bearer_auth(common::token("usuario"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "User is not an administrator.");
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_read_a_foreign_profile() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/usuarios/65a1b2c3d4e5f6a7b8c9d0e2",
            server.base_url
        ))
        .bearer_auth(common::token("usuario"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "No tienes permiso para ver este usuario.");
    Ok(())
}

#[tokio::test]
async fn invalid_path_id_is_a_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/roles/no-es-un-id", server.base_url))
        .bearer_auth(common::token("admin"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid id: no-es-un-id");
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn authenticated_request_reaches_the_store() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // The suite runs without a database, so passing the gate surfaces the
    // store outage rather than an auth failure.
    let res = client
        .get(format!("{}/tareas", server.base_url))
        .bearer_auth(common::token("usuario"))
        .send()
        .await?;
    assert!(
        res.status() == StatusCode::SERVICE_UNAVAILABLE
            || res.status() == StatusCode::INTERNAL_SERVER_ERROR,
        "unexpected status: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    Ok(())
}
