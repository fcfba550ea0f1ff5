//! Client for the external identity provider (Firebase Identity Toolkit).
//!
//! The API key is the only credential: account creation returns the new
//! user's idToken, and that same token is what authorizes the compensating
//! delete when local persistence fails afterwards.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::IdentityConfig;
use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
    #[error("identity provider unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

impl IdentityError {
    /// Boundary translation. The rejection text shown to clients is
    /// endpoint-specific; the provider's own message only goes to the log.
    pub fn into_api(self, rejected: &str) -> ApiError {
        match self {
            IdentityError::Rejected(detail) => {
                tracing::warn!("identity provider rejected request: {}", detail);
                ApiError::upstream_identity(rejected)
            }
            IdentityError::Network(err) => {
                tracing::error!("identity provider unreachable: {}", err);
                ApiError::bad_gateway("Identity provider unreachable")
            }
        }
    }
}

/// Remote account as the provider reports it right after creation.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub uid: String,
    pub id_token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a remote account and return its uid plus a token that can
    /// delete it again.
    async fn create_user(&self, email: &str, password: &str) -> Result<ProviderUser, IdentityError>;

    /// Delete the remote account the token belongs to.
    async fn delete_user(&self, id_token: &str) -> Result<(), IdentityError>;

    /// Verify credentials. The provider's session token is discarded; this
    /// API mints its own.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), IdentityError>;
}

pub struct FirebaseIdentity {
    http: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentity {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.auth_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    /// POST to an Identity Toolkit action. The toolkit reports failures both
    /// via status codes and via an `error` object in the body, so both are
    /// checked.
    async fn post(&self, action: &str, payload: Value) -> Result<Value, IdentityError> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() || body.get("error").is_some() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown provider error")
                .to_string();
            return Err(IdentityError::Rejected(message));
        }

        Ok(body)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<ProviderUser, IdentityError> {
        let body = self
            .post(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;

        let uid = body
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| IdentityError::Rejected("provider response missing localId".to_string()))?
            .to_string();
        let id_token = body
            .get("idToken")
            .and_then(Value::as_str)
            .ok_or_else(|| IdentityError::Rejected("provider response missing idToken".to_string()))?
            .to_string();

        Ok(ProviderUser { uid, id_token })
    }

    async fn delete_user(&self, id_token: &str) -> Result<(), IdentityError> {
        self.post("delete", json!({ "idToken": id_token })).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        self.post(
            "signInWithPassword",
            json!({ "email": email, "password": password, "returnSecureToken": true }),
        )
        .await?;
        Ok(())
    }
}
