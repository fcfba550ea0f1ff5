use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::auth::{Claims, TokenCodec, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

/// Role name that grants administrative access.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Authorization header missing.")]
    MissingHeader,
    #[error("Invalid Authorization header. Expected 'Bearer <token>'.")]
    MalformedHeader,
    #[error("Invalid token or expired token: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("Inactive user.")]
    InactiveUser,
    #[error("User is not an administrator.")]
    NotAdministrator,
}

/// Authenticated caller context extracted from the session token and
/// injected into request extensions by the middleware below.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub nombre: String,
    pub rol: String,
    pub is_admin: bool,
}

impl CurrentUser {
    /// For routes that are owner-accessible but carry admin-only verbs.
    pub fn ensure_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::NotAdministrator.into())
        }
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let is_admin = claims.rol == ADMIN_ROLE;
        Self {
            id: claims.id,
            email: claims.email,
            nombre: claims.nombre,
            rol: claims.rol,
            is_admin,
        }
    }
}

/// Decode the caller from the Authorization header. Tokens that verify but
/// carry an empty role belong to deactivated users and are rejected.
pub fn authenticate(codec: &TokenCodec, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = codec.verify(token)?;

    if claims.rol.trim().is_empty() {
        return Err(AuthError::InactiveUser);
    }

    Ok(CurrentUser::from(claims))
}

/// Middleware: any authenticated, active user may pass.
pub async fn require_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state.codec, &headers).map_err(|err| {
        tracing::debug!("authentication rejected: {}", err);
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Middleware: only administrators may pass.
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state.codec, &headers).map_err(|err| {
        tracing::debug!("authentication rejected: {}", err);
        ApiError::from(err)
    })?;

    if !user.is_admin {
        tracing::warn!("admin route denied for {}", user.email);
        return Err(AuthError::NotAdministrator.into());
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    if token.trim().is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
