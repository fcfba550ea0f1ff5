// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    DuplicateName(String),
    UpstreamIdentity(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (identity provider unreachable)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::DuplicateName(_) => 400,
            ApiError::UpstreamIdentity(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::DuplicateName(msg) => msg,
            ApiError::UpstreamIdentity(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::DuplicateName(_) => "DUPLICATE_NAME",
            ApiError::UpstreamIdentity(_) => "IDENTITY_REJECTED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn duplicate_name(message: impl Into<String>) -> Self {
        ApiError::DuplicateName(message.into())
    }

    pub fn upstream_identity(message: impl Into<String>) -> Self {
        ApiError::UpstreamIdentity(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::db::StoreError> for ApiError {
    fn from(err: crate::db::StoreError) -> Self {
        match err {
            crate::db::StoreError::Duplicate(msg) => ApiError::duplicate_name(msg),
            crate::db::StoreError::NotFound(label) => {
                ApiError::not_found(format!("{} not found", label))
            }
            crate::db::StoreError::Driver(driver_err) => {
                if matches!(
                    driver_err.kind.as_ref(),
                    mongodb::error::ErrorKind::ServerSelection { .. }
                ) {
                    tracing::warn!("MongoDB unreachable: {}", driver_err);
                    ApiError::service_unavailable("Database temporarily unavailable")
                } else {
                    // Log the real error but return generic message
                    tracing::error!("MongoDB driver error: {}", driver_err);
                    ApiError::internal_server_error(
                        "An error occurred while processing your request",
                    )
                }
            }
            crate::db::StoreError::Decode(decode_err) => {
                tracing::error!("Stored document decode error: {}", decode_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::db::StoreError::Encode(encode_err) => {
                tracing::error!("Document encode error: {}", encode_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::db::StoreError::UnexpectedKey => {
                tracing::error!("Store returned a non-ObjectId key");
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::models::ModelError> for ApiError {
    fn from(err: crate::models::ModelError) -> Self {
        match err {
            crate::models::ModelError::InvalidField { field, message } => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), message.to_string());
                ApiError::validation_error("Invalid field value", Some(field_errors))
            }
            crate::models::ModelError::MissingField(field) => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), "This field is required".to_string());
                ApiError::validation_error("Missing required fields", Some(field_errors))
            }
        }
    }
}

impl From<crate::middleware::auth::AuthError> for ApiError {
    fn from(err: crate::middleware::auth::AuthError) -> Self {
        match err {
            crate::middleware::auth::AuthError::NotAdministrator => {
                ApiError::forbidden(err.to_string())
            }
            _ => ApiError::unauthorized(err.to_string()),
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        tracing::error!("Token issuance error: {}", err);
        ApiError::internal_server_error("Failed to issue session token")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::duplicate_name("x").status_code(), 400);
        assert_eq!(ApiError::upstream_identity("x").status_code(), 400);
        assert_eq!(ApiError::unauthorized("x").status_code(), 401);
        assert_eq!(ApiError::forbidden("x").status_code(), 403);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::bad_gateway("x").status_code(), 502);
        assert_eq!(ApiError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ApiError::not_found("Rol not found").to_json();
        assert_eq!(body["error"], json!(true));
        assert_eq!(body["message"], json!("Rol not found"));
        assert_eq!(body["code"], json!("NOT_FOUND"));
    }

    #[test]
    fn test_validation_error_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("avance".to_string(), "must be between 0 and 100".to_string());
        let body = ApiError::validation_error("Invalid field value", Some(fields)).to_json();
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["field_errors"]["avance"], json!("must be between 0 and 100"));
    }
}
