pub mod auth;

pub use auth::{require_admin, require_user, AuthError, CurrentUser};
