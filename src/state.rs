use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::db::Store;
use crate::services::IdentityProvider;

/// Shared application state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub codec: TokenCodec,
    pub identity: Arc<dyn IdentityProvider>,
}
