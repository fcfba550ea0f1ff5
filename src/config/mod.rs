use once_cell::sync::Lazy;
use std::env;

/// Fallback signing secret for local development only.
pub const DEV_JWT_SECRET: &str = "tu_clave_secreta_muy_segura";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub security: SecurityConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    /// Upper bound on server selection, in seconds. Keeps a dead database
    /// from stalling requests for the driver default of 30s.
    pub selection_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub auth_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Store overrides
        if let Ok(v) = env::var("MONGODB_URI") {
            self.store.uri = v;
        }
        if let Ok(v) = env::var("MONGODB_DB") {
            self.store.database = v;
        }
        if let Ok(v) = env::var("MONGODB_TIMEOUT_SECS") {
            self.store.selection_timeout_secs =
                v.parse().unwrap_or(self.store.selection_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_TTL_MINUTES") {
            self.security.token_ttl_minutes =
                v.parse().unwrap_or(self.security.token_ttl_minutes);
        }

        // Identity provider overrides
        if let Ok(v) = env::var("FIREBASE_API_KEY") {
            self.identity.api_key = v;
        }
        if let Ok(v) = env::var("FIREBASE_AUTH_URL") {
            self.identity.auth_url = v;
        }

        self
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 8000 },
            store: StoreConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "sistema_gestion_tareas".to_string(),
                selection_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                token_ttl_minutes: 60,
            },
            identity: IdentityConfig {
                api_key: String::new(),
                auth_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
