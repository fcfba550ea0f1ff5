#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use sgt_api::auth::TokenCodec;

/// Secret shared between the spawned server and the tokens minted here.
pub const JWT_SECRET: &str = "secreto-de-integracion";

/// User id embedded in every minted token.
pub const USUARIO_ID: &str = "65a1b2c3d4e5f6a7b8c9d0e1";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // The store URI and provider URL point at closed ports on purpose:
        // everything this suite exercises must behave deterministically
        // without live backends.
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sgt-api"));
        cmd.env("PORT", port.to_string())
            .env("JWT_SECRET", JWT_SECRET)
            .env("JWT_TTL_MINUTES", "60")
            .env("MONGODB_URI", "mongodb://127.0.0.1:1")
            .env("MONGODB_DB", "sgt_pruebas")
            .env("MONGODB_TIMEOUT_SECS", "1")
            .env("FIREBASE_API_KEY", "clave-de-prueba")
            .env("FIREBASE_AUTH_URL", "http://127.0.0.1:9")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;

        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/", self.base_url)).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint a token the spawned server will accept.
pub fn token(rol: &str) -> String {
    TokenCodec::new(JWT_SECRET, 60)
        .issue(USUARIO_ID, "prueba@example.com", "Prueba", rol)
        .expect("token")
}

/// Correctly signed but already past its expiry.
pub fn token_expirado() -> String {
    TokenCodec::new(JWT_SECRET, -5)
        .issue(USUARIO_ID, "prueba@example.com", "Prueba", "admin")
        .expect("token")
}
