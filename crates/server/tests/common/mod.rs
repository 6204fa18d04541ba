//! # Common Test Utilities
//!
//! This module centralizes test harnesses and helper functions used across
//! the `replykit-server` integration tests:
//!
//! - `TestApp`: A full application harness that spawns a real server on a
//!   random port, configured with mock external services (AI provider and
//!   LINE API both point at an `httpmock::MockServer`).
//! - JWT helpers for exercising the auth layer.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use replykit_server::{
    auth::middleware::Claims,
    config, router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use std::{
    fs::File,
    io::Write,
    net::SocketAddr,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use uuid::Uuid;

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
///
/// This struct spawns the server on a random available port, sets up a
/// temporary SQLite database, and configures the `AppState` so that both
/// the AI provider and the LINE API point at an `httpmock::MockServer`.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub db_path: PathBuf,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

/// The channel secret every `TestApp` is configured with.
pub const TEST_CHANNEL_SECRET: &str = "test-channel-secret";

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
providers:
  default:
    provider: "openai_compat"
    api_url: "{}"
    api_key: null
    model_name: "mock-chat-model"
tasks:
  suggestion:
    provider: "default"
line:
  channel_secret: "{TEST_CHANNEL_SECRET}"
  channel_access_token: "test-channel-access-token"
  api_url: "{}"
"#,
            db_path.to_str().unwrap(),
            mock_server.url("/v1/chat/completions"),
            mock_server.base_url(),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            db_path,
            app_state: app_state_for_harness,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Opens a direct connection to the harness database for assertions.
    pub async fn connect_db(&self) -> Result<turso::Connection> {
        Ok(self.app_state.sqlite_provider.db.connect()?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- Auth Helpers ---

/// Generates a valid JWT for a given account identifier (subject).
pub fn generate_jwt(sub: &str) -> Result<String> {
    generate_jwt_with_expiry(sub, 3600)
}

/// Generates a JWT for a given account identifier with a custom expiration.
/// Pass a negative expiry to produce an already-expired token.
pub fn generate_jwt_with_expiry(sub: &str, expires_in_secs: i64) -> Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;
    let expiration = now + expires_in_secs;
    let account_id = Uuid::new_v5(&Uuid::NAMESPACE_URL, sub.as_bytes()).to_string();
    let claims = Claims {
        sub: sub.to_string(),
        exp: expiration as usize,
        account_id,
    };
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "a-secure-secret-key".to_string());
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

/// The deterministic account id `generate_jwt` produces for a subject.
pub fn account_id_for(sub: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, sub.as_bytes()).to_string()
}

// --- LINE Helpers ---

/// Computes the `x-line-signature` value for a webhook body.
pub fn line_signature(secret: &str, body: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}
