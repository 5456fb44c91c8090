#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use uuid::Uuid;

use storefront_admin_api::auth::{encode_token, Claims};

/// Secret the spawned server signs and verifies with
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // No DATABASE_URL: every case here must hold without a live database
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_storefront-admin-api"));
        cmd.env("API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .env_remove("DATABASE_URL")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Bearer token for a fresh user holding `permissions`
pub fn token_with(permissions: &[&str]) -> String {
    let claims = Claims::with_expiry(
        Uuid::new_v4(),
        "Integration Tester".to_string(),
        permissions.iter().map(|p| p.to_string()).collect(),
        1,
    );
    encode_token(&claims, TEST_JWT_SECRET).expect("failed to sign test token")
}

/// Status plus parsed JSON body
pub async fn read_json(response: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let body = response.json::<Value>().await?;
    Ok((status, body))
}

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Pool on `DATABASE_URL` with the reference schema loaded, or `None` when
/// the variable is unset and the calling test should skip.
pub async fn database() -> Result<Option<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    // Serialise schema loading across concurrently running tests
    let mut conn = pool.acquire().await?;
    sqlx::query("SELECT pg_advisory_lock(7301)").execute(&mut *conn).await?;
    let loaded = (&mut *conn).execute(SCHEMA).await;
    sqlx::query("SELECT pg_advisory_unlock(7301)").execute(&mut *conn).await?;
    loaded.context("failed to load sql/schema.sql")?;
    drop(conn);

    Ok(Some(pool))
}

/// Short random marker that keeps rows of one test apart from the rest
pub fn unique_tag() -> String {
    format!("t{}", &Uuid::new_v4().simple().to_string()[..12])
}
