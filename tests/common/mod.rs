#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Email on the server's admin allow-list.
pub const DEAN_EMAIL: &str = "dean@campus.test";

/// Which store the spawned server runs against.
pub enum Store {
    Memory,
    Postgres(String),
}

/// Server process owned by one test. Killed when dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(store: Store) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cheap password hashing keeps the suite fast
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_campus-events-api"));
        cmd.env("CAMPUS_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("JWT_SECRET", "integration-test-secret")
            .env("ADMIN_USERS", DEAN_EMAIL)
            .env("PASSWORD_MEMORY_KIB", "8")
            .env("PASSWORD_ITERATIONS", "1")
            .env("API_ENABLE_REQUEST_LOGGING", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        match store {
            Store::Memory => {
                cmd.env("STORE", "memory").env_remove("DATABASE_URL");
            }
            Store::Postgres(url) => {
                cmd.env("STORE", "postgres")
                    .env("DATABASE_URL", url)
                    .env("DATABASE_RUN_MIGRATIONS", "true");
            }
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Thin JSON client bound to its own server process.
pub struct Api {
    pub base_url: String,
    pub client: reqwest::Client,
    server: TestServer,
}

impl Api {
    /// Fresh server over the in-memory store.
    pub async fn connect() -> Result<Self> {
        Self::start(Store::Memory).await
    }

    /// Server over the database in `DATABASE_URL`, or `None` when it is unset.
    pub async fn connect_postgres() -> Result<Option<Self>> {
        match std::env::var("DATABASE_URL") {
            Ok(url) => Self::start(Store::Postgres(url)).await.map(Some),
            Err(_) => {
                eprintln!("DATABASE_URL not set; skipping Postgres-backed test");
                Ok(None)
            }
        }
    }

    async fn start(store: Store) -> Result<Self> {
        let server = TestServer::spawn(store)?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(Self {
            base_url: server.base_url.clone(),
            client: reqwest::Client::new(),
            server,
        })
    }

    pub fn port(&self) -> u16 {
        self.server.port
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let res = request.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(reqwest::Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(reqwest::Method::POST, path, token, Some(body)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.post(
            "/api/auth/register",
            None,
            json!({ "fullName": "Integration Student", "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.post("/api/auth/login", None, json!({ "email": email, "password": password }))
            .await
    }

    /// Registers a fresh account and returns `(user id, token)`.
    pub async fn new_student(&self) -> Result<(String, String)> {
        let email = unique_email("student");
        let (status, body) = self.register(&email, "password").await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register {}: {} {}", email, status, body);
        Ok((
            body["data"]["user"]["id"].as_str().context("user id")?.to_string(),
            body["data"]["token"].as_str().context("token")?.to_string(),
        ))
    }

    /// Token for the allow-listed admin; registers the account on first use.
    pub async fn dean_token(&self) -> Result<String> {
        let (status, body) = self.register(DEAN_EMAIL, "dean-password").await?;
        let body = if status == StatusCode::CONFLICT {
            self.login(DEAN_EMAIL, "dean-password").await?.1
        } else {
            body
        };
        Ok(body["data"]["token"].as_str().context("dean token")?.to_string())
    }

    /// Creates an event as the dean and returns its id.
    pub async fn create_event(&self, capacity: i64) -> Result<String> {
        let dean = self.dean_token().await?;
        let (status, body) = self
            .post(
                "/api/events",
                Some(&dean),
                json!({
                    "title": "Career Fair",
                    "date": "2031-02-14",
                    "time": "10:30",
                    "location": "Student Union",
                    "description": "Meet recruiters",
                    "category": "academic",
                    "capacity": capacity,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create event: {} {}", status, body);
        Ok(body["data"]["id"].as_str().context("event id")?.to_string())
    }
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@campus.edu", prefix, uuid::Uuid::new_v4().simple())
}
