#![allow(dead_code)]

use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use feedback_desk::config::Config;
use feedback_desk::state::SharedState;

pub const ADMIN_ID: &str = "admin-1";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub state: SharedState,
    pub db_name: String,
}

/// A logged-in client; its cookie store carries the session.
pub struct Session {
    pub client: Client,
    pub base: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A client with an empty cookie jar.
    pub fn anonymous(&self) -> Session {
        Session {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .unwrap(),
            base: format!("http://{}", self.addr),
        }
    }

    /// Log in as `user_id` and return the session.
    pub async fn login(&self, user_id: &str) -> Session {
        let session = self.anonymous();
        let (body, status) = session
            .post("/api/login", &json!({ "userId": user_id, "isTelegram": true }))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        session
    }

    pub async fn admin(&self) -> Session {
        self.login(ADMIN_ID).await
    }
}

impl Session {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit feedback, asserting it was created. Returns the record.
    pub async fn submit(&self, kind: &str, message: &str, contact: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/complaints",
                &json!({ "type": kind, "message": message, "contactInfo": contact }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {body}");
        body
    }

    pub async fn list(&self) -> Vec<Value> {
        let (body, status) = self.get("/api/complaints").await;
        assert_eq!(status, StatusCode::OK, "list failed: {body}");
        body.as_array().cloned().unwrap_or_default()
    }

    pub async fn respond(&self, id: &str, text: &str) -> (Value, StatusCode) {
        self.put(
            &format!("/api/complaints/{id}/respond"),
            &json!({ "response": text }),
        )
        .await
    }
}

pub fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        session_secret: "test-session-secret-that-is-long-enough".to_string(),
        session_ttl_hours: 1,
        admin_id: Some(ADMIN_ID.to_string()),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        cors_origins: vec![],
        production: false,
        max_body_size: 65_536,
        static_dir: "public".to_string(),
        submission_limit: 0,
        submission_window_secs: 60,
        log_level: "warn".to_string(),
        telegram: None,
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a test app, letting the caller adjust the configuration first.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!(
        "feedback_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let mut config = test_config(test_url);
    configure(&mut config);

    let (app, state) = feedback_desk::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        state,
        db_name,
    }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!(
        "DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"
    ))
    .execute(&admin_pool)
    .await;

    admin_pool.close().await;
}
