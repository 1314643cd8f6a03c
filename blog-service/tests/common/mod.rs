#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::TokenIssuer;
use blog_service::article::ports::ArticleRepository;
use blog_service::article::service::ArticleService;
use blog_service::author::ports::AuthorRepository;
use blog_service::author::service::AuthorService;
use blog_service::inbound::http::router::create_router;
use blog_service::outbound::repositories::InMemoryDocumentStore;
use blog_service::outbound::repositories::PostgresDocumentStore;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "blog-service";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub store: TestStore,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

/// Backing store of a spawned application
pub enum TestStore {
    Memory(Arc<InMemoryDocumentStore>),
    Postgres(TestDb),
}

/// Throwaway database created for a single test
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

/// Author registered through the API, with a token from `/login`.
pub struct TestAuthor {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl TestApp {
    /// Spawn the application over an in-memory store
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        Self::spawn_with(Arc::clone(&store), TestStore::Memory(store)).await
    }

    /// Spawn the application over a fresh PostgreSQL database.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub async fn spawn_postgres() -> Option<Self> {
        let db = TestDb::new().await?;
        let repository = Arc::new(PostgresDocumentStore::new(db.pool.clone()));
        Some(Self::spawn_with(repository, TestStore::Postgres(db)).await)
    }

    async fn spawn_with<R>(repository: Arc<R>, store: TestStore) -> Self
    where
        R: AuthorRepository + ArticleRepository,
    {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET, JWT_ISSUER));

        let author_service = Arc::new(AuthorService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));
        let article_service = Arc::new(ArticleService::new(repository));

        let router = create_router(author_service, article_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            store,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(JWT_SECRET, JWT_ISSUER),
        }
    }

    /// Stored body of document `id`, read straight from the backing store.
    pub async fn raw_document(&self, id: &str) -> Option<Value> {
        match &self.store {
            TestStore::Memory(store) => store.raw_document(id).await,
            TestStore::Postgres(db) => {
                sqlx::query_scalar::<_, Json<Value>>("SELECT body FROM documents WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&db.pool)
                    .await
                    .expect("Failed to read document")
                    .map(|Json(body)| body)
            }
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Register `username` with password `pass_word!`.
    pub async fn register(&self, username: &str) -> reqwest::Response {
        self.post("/register")
            .json(&json!({
                "firstname": "Nicola",
                "lastname": "Tesla",
                "username": username,
                "password": "pass_word!"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .json(&json!({"username": username, "password": password}))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in a fresh author.
    pub async fn create_author(&self, username: &str) -> TestAuthor {
        let registered: Value = self
            .register(username)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        let logged_in: Value = self
            .login(username, "pass_word!")
            .await
            .json()
            .await
            .expect("Failed to parse response");

        TestAuthor {
            id: registered["id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            token: logged_in["token"].as_str().unwrap().to_string(),
        }
    }

    /// POST a query document to `/graphql`, optionally with `?token=`.
    pub async fn graphql(&self, token: Option<&str>, query: &str, variables: Value) -> Value {
        let mut request = self.post("/graphql");
        if let Some(token) = token {
            request = request.query(&[("token", token)]);
        }

        let response = request
            .json(&json!({"query": query, "variables": variables}))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse response")
    }
}

impl TestDb {
    /// Create a database with a unique name and run the migrations on it.
    ///
    /// `DATABASE_URL` points at the server's maintenance database; tests that
    /// need PostgreSQL are skipped when it is unset.
    pub async fn new() -> Option<Self> {
        let admin_url = std::env::var("DATABASE_URL").ok()?;
        let db_name = format!(
            "test_blog_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            admin_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
