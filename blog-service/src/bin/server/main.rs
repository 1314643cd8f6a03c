use std::sync::Arc;

use auth::Authenticator;
use blog_service::article::ports::ArticleServicePort;
use blog_service::article::service::ArticleService;
use blog_service::author::ports::AuthorServicePort;
use blog_service::author::service::AuthorService;
use blog_service::config::Config;
use blog_service::inbound::http::router::create_router;
use blog_service::outbound::repositories::InMemoryDocumentStore;
use blog_service::outbound::repositories::PostgresDocumentStore;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "blog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let document_store = match config.database.url {
        Some(_) => "postgresql",
        None => "memory",
    };

    tracing::info!(
        http_port = config.server.http_port,
        document_store,
        jwt_issuer = %config.jwt.issuer,
        token_lifetime_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes(), &config.jwt.issuer)
            .with_token_lifetime(Duration::minutes(config.jwt.expiration_minutes)),
    );

    let (author_service, article_service): (Arc<dyn AuthorServicePort>, Arc<dyn ArticleServicePort>) =
        match &config.database.url {
            Some(url) => {
                let pg_pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .connect(url)
                    .await?;
                tracing::info!(
                    max_connections = config.database.max_connections,
                    database = "postgresql",
                    "Database connection pool created"
                );

                sqlx::migrate!("./migrations").run(&pg_pool).await?;
                tracing::info!(database = "postgresql", "Database migrations completed");

                let store = Arc::new(PostgresDocumentStore::new(pg_pool));
                let author_service: Arc<dyn AuthorServicePort> =
                    Arc::new(AuthorService::new(Arc::clone(&store), Arc::clone(&authenticator)));
                let article_service: Arc<dyn ArticleServicePort> =
                    Arc::new(ArticleService::new(store));
                (author_service, article_service)
            }
            None => {
                tracing::warn!("No database configured, documents are kept in memory");

                let store = Arc::new(InMemoryDocumentStore::new());
                let author_service: Arc<dyn AuthorServicePort> =
                    Arc::new(AuthorService::new(Arc::clone(&store), Arc::clone(&authenticator)));
                let article_service: Arc<dyn ArticleServicePort> =
                    Arc::new(ArticleService::new(store));
                (author_service, article_service)
            }
        };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(author_service, article_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
