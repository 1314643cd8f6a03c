use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::middleware;
use axum::routing::post;
use axum::Router;
use http::header;
use http::Method;
use http::Request;
use http::Response;
use tower::ServiceBuilder;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::graphql::graphql;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::attach_request_context;
use crate::article::ports::ArticleServicePort;
use crate::author::ports::AuthorServicePort;
use crate::inbound::graphql::ResolverGate;
use crate::inbound::graphql::Schema;

#[derive(Clone)]
pub struct AppState {
    pub author_service: Arc<dyn AuthorServicePort>,
    pub schema: Arc<Schema>,
}

pub fn create_router(
    author_service: Arc<dyn AuthorServicePort>,
    article_service: Arc<dyn ArticleServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let schema = Schema::new(
        Arc::clone(&author_service),
        article_service,
        ResolverGate::new(authenticator),
    );

    let state = AppState {
        author_service,
        schema: Arc::new(schema),
    };

    let credential_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let graphql_routes = Router::new()
        .route("/graphql", post(graphql))
        .route_layer(middleware::from_fn(attach_request_context));

    // Query strings may carry tokens, so spans record the path only.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ]);

    Router::new()
        .merge(credential_routes)
        .merge(graphql_routes)
        .layer(ServiceBuilder::new().layer(trace_layer).layer(cors_layer))
        .with_state(state)
}
