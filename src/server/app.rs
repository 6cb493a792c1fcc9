use std::any::Any;

use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router, ApiError};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::quiz::SharedRng;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    rng: SharedRng,
}

impl AppState {
    pub fn new(pool: SqlitePool, rng: SharedRng) -> Self {
        Self { pool, rng }
    }
}

pub fn app(state: AppState) -> Router {
    with_middleware(api_router(state))
}

/// Every endpoint with its state applied, without the middleware stack.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router())
        .merge(questions_router())
        .merge(quizzes_router())
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        })
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .with_state(state)
}

/// Panic catching, CORS and request tracing around `router`.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = app(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic".to_owned()
    };
    ApiError::ServerError(format!("handler panicked: {detail}")).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn metrics() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder
        .encode(&metrics, &mut buf)
        .map_err(|e| ApiError::ServerError(e.to_string()))?;
    let content_type = HeaderValue::from_str(encoder.format_type())
        .map_err(|e| ApiError::ServerError(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, content_type)], buf).into_response())
}
