//! `/metrics` endpoint for Prometheus scraping.

use crate::application::reconciler::MetricReconciler;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

pub const TEXT_FORMAT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub struct EncodingFailed;

impl IntoResponse for EncodingFailed {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to encode metrics",
        )
            .into_response()
    }
}

pub fn router(reconciler: Arc<MetricReconciler>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(reconciler)
}

/// Handler for the /metrics endpoint.
pub async fn metrics_handler(
    State(reconciler): State<Arc<MetricReconciler>>,
) -> Result<Response, EncodingFailed> {
    debug!("Processing /metrics request");
    let body = reconciler.render().await.map_err(|e| {
        error!("Exposition: failed to encode metrics: {}", e);
        EncodingFailed
    })?;

    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT_CONTENT_TYPE)], body).into_response())
}

/// Serve the exposition endpoint until the listener fails or the future is dropped.
pub async fn serve(listener: TcpListener, reconciler: Arc<MetricReconciler>) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Exposition: Listening on {}", addr);
    axum::serve(listener, router(reconciler))
        .await
        .context("Metrics server failed")
}
