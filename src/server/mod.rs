//! HTTP server
//!
//! REST façade over the Odoo client: employees are fetched from Odoo on
//! every request and returned as JSON.

mod handlers;

use crate::config::ServerConfig;
use crate::odoo::OdooClient;
use anyhow::Context;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{HttpError, HttpResult};

/// Shared handler state
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when the Odoo section of the config is incomplete
    pub odoo: Option<Arc<OdooClient>>,
}

impl AppState {
    pub fn new(odoo: Option<Arc<OdooClient>>) -> Self {
        Self { odoo }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/odoo/status", get(handlers::odoo_status))
        .route("/api/v1/employees", get(handlers::list_employees))
        .route("/api/v1/employees/", get(handlers::list_employees))
        .route("/api/v1/employees/{id}", get(handlers::get_employee))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr();
    let router = build_router(state, config.request_timeout());
    let listener = tokio::net::TcpListener::bind(bind_addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
