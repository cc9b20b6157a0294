//! Odoo Employee Gateway
//!
//! Entry point for the gateway binary.

use odoo_employee_gateway::config::Config;
use odoo_employee_gateway::odoo::OdooClient;
use odoo_employee_gateway::server::{self, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    tracing::info!("Starting Odoo Employee Gateway...");

    let config = Config::load_default()?;

    let odoo = match config.odoo.validate() {
        Ok(()) => {
            let client = Arc::new(OdooClient::new(&config.odoo)?);
            tracing::info!(
                "Configured for Odoo at {} (database: {})",
                client.base_url(),
                client.database()
            );

            // Eager attempt only; requests authenticate lazily on failure.
            if let Err(e) = client.authenticate().await {
                tracing::warn!("Odoo authentication failed: {}", e);
                tracing::warn!("Starting anyway; Odoo will be retried on the next request");
            }
            Some(client)
        }
        Err(e) => {
            tracing::warn!("Odoo is not configured: {}", e);
            tracing::warn!("Starting without an Odoo connection");
            None
        }
    };

    server::serve(&config.server, AppState::new(odoo)).await
}
