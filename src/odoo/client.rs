//! Odoo client module
//!
//! JSON-RPC client for Odoo's external API (`/jsonrpc`).
//! Authenticates lazily and keeps the resulting uid for later calls.

use crate::config::OdooConfig;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

use super::rpc::{JsonRpcRequest, JsonRpcResponse};

/// Odoo client errors
#[derive(Error, Debug)]
pub enum OdooError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}: {1}")]
    Status(u16, String),

    #[error("Odoo error ({code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("client is not authenticated")]
    NotAuthenticated,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("no record found with id {0}")]
    NotFound(i64),
}

/// JSON-RPC client bound to one Odoo database
#[derive(Debug)]
pub struct OdooClient {
    base_url: String,
    database: String,
    username: String,
    password: String,
    api_key: String,
    client_id: String,
    client_name: String,
    http_client: Client,
    uid: RwLock<Option<i64>>,
    next_id: AtomicU64,
}

impl OdooClient {
    /// Create a new client; no request is sent until the first call.
    pub fn new(config: &OdooConfig) -> Result<Self, OdooError> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            api_key: config.api_key.clone(),
            client_id: config.client_id.clone(),
            client_name: config.client_name.clone(),
            http_client,
            uid: RwLock::new(None),
            next_id: AtomicU64::new(1),
        })
    }

    /// Secret sent as "password": the API key when one is configured.
    pub fn auth_secret(&self) -> &str {
        if self.api_key.is_empty() {
            &self.password
        } else {
            &self.api_key
        }
    }

    /// Currently stored uid, if authenticated
    pub async fn uid(&self) -> Option<i64> {
        *self.uid.read().await
    }

    /// Authenticate against `common.authenticate` and store the uid.
    pub async fn authenticate(&self) -> Result<i64, OdooError> {
        let method = if self.api_key.is_empty() {
            "password"
        } else {
            "API key"
        };
        tracing::info!(
            "Authenticating with Odoo using {} (client: {})",
            method,
            self.client_name
        );

        let args = vec![
            json!(self.database),
            json!(self.username),
            json!(self.auth_secret()),
            json!({}),
        ];

        let result = match self.call("common", "authenticate", args).await {
            Ok(result) => result,
            Err(OdooError::Rpc { message, .. }) => {
                return Err(OdooError::Authentication(message));
            }
            Err(e) => return Err(e),
        };

        let uid = match result.as_i64() {
            Some(uid) if uid > 0 => uid,
            _ => {
                return Err(OdooError::Authentication(
                    "invalid credentials or unexpected response".to_string(),
                ))
            }
        };

        *self.uid.write().await = Some(uid);
        tracing::info!("Authenticated with Odoo, uid {} (client: {})", uid, self.client_name);
        Ok(uid)
    }

    /// Return the stored uid, authenticating first if there is none.
    pub async fn ensure_authenticated(&self) -> Result<i64, OdooError> {
        match self.uid().await {
            Some(uid) => Ok(uid),
            None => self.authenticate().await,
        }
    }

    /// Run `object.execute_kw` for `model.method(*args, **kwargs)`.
    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, OdooError> {
        let uid = self.uid().await.ok_or(OdooError::NotAuthenticated)?;

        tracing::debug!("execute_kw {}.{}", model, method);

        let call_args = vec![
            json!(self.database),
            json!(uid),
            json!(self.auth_secret()),
            json!(model),
            json!(method),
            args,
            kwargs,
        ];
        self.call("object", "execute_kw", call_args).await
    }

    /// Post one JSON-RPC `call` and unwrap its result.
    async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> Result<Value, OdooError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = JsonRpcRequest::call(id, service, method, args);
        let url = format!("{}/jsonrpc", self.base_url);

        let response = self.http_client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Odoo returned HTTP {} for {}.{}", status, service, method);
            return Err(OdooError::Status(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        let rpc_response: JsonRpcResponse = serde_json::from_slice(&body).map_err(|e| {
            OdooError::InvalidResponse(format!("Failed to parse JSON-RPC response: {}", e))
        })?;

        rpc_response.into_result()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }
}
