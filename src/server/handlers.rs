//! Route handlers and the JSON error type they share

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::odoo::{EmployeeService, ListQuery, OdooClient};

const SERVICE_NAME: &str = "Odoo Employee Gateway";

/// Handler result rendering failures as [`HttpError`]
pub type HttpResult<T> = Result<T, HttpError>;

/// Error rendered as `{"error": message}`
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// `GET /`: service banner
pub async fn home() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "message": format!("Welcome to the {} service", SERVICE_NAME),
    }))
}

/// `GET /health`: liveness only, Odoo is not contacted
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

/// `GET /odoo/status`: authenticates if needed and reports the uid
pub async fn odoo_status(State(state): State<AppState>) -> Response {
    let status_error = |message: String| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": message })),
        )
            .into_response()
    };

    let Some(client) = state.odoo else {
        return status_error("Odoo client not configured".to_string());
    };

    match client.ensure_authenticated().await {
        Ok(uid) => Json(json!({
            "status": "connected",
            "client_name": client.client_name(),
            "uid": uid,
            "database": client.database(),
        }))
        .into_response(),
        Err(e) => status_error(format!("Error authenticating with Odoo: {}", e)),
    }
}

/// Paging query of `GET /api/v1/employees`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    limit: Option<u32>,
    offset: Option<u32>,
}

/// `GET /api/v1/employees`
pub async fn list_employees(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> HttpResult<Json<Value>> {
    let Query(params) = params.map_err(|rejection| {
        HttpError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid query parameters: {}", rejection.body_text()),
        )
    })?;

    let client = connected_client(&state).await?;
    let query = ListQuery {
        limit: params.limit,
        offset: params.offset,
    };

    let employees = EmployeeService::new(client)
        .list(&query)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch employees: {}", e);
            HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching employees: {}", e),
            )
        })?;

    Ok(Json(json!({
        "success": true,
        "count": employees.len(),
        "data": employees,
    })))
}

/// `GET /api/v1/employees/{id}`
pub async fn get_employee(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> HttpResult<Json<Value>> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| HttpError::new(StatusCode::BAD_REQUEST, "Invalid employee id"))?;

    let client = connected_client(&state).await?;

    // Every lookup failure is reported as 404, upstream errors included.
    let employee = EmployeeService::new(client).get(id).await.map_err(|e| {
        tracing::warn!("Employee {} lookup failed: {}", id, e);
        HttpError::new(StatusCode::NOT_FOUND, format!("Employee not found: {}", e))
    })?;

    Ok(Json(json!({
        "success": true,
        "data": employee,
    })))
}

/// Fallback for unknown routes
pub async fn not_found() -> HttpError {
    HttpError::new(StatusCode::NOT_FOUND, "Route not found")
}

/// Fallback for known routes hit with a method other than GET
pub async fn method_not_allowed() -> HttpError {
    HttpError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed. Use GET")
}

/// The configured client, authenticated lazily on first use.
async fn connected_client(state: &AppState) -> HttpResult<Arc<OdooClient>> {
    let client = state.odoo.clone().ok_or_else(|| {
        HttpError::new(StatusCode::SERVICE_UNAVAILABLE, "Odoo client not configured")
    })?;

    client.ensure_authenticated().await.map_err(|e| {
        tracing::warn!("Odoo authentication failed: {}", e);
        HttpError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Error authenticating with Odoo: {}", e),
        )
    })?;

    Ok(client)
}
