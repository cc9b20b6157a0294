//! JSON-RPC 2.0 envelope used by Odoo's `/jsonrpc` endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::OdooError;

/// JSON-RPC 2.0 Request
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: CallParams,
    pub id: u64,
}

/// Params of an Odoo `call`: a service, a method on it and positional args
#[derive(Debug, Serialize, Deserialize)]
pub struct CallParams {
    pub service: String,
    pub method: String,
    pub args: Vec<Value>,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcRequest {
    pub fn call(id: u64, service: &str, method: &str, args: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: "call".to_string(),
            params: CallParams {
                service: service.to_string(),
                method: method.to_string(),
                args,
            },
            id,
        }
    }
}

impl JsonRpcError {
    /// Odoo reports the generic "Odoo Server Error" as `message` and the
    /// actual exception text under `data.message`.
    pub fn detail(&self) -> String {
        match self
            .data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
        {
            Some(detail) if !detail.is_empty() && detail != self.message => {
                format!("{}: {}", self.message, detail)
            }
            _ => self.message.clone(),
        }
    }
}

impl JsonRpcResponse {
    pub fn into_result(self) -> Result<Value, OdooError> {
        if let Some(error) = self.error {
            return Err(OdooError::Rpc {
                code: error.code,
                message: error.detail(),
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}
