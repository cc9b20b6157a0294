#![allow(dead_code)]

use odoo_employee_gateway::config::OdooConfig;
use odoo_employee_gateway::odoo::OdooClient;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn odoo_config(url: &str) -> OdooConfig {
    OdooConfig {
        url: url.to_string(),
        database: "testdb".to_string(),
        username: "admin".to_string(),
        password: "admin-pw".to_string(),
        client_name: "Test Client".to_string(),
        ..Default::default()
    }
}

pub fn client_for(server: &MockServer) -> Arc<OdooClient> {
    Arc::new(OdooClient::new(&odoo_config(&server.uri())).unwrap())
}

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

pub fn rpc_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {
            "code": 200,
            "message": "Odoo Server Error",
            "data": {"message": message},
        },
    }))
}

/// Answer `common.authenticate` with `uid`
pub async fn mount_authenticate(server: &MockServer, uid: Value) {
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": {"service": "common", "method": "authenticate"}
        })))
        .respond_with(rpc_result(uid))
        .mount(server)
        .await;
}

/// Answer `object.execute_kw` with `response`
pub async fn mount_execute(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": {"service": "object", "method": "execute_kw"}
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn sample_employee() -> Value {
    json!({
        "id": 11,
        "identification_id": "11.111.111-1",
        "name": "María José González",
        "country_id": [46, "Chile"],
        "work_email": "mjg@example.com",
        "private_email": false,
        "work_phone": false,
        "private_phone": "+56 9 8765 4321",
        "private_street": "Los Leones 100",
        "private_city": "Providencia",
        "private_state_id": [1200, "Metropolitana"],
        "hr_commune": [13123, "Providencia"],
        "image_1920": false,
        "birthday": "1985-12-01",
        "gender": "female"
    })
}
