// JSON-RPC backend client for get_dashboard_data
use crate::application::dashboard_backend::{BackendError, DashboardBackend};
use crate::domain::dashboard::DashboardData;
use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const DASHBOARD_MODEL: &str = "hospital.dashboard";
const DASHBOARD_METHOD: &str = "get_dashboard_data";

#[derive(Debug)]
pub struct JsonRpcBackend {
    host: String,
    session_id: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: CallParams<'a>,
    id: u64,
}

#[derive(Debug, Serialize)]
struct CallParams<'a> {
    model: &'a str,
    method: &'a str,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorData {
    #[serde(default)]
    message: Option<String>,
}

impl JsonRpcBackend {
    pub fn new(host: String, session_id: Option<String>, timeout: Duration) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            session_id,
            timeout,
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn call_url(&self) -> String {
        format!(
            "{}/web/dataset/call_kw/{}/{}",
            self.host, DASHBOARD_MODEL, DASHBOARD_METHOD
        )
    }

    async fn call(&self) -> Result<Value, BackendError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params: CallParams {
                model: DASHBOARD_MODEL,
                method: DASHBOARD_METHOD,
                args: Vec::new(),
                kwargs: Map::new(),
            },
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let mut request = self
            .client
            .post(self.call_url())
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .json(&body);
        if let Some(session_id) = &self.session_id {
            request = request.header(header::COOKIE, format!("session_id={}", session_id));
        }

        tracing::debug!("Calling {}.{} on {}", DASHBOARD_MODEL, DASHBOARD_METHOD, self.host);
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout)
            } else {
                BackendError::Transport(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let rpc = response.json::<RpcResponse>().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout)
            } else {
                BackendError::Decode(e.to_string())
            }
        })?;

        if let Some(error) = rpc.error {
            let message = error
                .data
                .and_then(|d| d.message)
                .filter(|m| !m.is_empty())
                .unwrap_or(error.message);
            return Err(BackendError::Rpc {
                method: DASHBOARD_METHOD.to_string(),
                code: error.code,
                message,
            });
        }

        rpc.result
            .ok_or_else(|| BackendError::Decode("response carries neither result nor error".to_string()))
    }
}

#[async_trait]
impl DashboardBackend for JsonRpcBackend {
    async fn get_dashboard_data(&self) -> Result<DashboardData, BackendError> {
        let result = self.call().await?;
        serde_json::from_value(result).map_err(|e| BackendError::Decode(e.to_string()))
    }
}
