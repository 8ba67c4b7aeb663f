// Backend port - where dashboard snapshots come from
use crate::domain::dashboard::DashboardData;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
    #[error("backend answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{method} failed ({code}): {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },
    #[error("invalid dashboard payload: {0}")]
    Decode(String),
}

#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Fetch the pre-aggregated dashboard snapshot. Takes no arguments.
    async fn get_dashboard_data(&self) -> Result<DashboardData, BackendError>;
}
