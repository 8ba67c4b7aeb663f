// Navigation port - hands window actions to the host web client
use crate::domain::action::WindowAction;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Where the host web client shows the requested action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionTarget {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("cannot open {res_model}: {reason}")]
    Rejected { res_model: String, reason: String },
}

#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn do_action(&self, action: &WindowAction) -> Result<ActionTarget, DispatchError>;
}
