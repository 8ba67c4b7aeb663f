// Dispatches window actions as links into the backend's web client
use crate::application::action_dispatcher::{ActionDispatcher, ActionTarget, DispatchError};
use crate::domain::action::WindowAction;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct WebClientDispatcher {
    base_url: String,
}

impl WebClientDispatcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/web#model=<res_model>&view_type=<first view>`
    pub fn action_url(&self, action: &WindowAction) -> Result<String, DispatchError> {
        let view = action.first_view().ok_or_else(|| DispatchError::Rejected {
            res_model: action.res_model.to_string(),
            reason: "action has no views".to_string(),
        })?;

        Ok(format!(
            "{}/web#model={}&view_type={}",
            self.base_url,
            urlencoding::encode(action.res_model),
            view.as_str()
        ))
    }
}

#[async_trait]
impl ActionDispatcher for WebClientDispatcher {
    async fn do_action(&self, action: &WindowAction) -> Result<ActionTarget, DispatchError> {
        let url = self.action_url(action)?;
        tracing::debug!("Dispatching {} to {}", action.res_model, url);
        Ok(ActionTarget { url })
    }
}
