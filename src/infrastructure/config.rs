use crate::domain::chart::DASHBOARD_CHARTS;
use crate::domain::view_state::{Canvas, MountedView};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub web_client: WebClientSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Session cookie forwarded as is on every call.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WebClientSettings {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_canvases")]
    pub canvases: Vec<Canvas>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            session_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvases: default_canvases(),
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Web client links default to the backend host.
    pub fn web_client_base_url(&self) -> &str {
        self.web_client
            .base_url
            .as_deref()
            .unwrap_or(&self.backend.url)
    }
}

impl LayoutConfig {
    pub fn mounted_view(&self) -> MountedView {
        MountedView::new(self.canvases.iter().cloned())
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:8069".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_canvases() -> Vec<Canvas> {
    DASHBOARD_CHARTS
        .iter()
        .map(|spec| Canvas::new(spec.canvas_id, 480, 320))
        .collect()
}

/// Reads `config/dashboard.*` when present, then `DASHBOARD_*` environment
/// overrides such as `DASHBOARD_BACKEND__URL`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    app_config_from(config::File::with_name("config/dashboard").required(false))
}

pub fn load_layout_config() -> anyhow::Result<LayoutConfig> {
    layout_config_from(config::File::with_name("config/layout").required(false))
}

fn app_config_from<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn layout_config_from<S>(file: S) -> anyhow::Result<LayoutConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder().add_source(file).build()?;

    Ok(settings.try_deserialize()?)
}
