// Application state for HTTP handlers
use crate::application::dashboard_controller::DashboardController;
use crate::domain::view_state::MountedView;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DashboardController>,
    /// Canvases the dashboard page provides once it is rendered.
    pub layout: MountedView,
}
