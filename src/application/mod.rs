// Application layer - ports and the dashboard use case
pub mod action_dispatcher;
pub mod chart_renderer;
pub mod dashboard_backend;
pub mod dashboard_controller;

#[cfg(test)]
pub mod test_support;
