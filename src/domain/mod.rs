// Domain layer - dashboard data, charts, navigation and view state
pub mod action;
pub mod chart;
pub mod dashboard;
pub mod kpi;
pub mod view_state;
