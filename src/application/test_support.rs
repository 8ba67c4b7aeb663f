// Test doubles for the application ports
use crate::application::action_dispatcher::{ActionDispatcher, ActionTarget, DispatchError};
use crate::application::chart_renderer::{ChartRenderer, RenderError};
use crate::application::dashboard_backend::{BackendError, DashboardBackend};
use crate::domain::action::WindowAction;
use crate::domain::chart::ChartConfig;
use crate::domain::dashboard::DashboardData;
use crate::domain::view_state::Canvas;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Answers every call with the same scripted result.
pub struct ScriptedBackend {
    response: Mutex<Result<DashboardData, BackendError>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn ok(data: DashboardData) -> Self {
        Self {
            response: Mutex::new(Ok(data)),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn failing(error: BackendError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Every call waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_response(&self, response: Result<DashboardData, BackendError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardBackend for ScriptedBackend {
    async fn get_dashboard_data(&self) -> Result<DashboardData, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.lock().unwrap().clone()
    }
}

/// Records every render call and returns a tiny SVG naming the canvas.
#[derive(Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<(Canvas, ChartConfig)>>,
    fail_on: Option<String>,
}

impl RecordingRenderer {
    pub fn failing_on(canvas_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(canvas_id.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<(Canvas, ChartConfig)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn canvas_ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|(canvas, _)| canvas.id).collect()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, canvas: &Canvas, config: &ChartConfig) -> Result<String, RenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((canvas.clone(), config.clone()));
        if self.fail_on.as_deref() == Some(canvas.id.as_str()) {
            return Err(RenderError::Drawing("scripted failure".to_string()));
        }
        Ok(format!("<svg id=\"{}\"/>", canvas.id))
    }
}

#[derive(Default)]
pub struct RecordingDispatcher {
    actions: Mutex<Vec<WindowAction>>,
}

impl RecordingDispatcher {
    pub fn actions(&self) -> Vec<WindowAction> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionDispatcher for RecordingDispatcher {
    async fn do_action(&self, action: &WindowAction) -> Result<ActionTarget, DispatchError> {
        self.actions.lock().unwrap().push(action.clone());
        Ok(ActionTarget {
            url: format!("/web#model={}", action.res_model),
        })
    }
}

/// A well-formed payload with every stat group filled in.
pub fn sample_dashboard() -> DashboardData {
    serde_json::from_value(serde_json::json!({
        "kpis": {
            "total_patients": 120,
            "total_doctors": 14,
            "appointments_today": 9,
            "total_revenue": 15230.75,
            "pending_lab_tests": 6
        },
        "patient_stats": {
            "gender": { "labels": ["Male", "Female", "Other"], "data": [64, 53, 3] },
            "age_groups": { "labels": ["0-17", "18-35", "36-60", "60+"], "data": [12, 40, 45, 23] }
        },
        "appointment_stats": {
            "by_status": { "labels": ["Draft", "Confirmed", "Done", "Cancelled"], "data": [3, 11, 30, 2] }
        },
        "revenue_stats": {
            "monthly_trend": { "labels": ["Jan", "Feb", "Mar"], "data": [4200.0, 5100.5, 5930.25] }
        },
        "doctor_stats": {
            "by_specialty": { "labels": ["Cardiology", "Pediatrics"], "data": [5, 9] }
        },
        "lab_test_stats": {
            "by_status": { "labels": ["Requested", "In Progress", "Done"], "data": [4, 2, 17] }
        }
    }))
    .unwrap()
}
