// Dashboard controller - loads the snapshot, renders charts, dispatches navigation
use crate::application::action_dispatcher::{ActionDispatcher, ActionTarget, DispatchError};
use crate::application::chart_renderer::ChartRenderer;
use crate::application::dashboard_backend::{BackendError, DashboardBackend};
use crate::domain::action::{Collection, WindowAction};
use crate::domain::chart::{ChartConfig, DASHBOARD_CHARTS};
use crate::domain::dashboard::DashboardData;
use crate::domain::kpi::build_kpi_tiles;
use crate::domain::view_state::{MountedView, RenderedChart, ViewState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Owns the dashboard view state.
///
/// Collaborators are injected: the backend supplies data, the dispatcher opens
/// record lists, the renderer draws charts. State changes are published on a
/// `watch` channel. Charts are only drawn once the host view has signalled
/// that it is mounted, and again on every load after that.
pub struct DashboardController {
    backend: Arc<dyn DashboardBackend>,
    dispatcher: Arc<dyn ActionDispatcher>,
    renderer: Arc<dyn ChartRenderer>,
    state: watch::Sender<ViewState>,
    // Also serializes state rebuilds between load and mount.
    mounted: Mutex<Option<MountedView>>,
    load_lock: tokio::sync::Mutex<()>,
}

impl DashboardController {
    pub fn new(
        backend: Arc<dyn DashboardBackend>,
        dispatcher: Arc<dyn ActionDispatcher>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            backend,
            dispatcher,
            renderer,
            state,
            mounted: Mutex::new(None),
            load_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Load on first use; later calls return the current state as is.
    ///
    /// Concurrent first calls share one backend request: the pending check is
    /// repeated once the load lock is held.
    pub async fn activate(&self) -> ViewState {
        if self.is_pending() {
            let _guard = self.load_lock.lock().await;
            if self.is_pending() {
                if let Err(e) = self.fetch().await {
                    tracing::debug!("First dashboard load failed: {}", e);
                }
            }
        }
        self.snapshot()
    }

    /// Fetch a fresh snapshot and replace the view state with it.
    pub async fn load(&self) -> Result<(), DashboardError> {
        let _guard = self.load_lock.lock().await;
        self.fetch().await
    }

    fn is_pending(&self) -> bool {
        let state = self.state.borrow();
        !state.is_loaded() && state.error.is_none()
    }

    // Callers hold `load_lock`.
    async fn fetch(&self) -> Result<(), DashboardError> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.backend.get_dashboard_data().await {
            Ok(data) => {
                tracing::info!(
                    kpis = data.kpis.len(),
                    series = data.series().len(),
                    "Dashboard data loaded"
                );
                let mounted = self.lock_mounted();
                let state = self.build_state(data, mounted.as_ref());
                self.state.send_replace(state);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading dashboard data: {}", e);
                let _mounted = self.lock_mounted();
                self.state.send_replace(ViewState {
                    loading: false,
                    error: Some(format!("Dashboard data could not be loaded: {}", e)),
                    ..ViewState::default()
                });
                Err(e.into())
            }
        }
    }

    /// Signal that the host view is mounted with the given canvases.
    pub fn mount(&self, view: MountedView) {
        let mut mounted = self.lock_mounted();
        tracing::debug!(canvases = view.len(), "Dashboard view mounted");
        *mounted = Some(view);
        self.rebuild(mounted.as_ref());
    }

    pub fn is_mounted(&self) -> bool {
        self.lock_mounted().is_some()
    }

    pub async fn open_patients(&self) -> Result<ActionTarget, DashboardError> {
        self.open(Collection::Patients).await
    }

    pub async fn open_appointments(&self) -> Result<ActionTarget, DashboardError> {
        self.open(Collection::Appointments).await
    }

    pub async fn open_billings(&self) -> Result<ActionTarget, DashboardError> {
        self.open(Collection::Billings).await
    }

    pub async fn open_lab_tests(&self) -> Result<ActionTarget, DashboardError> {
        self.open(Collection::LabTests).await
    }

    async fn open(&self, collection: Collection) -> Result<ActionTarget, DashboardError> {
        let action = WindowAction::list_then_form(collection);
        tracing::info!(res_model = action.res_model, "Opening record list");
        Ok(self.dispatcher.do_action(&action).await?)
    }

    fn lock_mounted(&self) -> MutexGuard<'_, Option<MountedView>> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-derive charts for the data already held, if any.
    fn rebuild(&self, view: Option<&MountedView>) {
        let data = self.state.borrow().data.clone();
        match data {
            Some(data) => {
                let state = self.build_state(data, view);
                self.state.send_replace(state);
            }
            None => self.state.send_modify(|state| state.charts.clear()),
        }
    }

    fn build_state(&self, data: DashboardData, view: Option<&MountedView>) -> ViewState {
        let mut warnings: Vec<String> = data.validate().iter().map(ToString::to_string).collect();

        let (kpis, kpi_errors) = build_kpi_tiles(&data.kpis);
        warnings.extend(kpi_errors.iter().map(ToString::to_string));

        for warning in &warnings {
            tracing::warn!("Dashboard payload issue: {}", warning);
        }

        let charts = match view {
            Some(view) => self.render_charts(&data, view, &mut warnings),
            None => Vec::new(),
        };

        ViewState {
            loading: false,
            error: None,
            kpis,
            data: Some(data),
            charts,
            warnings,
        }
    }

    /// One pass over the chart catalogue. Missing series or canvases are skipped.
    fn render_charts(
        &self,
        data: &DashboardData,
        view: &MountedView,
        warnings: &mut Vec<String>,
    ) -> Vec<RenderedChart> {
        let mut charts = Vec::with_capacity(DASHBOARD_CHARTS.len());

        for spec in &DASHBOARD_CHARTS {
            let Some(series) = spec.source.select(data) else {
                tracing::debug!("No {} in payload, skipping {}", spec.source.path(), spec.canvas_id);
                continue;
            };
            // Already reported by validation.
            if series.validate(spec.source.path()).is_err() {
                continue;
            }
            let Some(canvas) = view.canvas(spec.canvas_id) else {
                tracing::debug!("Canvas {} not mounted, skipping", spec.canvas_id);
                continue;
            };

            let config = ChartConfig::build(spec, series);
            match self.renderer.render(canvas, &config) {
                Ok(svg) => charts.push(RenderedChart {
                    canvas_id: spec.canvas_id.to_string(),
                    title: spec.title.to_string(),
                    config,
                    svg,
                }),
                Err(e) => {
                    tracing::warn!("Failed to render {}: {}", spec.canvas_id, e);
                    warnings.push(format!("{}: {}", spec.canvas_id, e));
                }
            }
        }

        charts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        RecordingDispatcher, RecordingRenderer, ScriptedBackend, sample_dashboard,
    };
    use crate::domain::action::ViewMode;
    use crate::domain::chart::{ChartKind, SeriesSource};
    use crate::domain::dashboard::{ChartSeries, PatientStats};
    use crate::domain::view_state::Canvas;
    use std::time::Duration;

    struct Fixture {
        backend: Arc<ScriptedBackend>,
        renderer: Arc<RecordingRenderer>,
        dispatcher: Arc<RecordingDispatcher>,
        controller: DashboardController,
    }

    fn fixture(backend: ScriptedBackend) -> Fixture {
        fixture_with_renderer(backend, RecordingRenderer::default())
    }

    fn fixture_with_renderer(backend: ScriptedBackend, renderer: RecordingRenderer) -> Fixture {
        let backend = Arc::new(backend);
        let renderer = Arc::new(renderer);
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let controller =
            DashboardController::new(backend.clone(), dispatcher.clone(), renderer.clone());
        Fixture {
            backend,
            renderer,
            dispatcher,
            controller,
        }
    }

    fn full_view() -> MountedView {
        MountedView::new(
            DASHBOARD_CHARTS
                .iter()
                .map(|spec| Canvas::new(spec.canvas_id, 400, 300)),
        )
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));
        let state = f.controller.snapshot();

        assert!(state.loading);
        assert!(state.data.is_none());
        assert_eq!(f.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_render_calls_receive_series_verbatim() {
        let data = sample_dashboard();
        let f = fixture(ScriptedBackend::ok(data.clone()));

        f.controller.mount(full_view());
        f.controller.load().await.unwrap();

        let calls = f.renderer.calls();
        assert_eq!(calls.len(), 6);
        for (canvas, config) in &calls {
            let spec = DASHBOARD_CHARTS
                .iter()
                .find(|s| s.canvas_id == canvas.id)
                .unwrap();
            let series = spec.source.select(&data).unwrap();
            assert_eq!(config.kind, spec.kind);
            assert_eq!(config.labels(), series.labels.as_slice());
            assert_eq!(config.values(), series.data.as_slice());
            assert_eq!(config.labels().len(), config.values().len());
        }

        let state = f.controller.snapshot();
        assert!(state.is_loaded());
        assert_eq!(state.charts.len(), 6);
        assert!(state.warnings.is_empty());
        assert_eq!(state.kpis[0].key, "total_patients");
    }

    #[tokio::test]
    async fn test_backend_failure_clears_loading_and_renders_nothing() {
        let f = fixture(ScriptedBackend::failing(BackendError::Transport(
            "connection refused".to_string(),
        )));
        f.controller.mount(full_view());

        let result = f.controller.load().await;

        assert!(matches!(result, Err(DashboardError::Backend(_))));
        let state = f.controller.snapshot();
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.charts.is_empty());
        assert!(state.error.unwrap().contains("connection refused"));
        assert!(f.renderer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_drops_previous_snapshot() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));
        f.controller.mount(full_view());
        f.controller.load().await.unwrap();

        f.backend
            .set_response(Err(BackendError::Timeout(std::time::Duration::from_secs(30))));
        let _ = f.controller.load().await;

        let state = f.controller.snapshot();
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.kpis.is_empty());
        assert!(state.charts.is_empty());
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_missing_groups_are_skipped() {
        let mut data = DashboardData::default();
        data.patient_stats = Some(PatientStats {
            gender: Some(ChartSeries::new(["M", "F"], vec![10.0, 8.0])),
            age_groups: None,
        });
        let f = fixture(ScriptedBackend::ok(data));
        f.controller.mount(full_view());

        f.controller.load().await.unwrap();

        assert_eq!(f.renderer.canvas_ids(), vec!["patientGenderChart"]);
        let state = f.controller.snapshot();
        assert!(state.error.is_none());
        assert!(state.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_gender_example_renders_pie_with_palette() {
        let data: DashboardData = serde_json::from_str(
            r#"{"patient_stats":{"gender":{"labels":["M","F"],"data":[10,8]}}}"#,
        )
        .unwrap();
        let f = fixture(ScriptedBackend::ok(data));
        f.controller.mount(full_view());

        f.controller.load().await.unwrap();

        let calls = f.renderer.calls();
        assert_eq!(calls.len(), 1);
        let (canvas, config) = &calls[0];
        assert_eq!(canvas.id, "patientGenderChart");
        assert_eq!(config.kind, ChartKind::Pie);
        assert_eq!(config.labels(), ["M", "F"]);
        assert_eq!(config.values(), [10.0, 8.0]);
        assert_eq!(config.point_colors(), vec!["#4E73DF", "#E74A3B"]);
    }

    #[tokio::test]
    async fn test_missing_canvas_is_a_silent_skip() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));
        f.controller.mount(MountedView::new([
            Canvas::new("revenueTrendChart", 600, 300),
            Canvas::new("somethingElse", 100, 100),
        ]));

        f.controller.load().await.unwrap();

        assert_eq!(f.renderer.canvas_ids(), vec!["revenueTrendChart"]);
        let state = f.controller.snapshot();
        assert!(state.warnings.is_empty());
        assert_eq!(state.charts[0].svg, "<svg id=\"revenueTrendChart\"/>");
    }

    #[tokio::test]
    async fn test_mismatched_series_is_skipped_with_warning() {
        let mut data = sample_dashboard();
        data.lab_test_stats.as_mut().unwrap().by_status =
            Some(ChartSeries::new(["Requested", "Done"], vec![4.0]));
        let f = fixture(ScriptedBackend::ok(data));
        f.controller.mount(full_view());

        f.controller.load().await.unwrap();

        assert!(!f.renderer.canvas_ids().contains(&"labTestStatusChart".to_string()));
        assert_eq!(f.renderer.calls().len(), 5);
        let state = f.controller.snapshot();
        assert_eq!(state.warnings.len(), 1);
        assert!(state.warnings[0].contains(SeriesSource::LabTestStatus.path()));
    }

    #[tokio::test]
    async fn test_render_failure_skips_only_that_chart() {
        let f = fixture_with_renderer(
            ScriptedBackend::ok(sample_dashboard()),
            RecordingRenderer::failing_on("doctorSpecialtyChart"),
        );
        f.controller.mount(full_view());

        f.controller.load().await.unwrap();

        let state = f.controller.snapshot();
        assert_eq!(state.charts.len(), 5);
        assert!(state.chart("doctorSpecialtyChart").is_none());
        assert_eq!(state.warnings.len(), 1);
        assert!(state.warnings[0].starts_with("doctorSpecialtyChart"));
    }

    #[tokio::test]
    async fn test_no_render_before_mount() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));

        f.controller.load().await.unwrap();
        assert!(f.renderer.calls().is_empty());
        assert!(f.controller.snapshot().charts.is_empty());
        assert_eq!(f.controller.snapshot().kpis.len(), 5);

        f.controller.mount(full_view());
        assert_eq!(f.renderer.calls().len(), 6);
        assert_eq!(f.controller.snapshot().charts.len(), 6);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));
        f.controller.mount(full_view());

        f.controller.load().await.unwrap();
        let first = f.controller.snapshot();
        f.controller.load().await.unwrap();
        let second = f.controller.snapshot();

        assert_eq!(first, second);
        assert_eq!(second.charts.len(), 6);
        assert_eq!(f.backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_activate_loads_once() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));

        let state = f.controller.activate().await;
        assert!(state.is_loaded());
        f.controller.activate().await;

        assert_eq!(f.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_activations_share_one_request() {
        let f = fixture(
            ScriptedBackend::ok(sample_dashboard()).with_delay(Duration::from_millis(50)),
        );

        let (first, second) = tokio::join!(f.controller.activate(), f.controller.activate());

        assert_eq!(f.backend.calls(), 1);
        assert!(first.is_loaded());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_activate_after_failure_does_not_retry() {
        let f = fixture(ScriptedBackend::failing(BackendError::Transport(
            "connection refused".to_string(),
        )));

        let state = f.controller.activate().await;
        assert!(state.error.is_some());
        f.controller.activate().await;

        assert_eq!(f.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_series_skip_only_their_charts() {
        let data: DashboardData = serde_json::from_value(serde_json::json!({
            "kpis": { "total_patients": 12 },
            "patient_stats": {
                "gender": { "labels": ["M", "F"], "data": [10, 8] },
                "age_groups": { "labels": [false, "18-64"], "data": [1, 2] }
            },
            "revenue_stats": { "monthly_trend": { "labels": ["Jan", "Feb"], "data": [100, null] } },
            "doctor_stats": { "by_specialty": { "labels": ["Cardiology"], "data": [3] } },
            "lab_test_stats": false
        }))
        .unwrap();
        let f = fixture(ScriptedBackend::ok(data));
        f.controller.mount(full_view());

        f.controller.load().await.unwrap();

        assert_eq!(
            f.renderer.canvas_ids(),
            vec!["patientGenderChart", "doctorSpecialtyChart"]
        );
        let state = f.controller.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.kpis.len(), 1);
        assert_eq!(state.warnings.len(), 3);
        assert!(state.warnings.iter().any(|w| w.contains("revenue_stats.monthly_trend")));
        assert!(state.warnings.iter().any(|w| w.contains("lab_test_stats")));
    }

    #[tokio::test]
    async fn test_subscribers_see_loaded_state() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));
        let mut rx = f.controller.subscribe();

        f.controller.load().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_loaded());
    }

    #[tokio::test]
    async fn test_navigation_dispatches_one_action_each() {
        let f = fixture(ScriptedBackend::ok(sample_dashboard()));

        f.controller.open_patients().await.unwrap();
        f.controller.open_appointments().await.unwrap();
        f.controller.open_billings().await.unwrap();
        let target = f.controller.open_lab_tests().await.unwrap();

        let actions = f.dispatcher.actions();
        let models: Vec<&str> = actions.iter().map(|a| a.res_model).collect();
        assert_eq!(
            models,
            vec![
                "hospital.patient",
                "hospital.appointment",
                "hospital.billing",
                "hospital.lab.test"
            ]
        );
        for action in &actions {
            assert_eq!(action.action_type, "ir.actions.act_window");
            assert_eq!(action.views, vec![ViewMode::List, ViewMode::Form]);
            assert_eq!(action.target, "current");
        }
        assert_eq!(target.url, "/web#model=hospital.lab.test");
        assert_eq!(f.backend.calls(), 0);
    }
}
