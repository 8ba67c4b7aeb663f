// Server-rendered dashboard page
use crate::domain::action::Collection;
use crate::domain::chart::DASHBOARD_CHARTS;
use crate::domain::view_state::ViewState;
use askama::Template;

pub struct KpiView {
    pub key: String,
    pub title: String,
    pub value: String,
}

/// One slot per catalogue chart, so the page always carries every canvas id.
pub struct ChartSlot {
    pub canvas_id: &'static str,
    pub title: &'static str,
    pub rendered: bool,
    pub svg: String,
}

pub struct Shortcut {
    pub label: &'static str,
    pub href: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub loading: bool,
    pub has_error: bool,
    pub error: String,
    pub kpis: Vec<KpiView>,
    pub charts: Vec<ChartSlot>,
    pub shortcuts: Vec<Shortcut>,
    pub has_warnings: bool,
    pub warnings: Vec<String>,
}

impl DashboardPage {
    pub fn from_state(state: &ViewState) -> Self {
        let kpis = state
            .kpis
            .iter()
            .map(|tile| KpiView {
                key: tile.key.clone(),
                title: tile.title.clone(),
                value: tile.formatted(),
            })
            .collect();

        let charts = DASHBOARD_CHARTS
            .iter()
            .map(|spec| {
                let rendered = state.chart(spec.canvas_id);
                ChartSlot {
                    canvas_id: spec.canvas_id,
                    title: spec.title,
                    rendered: rendered.is_some(),
                    svg: rendered.map(|c| c.svg.clone()).unwrap_or_default(),
                }
            })
            .collect();

        let shortcuts = Collection::ALL
            .into_iter()
            .map(|collection| Shortcut {
                label: collection.display_name(),
                href: format!("/open/{}", collection.slug()),
            })
            .collect();

        Self {
            loading: state.loading,
            has_error: state.error.is_some(),
            error: state.error.clone().unwrap_or_default(),
            kpis,
            charts,
            shortcuts,
            has_warnings: !state.warnings.is_empty(),
            warnings: state.warnings.clone(),
        }
    }
}
