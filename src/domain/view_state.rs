// View state - what the dashboard currently shows
use super::chart::ChartConfig;
use super::dashboard::DashboardData;
use super::kpi::KpiTile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named drawing area provided by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// The canvases present once the host page is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountedView {
    canvases: HashMap<String, Canvas>,
}

impl MountedView {
    pub fn new(canvases: impl IntoIterator<Item = Canvas>) -> Self {
        Self {
            canvases: canvases.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.get(id)
    }

    pub fn len(&self) -> usize {
        self.canvases.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub canvas_id: String,
    pub title: String,
    pub config: ChartConfig,
    pub svg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<String>,
    pub kpis: Vec<KpiTile>,
    pub data: Option<DashboardData>,
    pub charts: Vec<RenderedChart>,
    pub warnings: Vec<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            kpis: Vec::new(),
            data: None,
            charts: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ViewState {
    pub fn is_loaded(&self) -> bool {
        !self.loading && self.data.is_some()
    }

    pub fn chart(&self, canvas_id: &str) -> Option<&RenderedChart> {
        self.charts.iter().find(|c| c.canvas_id == canvas_id)
    }
}
