// Chart domain models - the fixed chart catalogue and Chart.js-shaped configs
use super::dashboard::{ChartSeries, DashboardData};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Doughnut,
    Bar,
    Line,
}

/// Where in the dashboard payload a chart reads its series from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    PatientGender,
    PatientAgeGroups,
    AppointmentStatus,
    RevenueTrend,
    LabTestStatus,
    DoctorSpecialty,
}

impl SeriesSource {
    pub fn select(self, data: &DashboardData) -> Option<&ChartSeries> {
        match self {
            SeriesSource::PatientGender => data.patient_stats.as_ref()?.gender.as_ref(),
            SeriesSource::PatientAgeGroups => data.patient_stats.as_ref()?.age_groups.as_ref(),
            SeriesSource::AppointmentStatus => data.appointment_stats.as_ref()?.by_status.as_ref(),
            SeriesSource::RevenueTrend => data.revenue_stats.as_ref()?.monthly_trend.as_ref(),
            SeriesSource::LabTestStatus => data.lab_test_stats.as_ref()?.by_status.as_ref(),
            SeriesSource::DoctorSpecialty => data.doctor_stats.as_ref()?.by_specialty.as_ref(),
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            SeriesSource::PatientGender => "patient_stats.gender",
            SeriesSource::PatientAgeGroups => "patient_stats.age_groups",
            SeriesSource::AppointmentStatus => "appointment_stats.by_status",
            SeriesSource::RevenueTrend => "revenue_stats.monthly_trend",
            SeriesSource::LabTestStatus => "lab_test_stats.by_status",
            SeriesSource::DoctorSpecialty => "doctor_stats.by_specialty",
        }
    }
}

/// Static description of one dashboard chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub canvas_id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub source: SeriesSource,
    /// Slice colors for radial charts; the first entry is the series color otherwise.
    pub palette: &'static [&'static str],
    pub dataset_label: Option<&'static str>,
}

pub const DASHBOARD_CHARTS: [ChartSpec; 6] = [
    ChartSpec {
        canvas_id: "patientGenderChart",
        title: "Patients by Gender",
        kind: ChartKind::Pie,
        source: SeriesSource::PatientGender,
        palette: &["#4E73DF", "#E74A3B", "#F6C23E"],
        dataset_label: None,
    },
    ChartSpec {
        canvas_id: "patientAgeChart",
        title: "Patients by Age Group",
        kind: ChartKind::Bar,
        source: SeriesSource::PatientAgeGroups,
        palette: &["#36B9CC"],
        dataset_label: Some("Patients"),
    },
    ChartSpec {
        canvas_id: "appointmentStatusChart",
        title: "Appointments by Status",
        kind: ChartKind::Doughnut,
        source: SeriesSource::AppointmentStatus,
        palette: &[
            "#858796", "#4E73DF", "#1CC88A", "#F6C23E", "#36B9CC", "#E74A3B", "#5A5C69",
        ],
        dataset_label: None,
    },
    ChartSpec {
        canvas_id: "revenueTrendChart",
        title: "Monthly Revenue",
        kind: ChartKind::Line,
        source: SeriesSource::RevenueTrend,
        palette: &["#1CC88A"],
        dataset_label: Some("Revenue"),
    },
    ChartSpec {
        canvas_id: "labTestStatusChart",
        title: "Lab Tests by Status",
        kind: ChartKind::Bar,
        source: SeriesSource::LabTestStatus,
        palette: &["#6610f2"],
        dataset_label: Some("Tests"),
    },
    ChartSpec {
        canvas_id: "doctorSpecialtyChart",
        title: "Doctors by Specialty",
        kind: ChartKind::Pie,
        source: SeriesSource::DoctorSpecialty,
        palette: &["#e83e8c", "#fd7e14", "#20c997", "#17a2b8", "#6c757d"],
        dataset_label: None,
    },
];

/// A dataset color: one color for the whole series or a per-slice palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(String),
    Palette(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: Paint,
    pub border_color: String,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

impl Legend {
    pub fn is_visible(&self) -> bool {
        self.display.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
    pub plugins: Plugins,
}

/// Full chart description, serializable in the shape Chart.js accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    /// Build the fixed-shape config for a chart spec from its series.
    ///
    /// Labels and values are copied verbatim.
    pub fn build(spec: &ChartSpec, series: &ChartSeries) -> Self {
        let color = spec.palette.first().copied().unwrap_or("#4E73DF").to_string();
        let label = spec.dataset_label.map(str::to_string);

        let (dataset, options) = match spec.kind {
            ChartKind::Pie | ChartKind::Doughnut => (
                Dataset {
                    label: None,
                    data: series.data.clone(),
                    background_color: Paint::Palette(
                        spec.palette.iter().map(|c| c.to_string()).collect(),
                    ),
                    border_color: "#fff".to_string(),
                    border_width: 2,
                    fill: None,
                    tension: None,
                },
                ChartOptions {
                    responsive: true,
                    maintain_aspect_ratio: false,
                    scales: None,
                    plugins: Plugins {
                        legend: Legend {
                            position: Some(LegendPosition::Bottom),
                            display: None,
                        },
                    },
                },
            ),
            ChartKind::Bar => (
                Dataset {
                    label,
                    data: series.data.clone(),
                    background_color: Paint::Solid(color.clone()),
                    border_color: color,
                    border_width: 1,
                    fill: None,
                    tension: None,
                },
                Self::cartesian_options(),
            ),
            ChartKind::Line => (
                Dataset {
                    label,
                    data: series.data.clone(),
                    background_color: Paint::Solid(format!("{}33", color)),
                    border_color: color,
                    border_width: 2,
                    fill: Some(true),
                    tension: Some(0.4),
                },
                Self::cartesian_options(),
            ),
        };

        Self {
            kind: spec.kind,
            data: ChartData {
                labels: series.labels.clone(),
                datasets: vec![dataset],
            },
            options,
        }
    }

    fn cartesian_options() -> ChartOptions {
        ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            scales: Some(Scales {
                y: Axis { begin_at_zero: true },
            }),
            plugins: Plugins {
                legend: Legend {
                    position: None,
                    display: Some(false),
                },
            },
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    pub fn values(&self) -> &[f64] {
        self.data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    /// Color used for each data point, palette entries taken in order and
    /// cycled when there are more points than colors.
    pub fn point_colors(&self) -> Vec<String> {
        let Some(dataset) = self.data.datasets.first() else {
            return Vec::new();
        };
        match &dataset.background_color {
            Paint::Palette(colors) if !colors.is_empty() => (0..dataset.data.len())
                .map(|i| colors[i % colors.len()].clone())
                .collect(),
            Paint::Palette(_) => Vec::new(),
            Paint::Solid(color) => vec![color.clone(); dataset.data.len()],
        }
    }
}
