// Dashboard domain model - the snapshot returned by get_dashboard_data
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Problems found while validating a backend payload.
///
/// These never fail a whole load: the affected chart or KPI is skipped and the
/// message is surfaced as a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("series {series} has {labels} labels but {values} values")]
    LengthMismatch {
        series: String,
        labels: usize,
        values: usize,
    },
    #[error("series {series} is malformed: {reason}")]
    MalformedSeries { series: String, reason: String },
    #[error("{group} should be an object but is {found}")]
    MalformedGroup { group: String, found: &'static str },
    #[error("kpi {key} is not a number: {value}")]
    NonNumericKpi { key: String, value: String },
}

/// One chart-ready series: labels and values in matching order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl ChartSeries {
    pub fn new<L: Into<String>>(labels: impl IntoIterator<Item = L>, data: Vec<f64>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            data,
        }
    }

    /// Reads one series from raw JSON. `null` means the series is absent.
    ///
    /// Labels must be strings and values numbers; missing arrays are empty.
    pub fn from_json(name: &str, raw: Value) -> Result<Option<Self>, PayloadError> {
        let malformed = |reason: String| PayloadError::MalformedSeries {
            series: name.to_string(),
            reason,
        };

        let mut fields = match raw {
            Value::Null => return Ok(None),
            Value::Object(fields) => fields,
            other => return Err(malformed(format!("expected an object, found {}", json_kind(&other)))),
        };

        let labels = json_array(&mut fields, "labels")
            .map_err(|found| malformed(format!("labels should be an array but is {}", found)))?
            .into_iter()
            .enumerate()
            .map(|(i, label)| match label {
                Value::String(label) => Ok(label),
                other => Err(malformed(format!("label {} is {}", i, json_kind(&other)))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = json_array(&mut fields, "data")
            .map_err(|found| malformed(format!("data should be an array but is {}", found)))?
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    .as_f64()
                    .ok_or_else(|| malformed(format!("value {} is {}", i, json_kind(&value))))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Self::new(labels, data)))
    }

    /// Labels and values must pair up one-to-one.
    pub fn validate(&self, name: &str) -> Result<(), PayloadError> {
        if self.labels.len() != self.data.len() {
            return Err(PayloadError::LengthMismatch {
                series: name.to_string(),
                labels: self.labels.len(),
                values: self.data.len(),
            });
        }
        Ok(())
    }
}

fn json_array(fields: &mut Map<String, Value>, key: &str) -> Result<Vec<Value>, &'static str> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(json_kind(&other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientStats {
    pub gender: Option<ChartSeries>,
    pub age_groups: Option<ChartSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentStats {
    pub by_status: Option<ChartSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueStats {
    pub monthly_trend: Option<ChartSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoctorStats {
    pub by_specialty: Option<ChartSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabTestStats {
    pub by_status: Option<ChartSeries>,
}

/// Pre-aggregated dashboard snapshot as produced by the backend.
///
/// Every stat group and every series inside it may be missing. Decoding never
/// fails on content: a malformed group or series is dropped and recorded in
/// `rejected`, and KPI values stay raw JSON until tiles are built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDashboardData")]
pub struct DashboardData {
    pub kpis: BTreeMap<String, Value>,
    pub patient_stats: Option<PatientStats>,
    pub appointment_stats: Option<AppointmentStats>,
    pub revenue_stats: Option<RevenueStats>,
    pub doctor_stats: Option<DoctorStats>,
    pub lab_test_stats: Option<LabTestStats>,
    #[serde(skip)]
    pub rejected: Vec<PayloadError>,
}

/// Wire shape before per-group checks.
#[derive(Deserialize)]
struct RawDashboardData {
    #[serde(default)]
    kpis: Value,
    #[serde(default)]
    patient_stats: Value,
    #[serde(default)]
    appointment_stats: Value,
    #[serde(default)]
    revenue_stats: Value,
    #[serde(default)]
    doctor_stats: Value,
    #[serde(default)]
    lab_test_stats: Value,
}

/// Unpacks raw groups, collecting every problem instead of stopping at the first.
struct PayloadReader {
    rejected: Vec<PayloadError>,
}

impl PayloadReader {
    fn group(&mut self, name: &str, raw: Value) -> Option<Map<String, Value>> {
        match raw {
            Value::Null => None,
            Value::Object(fields) => Some(fields),
            other => {
                self.rejected.push(PayloadError::MalformedGroup {
                    group: name.to_string(),
                    found: json_kind(&other),
                });
                None
            }
        }
    }

    fn series(&mut self, group: &mut Map<String, Value>, path: &str, key: &str) -> Option<ChartSeries> {
        let raw = group.remove(key)?;
        match ChartSeries::from_json(&format!("{}.{}", path, key), raw) {
            Ok(series) => series,
            Err(e) => {
                self.rejected.push(e);
                None
            }
        }
    }
}

impl From<RawDashboardData> for DashboardData {
    fn from(raw: RawDashboardData) -> Self {
        let mut reader = PayloadReader {
            rejected: Vec::new(),
        };

        let kpis: BTreeMap<String, Value> = reader
            .group("kpis", raw.kpis)
            .map(|fields| fields.into_iter().collect())
            .unwrap_or_default();

        let patient_stats = reader.group("patient_stats", raw.patient_stats).map(|mut g| PatientStats {
            gender: reader.series(&mut g, "patient_stats", "gender"),
            age_groups: reader.series(&mut g, "patient_stats", "age_groups"),
        });
        let appointment_stats = reader.group("appointment_stats", raw.appointment_stats).map(|mut g| AppointmentStats {
            by_status: reader.series(&mut g, "appointment_stats", "by_status"),
        });
        let revenue_stats = reader.group("revenue_stats", raw.revenue_stats).map(|mut g| RevenueStats {
            monthly_trend: reader.series(&mut g, "revenue_stats", "monthly_trend"),
        });
        let doctor_stats = reader.group("doctor_stats", raw.doctor_stats).map(|mut g| DoctorStats {
            by_specialty: reader.series(&mut g, "doctor_stats", "by_specialty"),
        });
        let lab_test_stats = reader.group("lab_test_stats", raw.lab_test_stats).map(|mut g| LabTestStats {
            by_status: reader.series(&mut g, "lab_test_stats", "by_status"),
        });

        Self {
            kpis,
            patient_stats,
            appointment_stats,
            revenue_stats,
            doctor_stats,
            lab_test_stats,
            rejected: reader.rejected,
        }
    }
}

impl DashboardData {
    /// All series present in the payload, named by their wire path.
    pub fn series(&self) -> Vec<(&'static str, &ChartSeries)> {
        let mut found = Vec::new();
        if let Some(stats) = &self.patient_stats {
            if let Some(s) = &stats.gender {
                found.push(("patient_stats.gender", s));
            }
            if let Some(s) = &stats.age_groups {
                found.push(("patient_stats.age_groups", s));
            }
        }
        if let Some(s) = self.appointment_stats.as_ref().and_then(|g| g.by_status.as_ref()) {
            found.push(("appointment_stats.by_status", s));
        }
        if let Some(s) = self.revenue_stats.as_ref().and_then(|g| g.monthly_trend.as_ref()) {
            found.push(("revenue_stats.monthly_trend", s));
        }
        if let Some(s) = self.doctor_stats.as_ref().and_then(|g| g.by_specialty.as_ref()) {
            found.push(("doctor_stats.by_specialty", s));
        }
        if let Some(s) = self.lab_test_stats.as_ref().and_then(|g| g.by_status.as_ref()) {
            found.push(("lab_test_stats.by_status", s));
        }
        found
    }

    /// Everything dropped while decoding, then one error per mismatched series.
    pub fn validate(&self) -> Vec<PayloadError> {
        let mismatched = self
            .series()
            .into_iter()
            .filter_map(|(name, series)| series.validate(name).err());
        self.rejected.iter().cloned().chain(mismatched).collect()
    }
}
