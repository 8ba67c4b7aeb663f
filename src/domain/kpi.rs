// KPI tile domain model
use super::dashboard::PayloadError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Known KPI keys in display order: (key, title, precision).
const KNOWN_KPIS: [(&str, &str, usize); 9] = [
    ("total_patients", "Total Patients", 0),
    ("total_doctors", "Total Doctors", 0),
    ("appointments_today", "Today's Appointments", 0),
    ("appointments_period", "Appointments (Period)", 0),
    ("new_patients", "New Patients", 0),
    ("total_revenue", "Total Revenue", 2),
    ("total_paid", "Paid Amount", 2),
    ("total_pending", "Pending Amount", 2),
    ("pending_lab_tests", "Pending Lab Tests", 0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub key: String,
    pub title: String,
    pub value: f64,
    pub precision: usize,
}

impl KpiTile {
    pub fn new(key: String, title: String, value: f64, precision: usize) -> Self {
        Self {
            key,
            title,
            value,
            precision,
        }
    }

    pub fn formatted(&self) -> String {
        format!("{:.*}", self.precision, self.value)
    }
}

/// Turn the raw KPI mapping into ordered tiles.
///
/// Known keys come first in their fixed order, the rest follow by key.
/// Values that are not numbers are reported and left out.
pub fn build_kpi_tiles(kpis: &BTreeMap<String, Value>) -> (Vec<KpiTile>, Vec<PayloadError>) {
    let mut tiles = Vec::with_capacity(kpis.len());
    let mut errors = Vec::new();

    let mut push = |key: &str, title: String, precision: Option<usize>| {
        let Some(raw) = kpis.get(key) else {
            return;
        };
        match raw.as_f64() {
            Some(value) => {
                let precision = precision.unwrap_or(if value.fract() == 0.0 { 0 } else { 2 });
                tiles.push(KpiTile::new(key.to_string(), title, value, precision));
            }
            None => errors.push(PayloadError::NonNumericKpi {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    };

    for (key, title, precision) in KNOWN_KPIS {
        push(key, title.to_string(), Some(precision));
    }

    for key in kpis.keys() {
        if KNOWN_KPIS.iter().any(|(known, _, _)| *known == key.as_str()) {
            continue;
        }
        push(key, title_from_key(key), None);
    }

    (tiles, errors)
}

/// Convert "lab_tests_done" to "Lab Tests Done"
fn title_from_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
