// Window actions - navigation requests into the host web client
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Record collections reachable from the dashboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Appointments,
    Billings,
    LabTests,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Patients,
        Collection::Appointments,
        Collection::Billings,
        Collection::LabTests,
    ];

    /// Backend model name
    pub fn res_model(self) -> &'static str {
        match self {
            Collection::Patients => "hospital.patient",
            Collection::Appointments => "hospital.appointment",
            Collection::Billings => "hospital.billing",
            Collection::LabTests => "hospital.lab.test",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Collection::Patients => "Patients",
            Collection::Appointments => "Appointments",
            Collection::Billings => "Billings",
            Collection::LabTests => "Lab Tests",
        }
    }

    /// URL path segment
    pub fn slug(self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Appointments => "appointments",
            Collection::Billings => "billings",
            Collection::LabTests => "lab-tests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.slug() == s || c.res_model() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Form,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Form => "form",
        }
    }
}

/// Serializes as `[false, "list"]`: no explicit view id, only the view type.
impl Serialize for ViewMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&false)?;
        tuple.serialize_element(self.as_str())?;
        tuple.end()
    }
}

/// An act_window request: open a collection in the current window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowAction {
    #[serde(rename = "type")]
    pub action_type: &'static str,
    pub name: &'static str,
    pub res_model: &'static str,
    pub views: Vec<ViewMode>,
    pub target: &'static str,
}

impl WindowAction {
    /// List view first, then the form view for a single record.
    pub fn list_then_form(collection: Collection) -> Self {
        Self {
            action_type: "ir.actions.act_window",
            name: collection.display_name(),
            res_model: collection.res_model(),
            views: vec![ViewMode::List, ViewMode::Form],
            target: "current",
        }
    }

    pub fn first_view(&self) -> Option<ViewMode> {
        self.views.first().copied()
    }
}
