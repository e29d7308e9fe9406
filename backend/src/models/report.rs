//! Categorical counts and individual adverse-event reports.

use serde::{Deserialize, Serialize};

/// Number of reports carrying one value of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

impl TermCount {
    pub fn new(term: impl Into<String>, count: u64) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

/// Device entry of a report. Only the fields used for filtering are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub manufacturer_d_name: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
}

/// One narrative block of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdrText {
    #[serde(default)]
    pub text_type_code: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// An adverse-event report as the search endpoint returns it, reduced to
/// the fields the dashboard reads. Every field may be absent upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReport {
    /// `YYYYMMDD`
    #[serde(default)]
    pub date_received: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_location: Option<String>,
    #[serde(default)]
    pub reporter_occupation_code: Option<String>,
    #[serde(default)]
    pub device: Vec<DeviceInfo>,
    #[serde(default)]
    pub mdr_text: Vec<MdrText>,
}

impl EventReport {
    pub fn has_mdr_text(&self) -> bool {
        !self.mdr_text.is_empty()
    }

    /// Whether any device entry matches both names, ignoring case and
    /// surrounding whitespace.
    pub fn matches_device(&self, manufacturer: &str, generic_name: &str) -> bool {
        let same = |field: &Option<String>, wanted: &str| {
            field
                .as_deref()
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(wanted.trim()))
        };
        self.device
            .iter()
            .any(|d| same(&d.manufacturer_d_name, manufacturer) && same(&d.generic_name, generic_name))
    }
}

/// Table row shown for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub reporter: Option<String>,
    pub has_mdr_text: bool,
}

impl From<&EventReport> for ReportRow {
    fn from(report: &EventReport) -> Self {
        Self {
            event_type: report.event_type.clone(),
            location: report.event_location.clone(),
            reporter: report.reporter_occupation_code.clone(),
            has_mdr_text: report.has_mdr_text(),
        }
    }
}
