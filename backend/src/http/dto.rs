//! Data Transfer Objects for the HTTP API.
//!
//! Chart payloads are the service-layer types, which already derive
//! Serialize/Deserialize; only request and envelope types live here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::services::breakdowns::{BreakdownData, TermBreakdown, TermShare};
pub use crate::services::distributions::{DistributionData, DistributionStats, MonthDistribution};
pub use crate::services::records::RecordsData;
pub use crate::services::trends::TrendsData;

use crate::upstream::{RecordQuery, UpstreamResult, YearRange};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query parameters selecting the year range of a dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct YearRangeQuery {
    /// First year of the range (inclusive)
    #[serde(default)]
    pub year_begin: Option<i32>,
    /// Last year of the range (inclusive)
    #[serde(default)]
    pub year_end: Option<i32>,
}

impl YearRangeQuery {
    /// Resolve into a concrete range, filling gaps from the trailing default.
    pub fn resolve(&self, today: NaiveDate, default_span: u32) -> UpstreamResult<YearRange> {
        let fallback = YearRange::trailing(today, default_span)?;
        YearRange::new(
            self.year_begin.unwrap_or(fallback.begin()),
            self.year_end.unwrap_or(fallback.end()),
        )
    }
}

/// Query parameters of the report listing.
///
/// The filters are optional at the extractor level so a missing one is
/// reported through the API's own error body.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordsQuery {
    #[serde(default)]
    pub year_begin: Option<i32>,
    #[serde(default)]
    pub year_end: Option<i32>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    /// Capped at the API's maximum page size.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl RecordsQuery {
    pub fn range(&self) -> YearRangeQuery {
        YearRangeQuery {
            year_begin: self.year_begin,
            year_end: self.year_end,
        }
    }

    pub fn resolve(&self, today: NaiveDate, default_span: u32) -> UpstreamResult<RecordQuery> {
        let range = self.range().resolve(today, default_span)?;
        let query = RecordQuery::new(
            range,
            self.manufacturer.clone().unwrap_or_default(),
            self.device.clone().unwrap_or_default(),
        )?;
        Ok(match self.limit {
            Some(limit) => query.with_limit(limit),
            None => query,
        })
    }
}
