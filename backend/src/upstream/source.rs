//! Report source trait and its in-memory implementation.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::query::{CountQuery, DateField, RecordQuery, TermCountQuery, TermField};
use super::{UpstreamError, UpstreamResult};
use crate::models::{parse_term, EventReport, RawSeries, TermCount};

/// Anything that can answer the dashboard's queries against the report API.
///
/// "No matching records" must come back as an empty value, never as an
/// error, so callers can render an empty chart or table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch the per-day counts of `query.field` within `query.range`.
    async fn fetch_counts(&self, query: &CountQuery) -> UpstreamResult<RawSeries>;

    /// Fetch report counts per value of a categorical field.
    async fn fetch_term_counts(&self, query: &TermCountQuery) -> UpstreamResult<Vec<TermCount>>;

    /// Fetch up to `query.limit()` reports matching the record filters.
    async fn fetch_reports(&self, query: &RecordQuery) -> UpstreamResult<Vec<EventReport>>;
}

/// In-memory report source.
///
/// Holds one raw series per date field, term counts per categorical field
/// and a list of reports. Series and reports are clipped to the requested
/// range; term counts are served as stored. Used by tests and for running
/// the server offline.
///
/// # Example
/// ```
/// use maude_trends::models::RawSeries;
/// use maude_trends::upstream::{DateField, StaticReportSource};
///
/// let source = StaticReportSource::new();
/// source.insert(
///     DateField::DateReceived,
///     RawSeries::from_terms(vec![("20200101", 3)]).unwrap(),
/// );
/// ```
#[derive(Clone, Default)]
pub struct StaticReportSource {
    data: Arc<RwLock<StaticData>>,
}

#[derive(Default)]
struct StaticData {
    series: HashMap<DateField, RawSeries>,
    terms: HashMap<TermField, Vec<TermCount>>,
    reports: Vec<EventReport>,
    failure: Option<(u16, String)>,
}

impl StaticData {
    fn check_failure(&self) -> UpstreamResult<()> {
        match &self.failure {
            Some((status, message)) => Err(UpstreamError::Status {
                status: *status,
                code: None,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl StaticReportSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StaticReportSource::insert`].
    pub fn with_series(self, field: DateField, series: RawSeries) -> Self {
        self.insert(field, series);
        self
    }

    /// Builder form of [`StaticReportSource::insert_terms`].
    pub fn with_terms(self, field: TermField, terms: Vec<TermCount>) -> Self {
        self.insert_terms(field, terms);
        self
    }

    /// Builder form of [`StaticReportSource::insert_reports`].
    pub fn with_reports(self, reports: Vec<EventReport>) -> Self {
        self.insert_reports(reports);
        self
    }

    /// Replace the stored series for `field`.
    pub fn insert(&self, field: DateField, series: RawSeries) {
        self.data.write().series.insert(field, series);
    }

    /// Replace the stored term counts for `field`.
    pub fn insert_terms(&self, field: TermField, terms: Vec<TermCount>) {
        self.data.write().terms.insert(field, terms);
    }

    /// Add reports to the stored list.
    pub fn insert_reports(&self, reports: Vec<EventReport>) {
        self.data.write().reports.extend(reports);
    }

    /// Make every following fetch fail with the given status, or clear the failure.
    pub fn set_failure(&self, failure: Option<(u16, String)>) {
        self.data.write().failure = failure;
    }
}

#[async_trait]
impl ReportSource for StaticReportSource {
    async fn fetch_counts(&self, query: &CountQuery) -> UpstreamResult<RawSeries> {
        let data = self.data.read();
        data.check_failure()?;

        Ok(data
            .series
            .get(&query.field)
            .map(|s| s.within(query.range.first_day(), query.range.last_day()))
            .unwrap_or_default())
    }

    async fn fetch_term_counts(&self, query: &TermCountQuery) -> UpstreamResult<Vec<TermCount>> {
        let data = self.data.read();
        data.check_failure()?;

        let mut terms = data.terms.get(&query.field).cloned().unwrap_or_default();
        if let Some(limit) = query.limit() {
            terms.truncate(limit as usize);
        }
        Ok(terms)
    }

    async fn fetch_reports(&self, query: &RecordQuery) -> UpstreamResult<Vec<EventReport>> {
        let data = self.data.read();
        data.check_failure()?;

        Ok(data
            .reports
            .iter()
            .filter(|r| {
                r.date_received
                    .as_deref()
                    .and_then(|d| parse_term(d).ok())
                    .is_some_and(|d| query.range.contains(d))
            })
            .filter(|r| r.matches_device(&query.manufacturer, &query.device))
            .take(query.limit() as usize)
            .cloned()
            .collect())
    }
}
