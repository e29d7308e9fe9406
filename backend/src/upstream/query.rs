//! Query construction for the device event endpoint.
//!
//! Search clauses are written with plain spaces (`[a TO b]`, `x AND y`); the
//! URL builder form-encodes them, so spaces travel as `+` the way the API
//! expects and user-supplied values cannot break out of their parameter.

use chrono::{Datelike, NaiveDate};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{UpstreamError, UpstreamResult};
use crate::config::UpstreamSettings;

/// Largest `limit` the API accepts on a count query.
pub const MAX_COUNT_LIMIT: u32 = 1000;

/// Number of reports listed when the caller does not ask for a limit.
pub const DEFAULT_RECORD_LIMIT: u32 = 100;

/// Clamp a requested limit into the range the API accepts.
///
/// A limit of 0, or one past the cap, makes the API answer with an error
/// status, so both ends are corrected client-side.
pub fn cap_limit(requested: u32) -> u32 {
    requested.clamp(1, MAX_COUNT_LIMIT)
}

/// Date fields of an adverse-event report that can be counted by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// When the adverse event happened.
    DateOfEvent,
    /// When the report reached the agency.
    DateReceived,
}

impl DateField {
    /// Field name as used in search and count parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateField::DateOfEvent => "date_of_event",
            DateField::DateReceived => "date_received",
        }
    }

    /// Series name shown next to the chart line.
    pub fn display_name(&self) -> &'static str {
        match self {
            DateField::DateOfEvent => "Onset of the adverse event",
            DateField::DateReceived => "Report received by FDA",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical report fields counted by term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermField {
    /// Death, injury, malfunction, ...
    EventType,
    /// Regulatory class of the device (1, 2, 3, ...).
    DeviceClass,
}

impl TermField {
    pub const ALL: [TermField; 2] = [TermField::EventType, TermField::DeviceClass];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermField::EventType => "event_type",
            TermField::DeviceClass => "device.openfda.device_class",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TermField::EventType => "Adverse Event Type",
            TermField::DeviceClass => "Medical Device Class",
        }
    }
}

impl fmt::Display for TermField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range of calendar years, from January 1st of `begin` to
/// December 31st of `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "YearRangeRepr")]
pub struct YearRange {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

#[derive(Deserialize)]
struct YearRangeRepr {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl TryFrom<YearRangeRepr> for YearRange {
    type Error = UpstreamError;

    fn try_from(repr: YearRangeRepr) -> UpstreamResult<Self> {
        let range = Self::new(repr.first_day.year(), repr.last_day.year())?;
        if range.first_day != repr.first_day || range.last_day != repr.last_day {
            return Err(UpstreamError::InvalidQuery(format!(
                "year range must run from January 1st to December 31st, got {} to {}",
                repr.first_day, repr.last_day
            )));
        }
        Ok(range)
    }
}

impl YearRange {
    pub fn new(begin: i32, end: i32) -> UpstreamResult<Self> {
        if begin > end {
            return Err(UpstreamError::InvalidQuery(format!(
                "year range begins after it ends ({} > {})",
                begin, end
            )));
        }
        let first_day = NaiveDate::from_ymd_opt(begin, 1, 1)
            .ok_or_else(|| UpstreamError::InvalidQuery(format!("year {} out of range", begin)))?;
        let last_day = NaiveDate::from_ymd_opt(end, 12, 31)
            .ok_or_else(|| UpstreamError::InvalidQuery(format!("year {} out of range", end)))?;
        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The `span` years before `today`'s year, through `today`'s year.
    pub fn trailing(today: NaiveDate, span: u32) -> UpstreamResult<Self> {
        let span = i32::try_from(span)
            .map_err(|_| UpstreamError::InvalidQuery(format!("year span {} too large", span)))?;
        Self::new(today.year().saturating_sub(span), today.year())
    }

    pub fn begin(&self) -> i32 {
        self.first_day.year()
    }

    pub fn end(&self) -> i32 {
        self.last_day.year()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// `field:[YYYY-MM-DD TO YYYY-MM-DD]`
    fn clause(&self, field: &str) -> String {
        format!(
            "{}:[{} TO {}]",
            field,
            self.first_day.format("%Y-%m-%d"),
            self.last_day.format("%Y-%m-%d")
        )
    }
}

/// Endpoint URL with the API key (when configured) followed by `params`.
fn endpoint_url(settings: &UpstreamSettings, params: &[(&str, String)]) -> UpstreamResult<Url> {
    let mut url = Url::parse(&format!("{}{}", settings.base_url, settings.endpoint))
        .map_err(|e| UpstreamError::Endpoint(format!("{}{}: {}", settings.base_url, settings.endpoint, e)))?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(key) = settings.api_key.as_deref() {
            pairs.append_pair("api_key", key);
        }
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// A search value for an exact-field match, quoted when it holds spaces.
fn search_value(value: &str) -> String {
    let cleaned: String = value.trim().chars().filter(|c| *c != '"').collect();
    if cleaned.chars().any(char::is_whitespace) {
        format!("\"{}\"", cleaned)
    } else {
        cleaned
    }
}

/// A histogram query counting reports per day of one date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub field: DateField,
    pub range: YearRange,
    limit: Option<u32>,
}

impl CountQuery {
    pub fn new(field: DateField, range: YearRange) -> Self {
        Self {
            field,
            range,
            limit: None,
        }
    }

    /// Request at most `limit` terms; the value is capped to what the API accepts.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(cap_limit(limit));
        self
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// The `search` parameter value, e.g. `date_received:[2015-01-01 TO 2020-12-31]`.
    pub fn search_clause(&self) -> String {
        self.range.clause(self.field.as_str())
    }

    /// Full request URL, including the API key when one is configured.
    pub fn url(&self, settings: &UpstreamSettings) -> UpstreamResult<Url> {
        let mut params = vec![
            ("search", self.search_clause()),
            ("count", self.field.as_str().to_string()),
        ];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        endpoint_url(settings, &params)
    }
}

/// A histogram of one categorical field over reports received in a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCountQuery {
    pub field: TermField,
    pub range: YearRange,
    limit: Option<u32>,
}

impl TermCountQuery {
    pub fn new(field: TermField, range: YearRange) -> Self {
        Self {
            field,
            range,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(cap_limit(limit));
        self
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn search_clause(&self) -> String {
        self.range.clause(DateField::DateReceived.as_str())
    }

    pub fn url(&self, settings: &UpstreamSettings) -> UpstreamResult<Url> {
        let mut params = vec![
            ("search", self.search_clause()),
            ("count", self.field.as_str().to_string()),
        ];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        endpoint_url(settings, &params)
    }
}

/// A listing of reports received in a range for one manufacturer and device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub range: YearRange,
    pub manufacturer: String,
    pub device: String,
    limit: u32,
}

impl RecordQuery {
    /// Both filters are required; blank values are rejected.
    pub fn new(
        range: YearRange,
        manufacturer: impl Into<String>,
        device: impl Into<String>,
    ) -> UpstreamResult<Self> {
        let manufacturer = manufacturer.into();
        let device = device.into();
        if search_value(&manufacturer).trim_matches('"').is_empty() {
            return Err(UpstreamError::InvalidQuery("manufacturer must not be blank".to_string()));
        }
        if search_value(&device).trim_matches('"').is_empty() {
            return Err(UpstreamError::InvalidQuery("device must not be blank".to_string()));
        }
        Ok(Self {
            range,
            manufacturer,
            device,
            limit: DEFAULT_RECORD_LIMIT,
        })
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = cap_limit(limit);
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// e.g. `date_received:[2019-01-01 TO 2020-12-31] AND device.manufacturer_d_name:COVIDIEN AND device.generic_name:"infusion pump"`
    pub fn search_clause(&self) -> String {
        format!(
            "{} AND device.manufacturer_d_name:{} AND device.generic_name:{}",
            self.range.clause(DateField::DateReceived.as_str()),
            search_value(&self.manufacturer),
            search_value(&self.device)
        )
    }

    pub fn url(&self, settings: &UpstreamSettings) -> UpstreamResult<Url> {
        endpoint_url(
            settings,
            &[
                ("search", self.search_clause()),
                ("limit", self.limit.to_string()),
                ("skip", "0".to_string()),
            ],
        )
    }
}
