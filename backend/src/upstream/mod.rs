//! Input adapter for the upstream adverse-event report API.
//!
//! Builds count, term-count and record queries, decodes responses into
//! [`RawSeries`] values, term counts and reports, and abstracts the fetch
//! behind the [`ReportSource`] trait:
//!
//! - [`OpenFdaClient`]: live HTTP implementation (reqwest)
//! - [`StaticReportSource`]: in-memory implementation for tests and offline runs
//!
//! Retry, backoff and response caching are left to callers.
//!
//! [`RawSeries`]: crate::models::RawSeries

pub mod client;
pub mod error;
pub mod query;
pub mod response;
pub mod source;

pub use client::OpenFdaClient;
pub use error::{UpstreamError, UpstreamResult};
pub use query::{
    cap_limit, CountQuery, DateField, RecordQuery, TermCountQuery, TermField, YearRange,
    DEFAULT_RECORD_LIMIT, MAX_COUNT_LIMIT,
};
pub use response::{decode_counts, decode_reports, decode_term_counts, HistogramItem};
pub use source::{ReportSource, StaticReportSource};
