//! Error types for the series pipeline.

use chrono::NaiveDate;

use crate::models::Granularity;

/// Result type for series operations
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Error type for series construction and transformation.
///
/// An empty input is not an error: every stage returns an empty value and
/// logs a warning instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// An upstream term could not be read as a calendar date.
    #[error("Parse error: cannot read '{term}' as a date ({reason})")]
    Parse { term: String, reason: String },

    /// The same date was observed twice in one raw series.
    #[error("Duplicate timestamp: {date} appears more than once")]
    DuplicateTimestamp { date: NaiveDate },

    /// The same label appears twice in one ordered series.
    #[error("Duplicate label: '{label}' appears more than once")]
    DuplicateLabel { label: String },

    /// A label has no place in the calendar order of its granularity.
    #[error("Unknown label: '{label}' is not a {granularity} label")]
    UnknownLabel {
        label: String,
        granularity: Granularity,
    },

    /// A period start that is not the first day of its bucket.
    #[error("Misaligned period: {start} does not start a {granularity}")]
    MisalignedPeriod {
        start: NaiveDate,
        granularity: Granularity,
    },

    /// Buckets of an aggregated series skip or repeat a period.
    #[error("Non-contiguous buckets: expected '{expected}', found '{found}'")]
    NotContiguous { expected: String, found: String },

    /// A distribution table lacks a calendar month column.
    #[error("Missing month column: '{month}'")]
    MissingMonth { month: String },

    /// Two series of different granularities cannot share a label column.
    #[error("Granularity mismatch: cannot merge {left} series with {right} series")]
    GranularityMismatch {
        left: Granularity,
        right: Granularity,
    },
}
