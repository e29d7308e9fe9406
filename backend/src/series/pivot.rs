use chrono::Datelike;

use crate::models::{DistributionColumn, DistributionTable, Granularity, RawSeries, MONTH_NAMES};

use super::aggregate;

/// Reshape a series into one column per calendar month.
///
/// The series is resampled monthly (zero-filled) and each month's count is
/// appended to the column for its calendar month, so a column lists one
/// entry per year in which that month falls inside the span, oldest first.
/// Spans that do not cover whole years give columns of different lengths.
/// The table always carries all twelve months, January first.
pub fn pivot(series: &RawSeries) -> DistributionTable {
    let monthly = aggregate(series, Granularity::Month);

    let mut columns: Vec<DistributionColumn> = MONTH_NAMES
        .iter()
        .map(|month| DistributionColumn {
            month: month.to_string(),
            counts: Vec::new(),
        })
        .collect();

    for bucket in monthly.buckets() {
        let index = bucket.period.start().month0() as usize;
        columns[index].counts.push(bucket.count);
    }

    DistributionTable::new(columns)
}
