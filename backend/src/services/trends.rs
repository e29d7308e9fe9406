use log::info;
use serde::{Deserialize, Serialize};

use super::error::ServiceResult;
use crate::models::{Granularity, MergedSeries, RawSeries};
use crate::series::{aggregate, chronological, merge, order, ordering, SeriesResult};
use crate::upstream::{CountQuery, ReportSource, DateField, YearRange};

/// Side-by-side report counts for the two date fields at every granularity.
///
/// Column `A` is the date of the event, column `B` the date the report was
/// received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendsData {
    /// One row per year of the span, chronological.
    pub by_year: MergedSeries,
    /// One row per calendar month, January..December, summed across years.
    pub by_month: MergedSeries,
    /// One row per weekday, Monday..Sunday, summed across weeks.
    pub by_day: MergedSeries,
    pub series_a_name: String,
    pub series_b_name: String,
    pub year_begin: i32,
    pub year_end: i32,
}

/// Aggregate, order and merge both series at `granularity`.
///
/// Per-year rows stay chronological; month and weekday rows are collapsed
/// into canonical calendar order.
pub fn compare_at(
    event: &RawSeries,
    received: &RawSeries,
    granularity: Granularity,
) -> SeriesResult<MergedSeries> {
    let a = aggregate(event, granularity);
    let b = aggregate(received, granularity);

    let (a, b) = if ordering::needs_calendar_rank(granularity) {
        (order(&a), order(&b))
    } else {
        (chronological(&a), chronological(&b))
    };

    merge(&a, &b)
}

/// Build the comparison tables from already fetched series.
pub fn compute_trends(
    event: &RawSeries,
    received: &RawSeries,
    range: &YearRange,
) -> SeriesResult<TrendsData> {
    Ok(TrendsData {
        by_year: compare_at(event, received, Granularity::Year)?,
        by_month: compare_at(event, received, Granularity::Month)?,
        by_day: compare_at(event, received, Granularity::Day)?,
        series_a_name: DateField::DateOfEvent.display_name().to_string(),
        series_b_name: DateField::DateReceived.display_name().to_string(),
        year_begin: range.begin(),
        year_end: range.end(),
    })
}

/// Fetch both date fields for `range` and build the comparison tables.
pub async fn get_trends_data(source: &dyn ReportSource, range: YearRange) -> ServiceResult<TrendsData> {
    let event_query = CountQuery::new(DateField::DateOfEvent, range);
    let received_query = CountQuery::new(DateField::DateReceived, range);

    let (event, received) = tokio::try_join!(
        source.fetch_counts(&event_query),
        source.fetch_counts(&received_query)
    )?;

    info!(
        "Computing trends for {}-{}: {} event days, {} received days",
        range.begin(),
        range.end(),
        event.len(),
        received.len()
    );

    Ok(compute_trends(&event, &received, &range)?)
}
