//! Ordering of aggregated buckets.
//!
//! Two distinct operations live here:
//!
//! - [`chronological`] lists the buckets of one span in time order, one row per
//!   actual period (`2019-11`, `2019-12`, `2020-01`, ...). Per-year charts and
//!   anything that needs one row per real bucket use this.
//! - [`order`] first collapses buckets that share a calendar label across years
//!   (every January into one `January` row) and then sorts those canonical keys
//!   by calendar rank. By-month and by-weekday comparison charts use this.
//!
//! [`reorder`] applies the canonical sort to an existing [`OrderedSeries`].

use std::collections::HashMap;

use crate::models::{AggregatedSeries, Granularity, OrderedSeries, SeriesRow};

use super::{SeriesError, SeriesResult};

/// One row per bucket, in period order, labelled with the unique period key.
pub fn chronological(aggregated: &AggregatedSeries) -> OrderedSeries {
    let rows = aggregated
        .buckets()
        .iter()
        .map(|b| SeriesRow::new(b.key(), b.count))
        .collect();
    OrderedSeries::from_unique_rows(aggregated.granularity(), rows)
}

/// Collapse buckets by calendar label and sort them into canonical calendar order.
///
/// Years sort numerically, months January..December and weekdays Monday..Sunday.
pub fn order(aggregated: &AggregatedSeries) -> OrderedSeries {
    let granularity = aggregated.granularity();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<SeriesRow> = Vec::new();

    for bucket in aggregated.buckets() {
        let label = bucket.label();
        match positions.get(&label) {
            Some(&index) => rows[index].count += bucket.count,
            None => {
                positions.insert(label.clone(), rows.len());
                rows.push(SeriesRow::new(label, bucket.count));
            }
        }
    }

    // Labels produced by Period always rank.
    rows.sort_by_cached_key(|row| granularity.canonical_rank(&row.label).unwrap_or(i64::MAX));
    OrderedSeries::from_unique_rows(granularity, rows)
}

/// Sort an existing series into canonical calendar order.
///
/// Fails with [`SeriesError::UnknownLabel`] if a label does not belong to the
/// series' granularity. Reordering a canonically ordered series is a no-op.
pub fn reorder(series: OrderedSeries) -> SeriesResult<OrderedSeries> {
    let granularity = series.granularity();
    let mut ranked = series
        .into_rows()
        .into_iter()
        .map(|row| match granularity.canonical_rank(&row.label) {
            Some(rank) => Ok((rank, row)),
            None => Err(SeriesError::UnknownLabel {
                label: row.label,
                granularity,
            }),
        })
        .collect::<SeriesResult<Vec<(i64, SeriesRow)>>>()?;

    ranked.sort_by_key(|(rank, _)| *rank);
    let rows = ranked.into_iter().map(|(_, row)| row).collect();
    Ok(OrderedSeries::from_unique_rows(granularity, rows))
}

/// Whether `granularity` needs remapping before a canonical sort.
///
/// Year labels already sort correctly as numbers; month and weekday labels do not.
pub fn needs_calendar_rank(granularity: Granularity) -> bool {
    !matches!(granularity, Granularity::Year)
}
