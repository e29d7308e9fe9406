use std::collections::{HashMap, HashSet};

use log::debug;

use crate::models::{MergedRow, MergedSeries, OrderedSeries};

use super::{SeriesError, SeriesResult};

/// Align two ordered series on their labels.
///
/// Inner join: a label survives only when both `a` and `b` carry it, and
/// labels unique to one side are dropped. `a` fills column `A` and `b` column
/// `B`; rows keep the order of `a`, so order both inputs the same way first.
pub fn merge(a: &OrderedSeries, b: &OrderedSeries) -> SeriesResult<MergedSeries> {
    if a.granularity() != b.granularity() {
        return Err(SeriesError::GranularityMismatch {
            left: a.granularity(),
            right: b.granularity(),
        });
    }

    let lookup: HashMap<&str, u64> = b
        .rows()
        .iter()
        .map(|row| (row.label.as_str(), row.count))
        .collect();

    let rows: Vec<MergedRow> = a
        .rows()
        .iter()
        .filter_map(|row| {
            lookup.get(row.label.as_str()).map(|&count_b| MergedRow {
                label: row.label.clone(),
                a: row.count,
                b: count_b,
            })
        })
        .collect();

    let labels_a: HashSet<&str> = a.rows().iter().map(|row| row.label.as_str()).collect();
    let only_a = a.len() - rows.len();
    let only_b = b
        .rows()
        .iter()
        .filter(|row| !labels_a.contains(row.label.as_str()))
        .count();
    if only_a + only_b > 0 {
        debug!(
            "Merging {} series dropped {} unmatched labels ({} only in A, {} only in B, {} kept)",
            a.granularity(),
            only_a + only_b,
            only_a,
            only_b,
            rows.len()
        );
    }

    Ok(MergedSeries::new(a.granularity(), rows))
}
