// ============================================================================
// Derived series values
// ============================================================================
//
// Every stage of the pipeline returns one of these as a fresh value; none of
// them is mutated after construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::time::{Granularity, Period, MONTH_NAMES};
use crate::series::{SeriesError, SeriesResult};

/// Summed count for one calendar bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub period: Period,
    pub count: u64,
}

impl Bucket {
    pub fn new(period: Period, count: u64) -> Self {
        Self { period, count }
    }

    pub fn label(&self) -> String {
        self.period.label()
    }

    pub fn key(&self) -> String {
        self.period.key()
    }
}

/// Zero-filled buckets covering a contiguous span, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AggregatedSeriesRepr")]
pub struct AggregatedSeries {
    granularity: Granularity,
    buckets: Vec<Bucket>,
}

#[derive(Deserialize)]
struct AggregatedSeriesRepr {
    granularity: Granularity,
    buckets: Vec<Bucket>,
}

impl TryFrom<AggregatedSeriesRepr> for AggregatedSeries {
    type Error = SeriesError;

    fn try_from(repr: AggregatedSeriesRepr) -> SeriesResult<Self> {
        for bucket in &repr.buckets {
            if bucket.period.granularity() != repr.granularity {
                return Err(SeriesError::GranularityMismatch {
                    left: repr.granularity,
                    right: bucket.period.granularity(),
                });
            }
        }
        for pair in repr.buckets.windows(2) {
            if pair[0].period.next() != Some(pair[1].period) {
                let expected = pair[0]
                    .period
                    .next()
                    .map(|p| p.key())
                    .unwrap_or_default();
                return Err(SeriesError::NotContiguous {
                    expected,
                    found: pair[1].key(),
                });
            }
        }
        Ok(Self::from_buckets(repr.granularity, repr.buckets))
    }
}

impl AggregatedSeries {
    pub(crate) fn from_buckets(granularity: Granularity, buckets: Vec<Bucket>) -> Self {
        Self {
            granularity,
            buckets,
        }
    }

    pub fn empty(granularity: Granularity) -> Self {
        Self::from_buckets(granularity, Vec::new())
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Bucket labels in chronological order. Month and weekday labels repeat
    /// when the span covers more than one year or week.
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(Bucket::label).collect()
    }

    /// Count of the bucket identified by its unique period key.
    pub fn count_for_key(&self, key: &str) -> Option<u64> {
        self.buckets.iter().find(|b| b.key() == key).map(|b| b.count)
    }
}

/// A labelled count in an [`OrderedSeries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub label: String,
    pub count: u64,
}

impl SeriesRow {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

fn check_unique_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> SeriesResult<()> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label) {
            return Err(SeriesError::DuplicateLabel {
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

/// Uniquely labelled counts in a deliberate order (chronological or canonical).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderedSeriesRepr")]
pub struct OrderedSeries {
    granularity: Granularity,
    rows: Vec<SeriesRow>,
}

#[derive(Deserialize)]
struct OrderedSeriesRepr {
    granularity: Granularity,
    rows: Vec<SeriesRow>,
}

impl TryFrom<OrderedSeriesRepr> for OrderedSeries {
    type Error = SeriesError;

    fn try_from(repr: OrderedSeriesRepr) -> SeriesResult<Self> {
        Self::new(repr.granularity, repr.rows)
    }
}

impl OrderedSeries {
    /// Build a series from rows as given. Labels must be unique.
    pub fn new(granularity: Granularity, rows: Vec<SeriesRow>) -> SeriesResult<Self> {
        check_unique_labels(rows.iter().map(|r| r.label.as_str()))?;
        Ok(Self { granularity, rows })
    }

    pub(crate) fn from_unique_rows(granularity: Granularity, rows: Vec<SeriesRow>) -> Self {
        Self { granularity, rows }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<SeriesRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.count).collect()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.count)
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// One row of a [`MergedSeries`]: the two counts observed for a shared label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRow {
    pub label: String,
    pub a: u64,
    pub b: u64,
}

/// Two count columns aligned on a shared label column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MergedSeriesRepr")]
pub struct MergedSeries {
    granularity: Granularity,
    rows: Vec<MergedRow>,
}

#[derive(Deserialize)]
struct MergedSeriesRepr {
    granularity: Granularity,
    rows: Vec<MergedRow>,
}

impl TryFrom<MergedSeriesRepr> for MergedSeries {
    type Error = SeriesError;

    fn try_from(repr: MergedSeriesRepr) -> SeriesResult<Self> {
        check_unique_labels(repr.rows.iter().map(|r| r.label.as_str()))?;
        Ok(Self::new(repr.granularity, repr.rows))
    }
}

impl MergedSeries {
    pub(crate) fn new(granularity: Granularity, rows: Vec<MergedRow>) -> Self {
        Self { granularity, rows }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn column_a(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.a).collect()
    }

    pub fn column_b(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.b).collect()
    }

    pub fn get(&self, label: &str) -> Option<(u64, u64)> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| (r.a, r.b))
    }
}

/// Counts observed for one calendar month, one entry per year in the span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionColumn {
    pub month: String,
    pub counts: Vec<u64>,
}

/// Wide table with one column per calendar month, January first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DistributionTableRepr")]
pub struct DistributionTable {
    columns: Vec<DistributionColumn>,
}

#[derive(Deserialize)]
struct DistributionTableRepr {
    columns: Vec<DistributionColumn>,
}

impl TryFrom<DistributionTableRepr> for DistributionTable {
    type Error = SeriesError;

    fn try_from(repr: DistributionTableRepr) -> SeriesResult<Self> {
        if let Some(extra) = repr.columns.get(MONTH_NAMES.len()) {
            return Err(SeriesError::UnknownLabel {
                label: extra.month.clone(),
                granularity: Granularity::Month,
            });
        }
        for (i, month) in MONTH_NAMES.iter().enumerate() {
            match repr.columns.get(i) {
                Some(column) if column.month == *month => {}
                Some(column) => {
                    return Err(SeriesError::UnknownLabel {
                        label: column.month.clone(),
                        granularity: Granularity::Month,
                    })
                }
                None => {
                    return Err(SeriesError::MissingMonth {
                        month: month.to_string(),
                    })
                }
            }
        }
        Ok(Self::new(repr.columns))
    }
}

impl DistributionTable {
    pub(crate) fn new(columns: Vec<DistributionColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[DistributionColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<DistributionColumn> {
        self.columns
    }

    pub fn months(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.month.as_str()).collect()
    }

    pub fn column(&self, month: &str) -> Option<&[u64]> {
        self.columns
            .iter()
            .find(|c| c.month == month)
            .map(|c| c.counts.as_slice())
    }

    /// True when no month holds any entry.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.counts.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_series_rejects_duplicate_labels() {
        let err = OrderedSeries::new(
            Granularity::Month,
            vec![SeriesRow::new("January", 1), SeriesRow::new("January", 2)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SeriesError::DuplicateLabel {
                label: "January".to_string()
            }
        );
    }

    #[test]
    fn test_ordered_series_accessors() {
        let series = OrderedSeries::new(
            Granularity::Day,
            vec![SeriesRow::new("Monday", 4), SeriesRow::new("Friday", 6)],
        )
        .unwrap();
        assert_eq!(series.labels(), vec!["Monday", "Friday"]);
        assert_eq!(series.counts(), vec![4, 6]);
        assert_eq!(series.get("Friday"), Some(6));
        assert_eq!(series.get("Sunday"), None);
        assert_eq!(series.total(), 10);
    }

    #[test]
    fn test_merged_series_serializes_as_rows() {
        let merged = MergedSeries::new(
            Granularity::Year,
            vec![MergedRow {
                label: "2021".to_string(),
                a: 7,
                b: 3,
            }],
        );
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json["granularity"], "year");
        assert_eq!(json["rows"][0]["label"], "2021");
        assert_eq!(json["rows"][0]["a"], 7);
        assert_eq!(json["rows"][0]["b"], 3);
    }

    #[test]
    fn test_ordered_series_deserialize_rejects_duplicate_labels() {
        let json = r#"{"granularity":"year","rows":[
            {"label":"2021","count":1},
            {"label":"2021","count":2}
        ]}"#;
        let err = serde_json::from_str::<OrderedSeries>(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate label"));

        let ok: OrderedSeries = serde_json::from_str(
            r#"{"granularity":"year","rows":[{"label":"2021","count":1}]}"#,
        )
        .unwrap();
        assert_eq!(ok.get("2021"), Some(1));
    }

    #[test]
    fn test_merged_series_deserialize_rejects_duplicate_labels() {
        let json = r#"{"granularity":"month","rows":[
            {"label":"May","a":1,"b":2},
            {"label":"May","a":3,"b":4}
        ]}"#;
        assert!(serde_json::from_str::<MergedSeries>(json).is_err());
    }

    #[test]
    fn test_aggregated_series_deserialize_requires_contiguous_buckets() {
        let gap = r#"{"granularity":"year","buckets":[
            {"period":{"start":"2019-01-01","granularity":"year"},"count":1},
            {"period":{"start":"2021-01-01","granularity":"year"},"count":2}
        ]}"#;
        let err = serde_json::from_str::<AggregatedSeries>(gap).unwrap_err();
        assert!(err.to_string().contains("Non-contiguous"));

        let mixed = r#"{"granularity":"year","buckets":[
            {"period":{"start":"2019-01-01","granularity":"month"},"count":1}
        ]}"#;
        assert!(serde_json::from_str::<AggregatedSeries>(mixed).is_err());

        let ok = r#"{"granularity":"year","buckets":[
            {"period":{"start":"2019-01-01","granularity":"year"},"count":1},
            {"period":{"start":"2020-01-01","granularity":"year"},"count":0}
        ]}"#;
        let series: AggregatedSeries = serde_json::from_str(ok).unwrap();
        assert_eq!(series.total(), 1);
    }

    #[test]
    fn test_distribution_table_deserialize_requires_all_months() {
        let columns: Vec<DistributionColumn> = MONTH_NAMES
            .iter()
            .map(|m| DistributionColumn {
                month: m.to_string(),
                counts: vec![1],
            })
            .collect();
        let table = DistributionTable::new(columns.clone());
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<DistributionTable>(&json).unwrap(), table);

        let short = DistributionTable::new(columns[..11].to_vec());
        let json = serde_json::to_string(&short).unwrap();
        let err = serde_json::from_str::<DistributionTable>(&json).unwrap_err();
        assert!(err.to_string().contains("December"));
    }
}
