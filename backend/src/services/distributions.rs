use serde::{Deserialize, Serialize};

use super::error::ServiceResult;
use crate::models::RawSeries;
use crate::series::pivot;
use crate::upstream::{CountQuery, ReportSource, DateField, YearRange};

/// Box-plot summary of one month's counts across years.
///
/// Quartiles use linear interpolation between closest ranks. All fields are
/// zero for a month with no entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub count: usize,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub std_dev: f64,
}

/// Counts observed for one calendar month across the years of the span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthDistribution {
    pub month: String,
    pub counts: Vec<u64>,
    pub stats: DistributionStats,
}

/// Box-plot-per-month dataset, January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionData {
    pub months: Vec<MonthDistribution>,
    pub series_name: String,
    pub total_count: u64,
}

/// Value at quantile `p` of an ascending, non-empty slice.
fn quantile(sorted: &[u64], p: f64) -> f64 {
    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] as f64 + (sorted[upper] as f64 - sorted[lower] as f64) * fraction
}

fn compute_stats(counts: &[u64]) -> DistributionStats {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();

    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return DistributionStats {
            count: 0,
            sum: 0,
            min: 0,
            max: 0,
            mean: 0.0,
            q1: 0.0,
            median: 0.0,
            q3: 0.0,
            std_dev: 0.0,
        };
    };

    let count = sorted.len();
    let sum: u64 = sorted.iter().sum();
    let mean = sum as f64 / count as f64;
    // Population variance: every year of the span is observed.
    let variance = sorted
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / count as f64;

    DistributionStats {
        count,
        sum,
        min,
        max,
        mean,
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        std_dev: variance.sqrt(),
    }
}

/// Pivot `received` into per-month columns and summarise each column.
pub fn compute_distribution_data(received: &RawSeries) -> DistributionData {
    let months = pivot(received)
        .into_columns()
        .into_iter()
        .map(|column| {
            MonthDistribution {
                stats: compute_stats(&column.counts),
                month: column.month,
                counts: column.counts,
            }
        })
        .collect();

    DistributionData {
        months,
        series_name: DateField::DateReceived.display_name().to_string(),
        total_count: received.total(),
    }
}

/// Fetch received-date counts for `range` and build the monthly distribution.
pub async fn get_distribution_data(
    source: &dyn ReportSource,
    range: YearRange,
) -> ServiceResult<DistributionData> {
    let query = CountQuery::new(DateField::DateReceived, range);
    let received = source.fetch_counts(&query).await?;
    Ok(compute_distribution_data(&received))
}
