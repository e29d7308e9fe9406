use log::warn;

use crate::models::{AggregatedSeries, Bucket, Granularity, Period, RawSeries};

/// Resample `series` into contiguous calendar buckets and sum counts per bucket.
///
/// Every bucket between the first and last observation is emitted, including
/// those without observations (count 0), so two series with different
/// sparsity stay comparable. Buckets are returned in chronological order.
/// An empty input yields an empty result.
pub fn aggregate(series: &RawSeries, granularity: Granularity) -> AggregatedSeries {
    let Some((first, last)) = series.span() else {
        warn!(
            "Aggregating an empty series at {} granularity; returning no buckets",
            granularity
        );
        return AggregatedSeries::empty(granularity);
    };

    let last_start = granularity.truncate(last);
    let mut observations = series.observations().iter().peekable();
    let mut buckets = Vec::new();
    let mut period = Some(Period::containing(granularity, first));

    while let Some(current) = period {
        if current.start() > last_start {
            break;
        }

        let mut count = 0u64;
        while let Some(obs) = observations.next_if(|o| current.contains(o.date)) {
            count += obs.count;
        }
        buckets.push(Bucket::new(current, count));

        period = current.next();
    }

    AggregatedSeries::from_buckets(granularity, buckets)
}
