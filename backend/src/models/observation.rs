use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::parse_term;
use crate::series::{SeriesError, SeriesResult};

/// A single dated event count, as returned by a histogram-style count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub count: u64,
}

impl Observation {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }

    /// Build an observation from an upstream `(term, count)` pair.
    pub fn parse(term: &str, count: u64) -> SeriesResult<Self> {
        Ok(Self::new(parse_term(term)?, count))
    }
}

/// Observations ordered by date, one per date.
///
/// Spacing is irregular: dates without events are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawSeries {
    observations: Vec<Observation>,
}

impl RawSeries {
    /// Sort `observations` by date and check that no date repeats.
    pub fn new(mut observations: Vec<Observation>) -> SeriesResult<Self> {
        observations.sort_by_key(|o| o.date);
        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SeriesError::DuplicateTimestamp { date: pair[0].date });
        }
        Ok(Self { observations })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse upstream `(term, count)` pairs into a series.
    pub fn from_terms<I, S>(items: I) -> SeriesResult<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let observations = items
            .into_iter()
            .map(|(term, count)| Observation::parse(term.as_ref(), count))
            .collect::<SeriesResult<Vec<_>>>()?;
        Self::new(observations)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Sum of all observation counts.
    pub fn total(&self) -> u64 {
        self.observations.iter().map(|o| o.count).sum()
    }

    /// First and last observation dates, if any.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Observations dated within `begin..=end`.
    pub fn within(&self, begin: NaiveDate, end: NaiveDate) -> RawSeries {
        RawSeries {
            observations: self
                .observations
                .iter()
                .filter(|o| o.date >= begin && o.date <= end)
                .copied()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_sorts_by_date() {
        let series = RawSeries::new(vec![
            Observation::new(date(2020, 3, 1), 3),
            Observation::new(date(2020, 1, 1), 1),
            Observation::new(date(2020, 2, 1), 2),
        ])
        .unwrap();

        let counts: Vec<u64> = series.observations().iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![1, 2, 3]);
        assert_eq!(series.span(), Some((date(2020, 1, 1), date(2020, 3, 1))));
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let err = RawSeries::new(vec![
            Observation::new(date(2020, 1, 1), 1),
            Observation::new(date(2020, 1, 1), 4),
        ])
        .unwrap_err();
        assert_eq!(err, SeriesError::DuplicateTimestamp { date: date(2020, 1, 1) });
    }

    #[test]
    fn test_from_terms() {
        let series = RawSeries::from_terms(vec![("20200102", 5), ("20200101", 2)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.total(), 7);
        assert_eq!(series.observations()[0].date, date(2020, 1, 1));
    }

    #[test]
    fn test_from_terms_propagates_parse_error() {
        let err = RawSeries::from_terms(vec![("20200101", 2), ("not-a-date", 1)]).unwrap_err();
        assert!(matches!(err, SeriesError::Parse { .. }));
    }

    #[test]
    fn test_empty_series() {
        let series = RawSeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.total(), 0);
        assert_eq!(series.span(), None);
    }

    #[test]
    fn test_within_is_inclusive() {
        let series = RawSeries::from_terms(vec![
            ("20191231", 1),
            ("20200101", 2),
            ("20201231", 3),
            ("20210101", 4),
        ])
        .unwrap();
        let clipped = series.within(date(2020, 1, 1), date(2020, 12, 31));
        assert_eq!(clipped.total(), 5);
        assert_eq!(clipped.len(), 2);
    }
}
