//! Calendar granularity, bucket periods and upstream date terms.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::series::{SeriesError, SeriesResult};

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parse an upstream date term into a calendar date.
///
/// Count queries on date fields return compact `YYYYMMDD` terms; the dashed
/// `YYYY-MM-DD` form is accepted as well so hand-written fixtures read naturally.
pub fn parse_term(term: &str) -> SeriesResult<NaiveDate> {
    let trimmed = term.trim();

    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = trimmed[0..4].parse().map_err(|_| parse_error(term, "bad year"))?;
        let month: u32 = trimmed[4..6].parse().map_err(|_| parse_error(term, "bad month"))?;
        let day: u32 = trimmed[6..8].parse().map_err(|_| parse_error(term, "bad day"))?;
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| parse_error(term, "no such calendar date"));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| parse_error(term, &format!("expected YYYYMMDD or YYYY-MM-DD: {}", e)))
}

fn parse_error(term: &str, reason: &str) -> SeriesError {
    SeriesError::Parse {
        term: term.to_string(),
        reason: reason.to_string(),
    }
}

/// Bucket size used when resampling a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Month,
    Day,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Year, Granularity::Month, Granularity::Day];

    /// First day of the bucket containing `date`.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Year => date - Days::new(u64::from(date.ordinal0())),
            Granularity::Month => date - Days::new(u64::from(date.day0())),
            Granularity::Day => date,
        }
    }

    /// First day of the bucket following the one that starts at `start`.
    ///
    /// Returns `None` past the last representable date.
    pub fn step(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Year => start.checked_add_months(Months::new(12)),
            Granularity::Month => start.checked_add_months(Months::new(1)),
            Granularity::Day => start.succ_opt(),
        }
    }

    /// Position of `label` in canonical calendar order for this granularity.
    ///
    /// Years rank by their numeric value, months January=0..December=11 and
    /// weekdays Monday=0..Sunday=6. Only the labels [`Period::label`] emits
    /// rank: four-digit years and full, capitalised names.
    pub fn canonical_rank(self, label: &str) -> Option<i64> {
        let names: &[&str] = match self {
            Granularity::Year => {
                if label.len() != 4 || !label.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                return label.parse::<i64>().ok();
            }
            Granularity::Month => &MONTH_NAMES,
            Granularity::Day => &WEEKDAY_NAMES,
        };
        names.iter().position(|n| *n == label).map(|i| i as i64)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::Day => "day",
        };
        f.write_str(name)
    }
}

/// One calendar bucket: a year, a month or a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodRepr")]
pub struct Period {
    start: NaiveDate,
    granularity: Granularity,
}

#[derive(Deserialize)]
struct PeriodRepr {
    start: NaiveDate,
    granularity: Granularity,
}

impl TryFrom<PeriodRepr> for Period {
    type Error = SeriesError;

    fn try_from(repr: PeriodRepr) -> SeriesResult<Self> {
        if repr.granularity.truncate(repr.start) != repr.start {
            return Err(SeriesError::MisalignedPeriod {
                start: repr.start,
                granularity: repr.granularity,
            });
        }
        Ok(Self::containing(repr.granularity, repr.start))
    }
}

impl Period {
    /// The bucket of the given granularity that contains `date`.
    pub fn containing(granularity: Granularity, date: NaiveDate) -> Self {
        Self {
            start: granularity.truncate(date),
            granularity,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The bucket immediately after this one.
    pub fn next(&self) -> Option<Period> {
        self.granularity.step(self.start).map(|start| Period {
            start,
            granularity: self.granularity,
        })
    }

    /// Whether `date` falls inside this bucket.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.granularity.truncate(date) == self.start
    }

    /// Display label: four-digit year, full month name or full weekday name.
    ///
    /// Month and weekday labels repeat across years; use [`Period::key`] when
    /// a unique identifier is needed.
    pub fn label(&self) -> String {
        let pattern = match self.granularity {
            Granularity::Year => "%Y",
            Granularity::Month => "%B",
            Granularity::Day => "%A",
        };
        self.start.format(pattern).to_string()
    }

    /// Identifier unique within any span: `2020`, `2020-01` or `2020-01-06`.
    pub fn key(&self) -> String {
        let pattern = match self.granularity {
            Granularity::Year => "%Y",
            Granularity::Month => "%Y-%m",
            Granularity::Day => "%Y-%m-%d",
        };
        self.start.format(pattern).to_string()
    }
}
