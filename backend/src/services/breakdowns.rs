use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::ServiceResult;
use crate::models::TermCount;
use crate::upstream::{ReportSource, TermCountQuery, TermField, YearRange};

/// One slice of a breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermShare {
    pub term: String,
    pub count: u64,
    /// Fraction of the breakdown total, 0.0 when the total is zero.
    pub share: f64,
}

/// Report counts per value of one categorical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermBreakdown {
    pub field: String,
    pub title: String,
    /// Largest count first; ties by term.
    pub terms: Vec<TermShare>,
    pub total: u64,
}

/// Event type and device class breakdowns for reports received in a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownData {
    pub event_types: TermBreakdown,
    pub device_classes: TermBreakdown,
    pub year_begin: i32,
    pub year_end: i32,
}

/// Collapse repeated terms and compute each term's share of the total.
pub fn summarize_terms(field: TermField, counts: &[TermCount]) -> TermBreakdown {
    let mut merged: HashMap<&str, u64> = HashMap::new();
    for tc in counts {
        *merged.entry(tc.term.as_str()).or_insert(0) += tc.count;
    }

    let total: u64 = merged.values().sum();
    let mut terms: Vec<TermShare> = merged
        .into_iter()
        .map(|(term, count)| TermShare {
            term: term.to_string(),
            count,
            share: if total == 0 { 0.0 } else { count as f64 / total as f64 },
        })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));

    TermBreakdown {
        field: field.as_str().to_string(),
        title: field.display_name().to_string(),
        terms,
        total,
    }
}

/// Fetch both categorical histograms for `range`.
pub async fn get_breakdown_data(
    source: &dyn ReportSource,
    range: YearRange,
) -> ServiceResult<BreakdownData> {
    let event_query = TermCountQuery::new(TermField::EventType, range);
    let class_query = TermCountQuery::new(TermField::DeviceClass, range);

    let (event_types, device_classes) = tokio::try_join!(
        source.fetch_term_counts(&event_query),
        source.fetch_term_counts(&class_query)
    )?;

    info!(
        "Computing breakdowns for {}-{}: {} event types, {} device classes",
        range.begin(),
        range.end(),
        event_types.len(),
        device_classes.len()
    );

    Ok(BreakdownData {
        event_types: summarize_terms(TermField::EventType, &event_types),
        device_classes: summarize_terms(TermField::DeviceClass, &device_classes),
        year_begin: range.begin(),
        year_end: range.end(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::StaticReportSource;

    #[test]
    fn test_summarize_terms_orders_and_shares() {
        let breakdown = summarize_terms(
            TermField::EventType,
            &[
                TermCount::new("Injury", 1),
                TermCount::new("Malfunction", 3),
                TermCount::new("Death", 1),
            ],
        );

        assert_eq!(breakdown.total, 5);
        assert_eq!(breakdown.title, "Adverse Event Type");
        let order: Vec<&str> = breakdown.terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(order, vec!["Malfunction", "Death", "Injury"]);
        assert!((breakdown.terms[0].share - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_terms_merges_repeats() {
        let breakdown = summarize_terms(
            TermField::DeviceClass,
            &[TermCount::new("2", 4), TermCount::new("2", 6)],
        );
        assert_eq!(breakdown.terms.len(), 1);
        assert_eq!(breakdown.terms[0].count, 10);
        assert_eq!(breakdown.terms[0].share, 1.0);
    }

    #[test]
    fn test_summarize_terms_empty() {
        let breakdown = summarize_terms(TermField::EventType, &[]);
        assert_eq!(breakdown.total, 0);
        assert!(breakdown.terms.is_empty());

        let zero = summarize_terms(TermField::EventType, &[TermCount::new("Other", 0)]);
        assert_eq!(zero.terms[0].share, 0.0);
    }

    #[tokio::test]
    async fn test_get_breakdown_data() {
        let source = StaticReportSource::new()
            .with_terms(TermField::EventType, vec![TermCount::new("Malfunction", 2)])
            .with_terms(TermField::DeviceClass, vec![TermCount::new("3", 1)]);
        let range = YearRange::new(2019, 2020).unwrap();

        let data = get_breakdown_data(&source, range).await.unwrap();

        assert_eq!(data.event_types.total, 2);
        assert_eq!(data.device_classes.field, "device.openfda.device_class");
        assert_eq!(data.year_begin, 2019);
        assert_eq!(data.year_end, 2020);
    }
}
