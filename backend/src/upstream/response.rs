//! Decoding of API responses into series, term counts and reports.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{UpstreamError, UpstreamResult};
use crate::models::{EventReport, RawSeries, TermCount};

/// Error code the API uses when a search matches no records.
pub const NOT_FOUND_CODE: &str = "NOT_FOUND";

/// One histogram entry. Date count queries label entries `time`, other count
/// queries label them `term`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramItem {
    #[serde(alias = "time")]
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// The `results` array of a response, or an error for a failed status.
///
/// A "no matching records" answer arrives as a 404 error; it is translated
/// into an empty list. Any other non-success status is an error.
fn decode_results<T: DeserializeOwned>(status: u16, body: &str) -> UpstreamResult<Vec<T>> {
    if (200..300).contains(&status) {
        let envelope: ResultsEnvelope<T> = serde_json::from_str(body)?;
        debug!("Decoded {} result entries", envelope.results.len());
        return Ok(envelope.results);
    }

    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

    if status == 404
        && envelope
            .as_ref()
            .is_some_and(|e| e.error.code == NOT_FOUND_CODE)
    {
        debug!("Upstream matched no records; returning no results");
        return Ok(Vec::new());
    }

    let (code, message) = match envelope {
        Some(e) => (Some(e.error.code), e.error.message),
        None => (None, body.chars().take(200).collect()),
    };
    Err(UpstreamError::Status {
        status,
        code,
        message,
    })
}

/// Turn the answer to a per-day count query into a raw series.
pub fn decode_counts(status: u16, body: &str) -> UpstreamResult<RawSeries> {
    let items: Vec<HistogramItem> = decode_results(status, body)?;
    Ok(RawSeries::from_terms(
        items.into_iter().map(|i| (i.term, i.count)),
    )?)
}

/// Turn the answer to a categorical count query into term counts, in
/// upstream order.
pub fn decode_term_counts(status: u16, body: &str) -> UpstreamResult<Vec<TermCount>> {
    let items: Vec<HistogramItem> = decode_results(status, body)?;
    Ok(items
        .into_iter()
        .map(|i| TermCount::new(i.term, i.count))
        .collect())
}

/// Turn the answer to a search query into reports.
pub fn decode_reports(status: u16, body: &str) -> UpstreamResult<Vec<EventReport>> {
    decode_results(status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_decode_time_entries() {
        let body = r#"{
            "meta": {"disclaimer": "..."},
            "results": [
                {"time": "20170102", "count": 12},
                {"time": "20170101", "count": 3}
            ]
        }"#;

        let series = decode_counts(200, body).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.total(), 15);
        assert_eq!(
            series.observations()[0].date,
            NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_decode_term_entries() {
        let body = r#"{"results": [{"term": "2017-03-04", "count": 1}]}"#;
        let series = decode_counts(200, body).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_decode_missing_results_is_empty() {
        let series = decode_counts(200, r#"{"meta": {}}"#).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_not_found_becomes_empty_series() {
        let body = r#"{"error": {"code": "NOT_FOUND", "message": "No matches found!"}}"#;
        let series = decode_counts(404, body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_bad_request_is_an_error() {
        let body = r#"{"error": {"code": "BAD_REQUEST", "message": "Limit cannot exceed 1000 results for count requests."}}"#;
        let err = decode_counts(400, body).unwrap_err();
        match err {
            UpstreamError::Status {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("BAD_REQUEST"));
                assert!(message.contains("Limit"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_404_without_envelope_is_an_error() {
        let err = decode_counts(404, "<html>gone</html>").unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 404, code: None, .. }));
    }

    #[test]
    fn test_malformed_term_is_a_series_error() {
        let body = r#"{"results": [{"time": "2017-13-45", "count": 1}]}"#;
        let err = decode_counts(200, body).unwrap_err();
        assert!(matches!(err, UpstreamError::Series(_)));
    }

    #[test]
    fn test_decode_term_counts_keeps_upstream_order() {
        let body = r#"{"results": [
            {"term": "Malfunction", "count": 120},
            {"term": "Injury", "count": 30},
            {"term": "Death", "count": 2}
        ]}"#;

        let terms = decode_term_counts(200, body).unwrap();

        assert_eq!(
            terms,
            vec![
                TermCount::new("Malfunction", 120),
                TermCount::new("Injury", 30),
                TermCount::new("Death", 2),
            ]
        );
    }

    #[test]
    fn test_term_counts_not_found_is_empty() {
        let body = r#"{"error": {"code": "NOT_FOUND", "message": "No matches found!"}}"#;
        assert!(decode_term_counts(404, body).unwrap().is_empty());
    }

    #[test]
    fn test_decode_reports() {
        let body = r#"{"results": [
            {
                "date_received": "20200105",
                "event_type": "Injury",
                "event_location": "HOME",
                "reporter_occupation_code": "PATIENT",
                "device": [{"manufacturer_d_name": "ESAOTE", "generic_name": "ULTRASOUND"}],
                "mdr_text": [{"text": "..."}]
            },
            {"event_type": "Malfunction"}
        ]}"#;

        let reports = decode_reports(200, body).unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports[0].matches_device("ESAOTE", "ULTRASOUND"));
        assert!(reports[0].has_mdr_text());
        assert!(!reports[1].has_mdr_text());
    }

    #[test]
    fn test_reports_server_error() {
        let body = r#"{"error": {"code": "SERVER_ERROR", "message": "Check your request and try again"}}"#;
        assert!(matches!(
            decode_reports(500, body),
            Err(UpstreamError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        let err = decode_counts(200, "not json").unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
