//! HTTP report source backed by the openFDA device event endpoint.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Url;
use std::time::Duration;

use super::query::{CountQuery, RecordQuery, TermCountQuery};
use super::response::{decode_counts, decode_reports, decode_term_counts};
use super::source::ReportSource;
use super::UpstreamResult;
use crate::config::UpstreamSettings;
use crate::models::{EventReport, RawSeries, TermCount};

/// Report source that queries the live API.
///
/// One request per query; failures are returned to the caller as-is.
#[derive(Clone)]
pub struct OpenFdaClient {
    http: reqwest::Client,
    settings: UpstreamSettings,
}

impl OpenFdaClient {
    pub fn new(settings: UpstreamSettings) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        info!(
            "Upstream client targeting {}{} (api key {})",
            settings.base_url,
            settings.endpoint,
            if settings.api_key.is_some() { "set" } else { "not set" }
        );

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &UpstreamSettings {
        &self.settings
    }

    /// GET `url`, returning the status and body. The URL may carry the API
    /// key, so it is neither logged nor kept in errors.
    async fn get(&self, url: Url) -> UpstreamResult<(u16, String)> {
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl ReportSource for OpenFdaClient {
    async fn fetch_counts(&self, query: &CountQuery) -> UpstreamResult<RawSeries> {
        debug!("Fetching counts for {}", query.search_clause());

        let (status, body) = self.get(query.url(&self.settings)?).await?;
        let series = decode_counts(status, &body)?;
        debug!(
            "Fetched {} observations for {} (status {})",
            series.len(),
            query.field,
            status
        );
        Ok(series)
    }

    async fn fetch_term_counts(&self, query: &TermCountQuery) -> UpstreamResult<Vec<TermCount>> {
        debug!("Fetching {} terms for {}", query.field, query.search_clause());

        let (status, body) = self.get(query.url(&self.settings)?).await?;
        let terms = decode_term_counts(status, &body)?;
        debug!("Fetched {} terms for {} (status {})", terms.len(), query.field, status);
        Ok(terms)
    }

    async fn fetch_reports(&self, query: &RecordQuery) -> UpstreamResult<Vec<EventReport>> {
        debug!("Fetching reports for {}", query.search_clause());

        let (status, body) = self.get(query.url(&self.settings)?).await?;
        let reports = decode_reports(status, &body)?;
        debug!("Fetched {} reports (status {})", reports.len(), status);
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{DateField, UpstreamError, YearRange};

    #[test]
    fn test_client_keeps_settings() {
        let settings = UpstreamSettings {
            timeout_secs: 3,
            ..UpstreamSettings::default()
        };
        let client = OpenFdaClient::new(settings).unwrap();
        assert_eq!(client.settings().timeout_secs, 3);
        assert_eq!(client.settings().endpoint, "device/event.json");
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let settings = UpstreamSettings {
            base_url: "http://127.0.0.1:9/".to_string(),
            api_key: Some("SECRET_KEY_123".to_string()),
            timeout_secs: 5,
            ..UpstreamSettings::default()
        };
        let client = OpenFdaClient::new(settings).unwrap();
        let query = CountQuery::new(DateField::DateReceived, YearRange::new(2020, 2020).unwrap());

        let err = client.fetch_counts(&query).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Http(_)));
        assert!(!err.to_string().contains("SECRET_KEY_123"));
        assert!(!format!("{:?}", err).contains("SECRET_KEY_123"));
    }
}
