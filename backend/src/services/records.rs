use log::info;
use serde::{Deserialize, Serialize};

use super::error::ServiceResult;
use crate::models::{EventReport, ReportRow};
use crate::upstream::{RecordQuery, ReportSource};

/// Report listing for one manufacturer and device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsData {
    pub rows: Vec<ReportRow>,
    pub manufacturer: String,
    pub device: String,
    /// Rows whose report carries narrative text.
    pub with_mdr_text: usize,
    pub year_begin: i32,
    pub year_end: i32,
}

/// Project fetched reports onto table rows, keeping upstream order.
pub fn compute_records(reports: &[EventReport], query: &RecordQuery) -> RecordsData {
    let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();
    let with_mdr_text = rows.iter().filter(|r| r.has_mdr_text).count();

    RecordsData {
        rows,
        manufacturer: query.manufacturer.clone(),
        device: query.device.clone(),
        with_mdr_text,
        year_begin: query.range.begin(),
        year_end: query.range.end(),
    }
}

pub async fn get_records_data(
    source: &dyn ReportSource,
    query: &RecordQuery,
) -> ServiceResult<RecordsData> {
    let reports = source.fetch_reports(query).await?;
    info!(
        "Listing {} reports for {} / {}",
        reports.len(),
        query.manufacturer,
        query.device
    );
    Ok(compute_records(&reports, query))
}
