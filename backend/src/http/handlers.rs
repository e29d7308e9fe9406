//! HTTP handlers for the REST API.
//!
//! Each handler resolves its query parameters and delegates to the
//! service layer.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{
    BreakdownData, DistributionData, HealthResponse, RecordsData, RecordsQuery, TrendsData,
    YearRangeQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::services;
use crate::upstream::YearRange;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn resolve_range(state: &AppState, query: &YearRangeQuery) -> Result<YearRange, AppError> {
    Ok(query.resolve(today(), state.config.dashboard.default_year_span)?)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Dashboard views
// =============================================================================

/// GET /v1/trends
///
/// Event-date vs received-date report counts per year, month and weekday.
pub async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<YearRangeQuery>,
) -> HandlerResult<TrendsData> {
    let range = resolve_range(&state, &query)?;
    let data = services::get_trends_data(state.source.as_ref(), range).await?;
    Ok(Json(data))
}

/// GET /v1/distributions
///
/// Received-date counts pivoted into one column per calendar month.
pub async fn get_distributions(
    State(state): State<AppState>,
    Query(query): Query<YearRangeQuery>,
) -> HandlerResult<DistributionData> {
    let range = resolve_range(&state, &query)?;
    let data = services::get_distribution_data(state.source.as_ref(), range).await?;
    Ok(Json(data))
}

/// GET /v1/breakdowns
///
/// Report counts per event type and per device class.
pub async fn get_breakdowns(
    State(state): State<AppState>,
    Query(query): Query<YearRangeQuery>,
) -> HandlerResult<BreakdownData> {
    let range = resolve_range(&state, &query)?;
    let data = services::get_breakdown_data(state.source.as_ref(), range).await?;
    Ok(Json(data))
}

/// GET /v1/records
///
/// Reports received for one manufacturer and device, as table rows.
pub async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> HandlerResult<RecordsData> {
    let record_query = query.resolve(today(), state.config.dashboard.default_year_span)?;
    let data = services::get_records_data(state.source.as_ref(), &record_query).await?;
    Ok(Json(data))
}
