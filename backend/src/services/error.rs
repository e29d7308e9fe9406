//! Error type for the dashboard services.

use crate::series::SeriesError;
use crate::upstream::UpstreamError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure while fetching or shaping dashboard data.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to fetch from upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Failed to build series: {0}")]
    Series(#[from] SeriesError),
}
