//! Service layer for dashboard data.
//!
//! Services sit between the upstream report source and the HTTP handlers:
//! they fetch raw series, term counts and reports and shape them into the
//! chart-ready tables each dashboard view consumes.

pub mod breakdowns;
pub mod distributions;
pub mod error;
pub mod records;
pub mod trends;


pub use breakdowns::{get_breakdown_data, summarize_terms, BreakdownData, TermBreakdown, TermShare};
pub use distributions::{compute_distribution_data, get_distribution_data, DistributionData};
pub use error::{ServiceError, ServiceResult};
pub use records::{compute_records, get_records_data, RecordsData};
pub use trends::{compute_trends, get_trends_data, TrendsData};
