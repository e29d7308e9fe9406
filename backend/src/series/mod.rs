//! Time-series aggregation pipeline.
//!
//! Converts irregular dated counts into calendar-aligned tables for charting.
//! Each stage is a pure function returning a new value:
//!
//! ```text
//! RawSeries ──aggregate──► AggregatedSeries ──chronological / order──► OrderedSeries
//!     │                                                                    │
//!     │                                                          merge(a, b)
//!     │                                                                    ▼
//!     └──────────────────────pivot──────────► DistributionTable      MergedSeries
//! ```
//!
//! Identical inputs always produce identical output ordering.

pub mod aggregate;
pub mod error;
pub mod merge;
pub mod ordering;
pub mod pivot;

pub use aggregate::aggregate;
pub use error::{SeriesError, SeriesResult};
pub use merge::merge;
pub use ordering::{chronological, order, reorder};
pub use pivot::pivot;
