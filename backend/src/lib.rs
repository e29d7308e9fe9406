//! # MAUDE Trends Backend
//!
//! Calendar-aligned analysis of openFDA device adverse-event report counts.
//!
//! The upstream API answers a count query with a sparse list of
//! `(date, count)` pairs. This crate turns those pairs into the datasets a
//! trends dashboard plots: totals per year, per calendar month and per
//! weekday for two date fields side by side, a per-month distribution
//! of counts across years, breakdowns by event type and device class, and
//! a filtered report listing.
//!
//! ## Architecture
//!
//! - [`models`]: dates, periods, and the series value types
//! - [`series`]: the pure pipeline (aggregate, order, merge, pivot)
//! - [`upstream`]: query URLs, response decoding, and the [`upstream::ReportSource`] trait
//! - [`services`]: dashboard datasets built from fetched data
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based REST API (feature `http-server`)
//!
//! ## Example
//!
//! ```
//! use maude_trends::models::{Granularity, RawSeries};
//! use maude_trends::series::{aggregate, order};
//!
//! let raw = RawSeries::from_terms(vec![("20200115", 3), ("20210320", 2)]).unwrap();
//! let monthly = order(&aggregate(&raw, Granularity::Month));
//!
//! assert_eq!(monthly.labels()[0], "January");
//! assert_eq!(monthly.get("March"), Some(2));
//! ```

pub mod config;
pub mod models;
pub mod series;
pub mod services;
pub mod upstream;

#[cfg(feature = "http-server")]
pub mod http;
