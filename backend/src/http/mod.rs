//! HTTP server module.
//!
//! An axum-based server exposing the dashboard datasets as a read-only
//! REST API.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                  │
//! │  - Query parsing, JSON, CORS, error mapping  │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  Service Layer (services/)                   │
//! │  - One service per dashboard view            │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  Upstream Layer (upstream/)                  │
//! │  - ReportSource: OpenFdaClient / Static      │
//! └──────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
