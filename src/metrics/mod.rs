//! Metrics aggregation and reporting
//!
//! This module provides run-wide result accumulation:
//! - Thread-safe aggregation of per-session results
//! - Final report rendering

pub mod aggregate;
pub mod reporting;

pub use aggregate::{AggregateReport, MetricsAggregator};
