//! Integration tests module
//!
//! End-to-end tests for the profitability pipeline, including:
//! - Complete extract → count → score → compare runs
//! - Degraded enrichment and aborted runs
//! - HTTP collaborators against wiremock servers

pub mod error_scenarios;
pub mod fixtures;
