//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `token_transfers_total` - Successful transfers (direct and delegated)
//! - `token_approvals_total` - Successful approvals
//! - `token_rejected_ops_total` - Operations rejected by a precondition
//! - `token_op_duration_seconds` - Histogram of operation latencies
//! - `token_holders` - Accounts with a nonzero balance

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone, Debug)]
pub struct Metrics {
    /// Successful transfers
    pub transfers_total: IntCounter,

    /// Successful approvals
    pub approvals_total: IntCounter,

    /// Rejected operations
    pub rejected_ops_total: IntCounter,

    /// Operation duration histogram
    pub op_duration: Histogram,

    /// Accounts with a nonzero balance
    pub holders: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total = IntCounter::new(
            "token_transfers_total",
            "Successful transfers (direct and delegated)",
        )?;
        registry.register(Box::new(transfers_total.clone()))?;

        let approvals_total = IntCounter::new("token_approvals_total", "Successful approvals")?;
        registry.register(Box::new(approvals_total.clone()))?;

        let rejected_ops_total = IntCounter::new(
            "token_rejected_ops_total",
            "Operations rejected by a precondition",
        )?;
        registry.register(Box::new(rejected_ops_total.clone()))?;

        let op_duration = Histogram::with_opts(
            HistogramOpts::new(
                "token_op_duration_seconds",
                "Histogram of operation latencies",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100]),
        )?;
        registry.register(Box::new(op_duration.clone()))?;

        let holders = IntGauge::new("token_holders", "Accounts with a nonzero balance")?;
        registry.register(Box::new(holders.clone()))?;

        Ok(Self {
            transfers_total,
            approvals_total,
            rejected_ops_total,
            op_duration,
            holders,
            registry,
        })
    }

    /// Record a successful transfer
    pub fn record_transfer(&self) {
        self.transfers_total.inc();
    }

    /// Record a successful approval
    pub fn record_approval(&self) {
        self.approvals_total.inc();
    }

    /// Record a rejected operation
    pub fn record_rejection(&self) {
        self.rejected_ops_total.inc();
    }

    /// Record operation duration
    pub fn record_op_duration(&self, duration_seconds: f64) {
        self.op_duration.observe(duration_seconds);
    }

    /// Update the holder-count gauge
    pub fn set_holders(&self, count: usize) {
        self.holders.set(count as i64);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
