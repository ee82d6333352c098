//! Prometheus metrics for the asset ledger and the ante chain.
//!
//! All metrics follow the naming convention: `qc_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ANTE METRICS (Subsystem 10)
    // =========================================================================

    /// Transactions that passed every ante stage
    pub static ref ANTE_TX_ADMITTED: CounterVec = CounterVec::new(
        Opts::new("qc_ante_tx_admitted_total", "Transactions admitted by the ante chain"),
        &["mode"]  // mode: check/recheck/deliver
    ).expect("metric creation failed");

    /// Transactions rejected, by the stage that rejected them
    pub static ref ANTE_TX_REJECTED: CounterVec = CounterVec::new(
        Opts::new("qc_ante_tx_rejected_total", "Transactions rejected by the ante chain"),
        &["stage", "codespace"]
    ).expect("metric creation failed");

    /// Gas consumed by the ante chain per transaction
    pub static ref ANTE_GAS_CONSUMED: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "qc_ante_gas_consumed",
            "Gas consumed by the ante chain per transaction"
        ).buckets(exponential_buckets(100.0, 2.0, 14).expect("bucket creation failed"))
    ).expect("metric creation failed");

    /// Signature verifications
    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("qc_signature_verifications_total", "Total signature verifications"),
        &["type", "result"]  // type: secp256k1, result: valid/invalid
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER METRICS (Subsystem 4)
    // =========================================================================

    /// Keeper operations by name and outcome
    pub static ref LEDGER_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("qc_ledger_operations_total", "Asset keeper operations"),
        &["op", "outcome"]  // outcome: ok/err
    ).expect("metric creation failed");

    /// Coins created
    pub static ref LEDGER_COINS_CREATED: Counter = Counter::new(
        "qc_ledger_coins_created_total",
        "Total number of coin types created"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ante
        Box::new(ANTE_TX_ADMITTED.clone()),
        Box::new(ANTE_TX_REJECTED.clone()),
        Box::new(ANTE_GAS_CONSUMED.clone()),
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
        // Ledger
        Box::new(LEDGER_OPERATIONS.clone()),
        Box::new(LEDGER_COINS_CREATED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
