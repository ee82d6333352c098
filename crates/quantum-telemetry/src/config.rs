//! Telemetry settings, read from `QC_*` environment variables.

use std::env;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// "04" ledger, "10" ante, "00" for the whole node
    pub subsystem_id: String,

    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,

    pub json_logs: bool,

    /// Register the Prometheus collectors on init
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "quantum-chain".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Defaults overridden by `QC_SERVICE_NAME`, `QC_SUBSYSTEM_ID`,
    /// `QC_LOG_LEVEL`, `QC_JSON_LOGS` and `QC_METRICS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: env::var("QC_SERVICE_NAME").unwrap_or(defaults.service_name),
            subsystem_id: env::var("QC_SUBSYSTEM_ID").unwrap_or(defaults.subsystem_id),
            log_level: env::var("QC_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: flag("QC_JSON_LOGS", defaults.json_logs),
            metrics_enabled: flag("QC_METRICS", defaults.metrics_enabled),
        }
    }

    /// Environment settings named after one subsystem, e.g. `qc-10-ante`.
    pub fn for_subsystem(subsystem_id: &str, subsystem_name: &str) -> Self {
        Self {
            subsystem_id: subsystem_id.to_string(),
            service_name: format!("qc-{}-{}", subsystem_id, subsystem_name),
            ..Self::from_env()
        }
    }
}

fn flag(var: &str, default: bool) -> bool {
    env::var(var).map(|v| parse_flag(&v, default)).unwrap_or(default)
}

fn parse_flag(v: &str, default: bool) -> bool {
    match v.to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}
