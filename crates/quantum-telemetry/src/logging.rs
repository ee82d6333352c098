//! Structured logging.
//!
//! One `tracing-subscriber` registry with an env filter and either a JSON
//! or a human-readable layer. Events carry a `subsystem` field so ledger
//! and ante lines can be split apart downstream.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::LoggingInit`] if one is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    }
    .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        subsystem = %config.subsystem_id,
        json_logs = config.json_logs,
        "logging initialized"
    );
    Ok(())
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $subsystem:expr, $msg:expr, $height:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            height = $height,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tx_event_expands_without_subscriber() {
        crate::log_tx_event!(warn, "ante", "rejected", 7_i64, code = 5u32);
    }

    #[test]
    fn test_second_install_is_rejected() {
        let config = TelemetryConfig::default();
        // the first install may race with another test; the second never wins
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(TelemetryError::LoggingInit(_))));
    }
}
