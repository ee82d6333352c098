//! Gas metering.
//!
//! Exhaustion is reported as [`AnteError::OutOfGas`] instead of unwinding;
//! the meter records the attempted total so the error carries `gasUsed`.

use super::errors::AnteError;

/// Consumed-gas accounting for one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GasMeter {
    /// Genesis transactions are not metered.
    Infinite { consumed: u64 },
    Limited { limit: u64, consumed: u64 },
}

impl GasMeter {
    pub fn infinite() -> Self {
        GasMeter::Infinite { consumed: 0 }
    }

    pub fn limited(limit: u64) -> Self {
        GasMeter::Limited { limit, consumed: 0 }
    }

    pub fn consumed(&self) -> u64 {
        match self {
            GasMeter::Infinite { consumed } | GasMeter::Limited { consumed, .. } => *consumed,
        }
    }

    /// `None` for the infinite meter.
    pub fn limit(&self) -> Option<u64> {
        match self {
            GasMeter::Infinite { .. } => None,
            GasMeter::Limited { limit, .. } => Some(*limit),
        }
    }

    pub fn is_past_limit(&self) -> bool {
        match self {
            GasMeter::Infinite { .. } => false,
            GasMeter::Limited { limit, consumed } => consumed > limit,
        }
    }

    /// Charge `amount`, failing once the total passes the limit.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), AnteError> {
        match self {
            GasMeter::Infinite { consumed } => {
                *consumed = consumed.saturating_add(amount);
                Ok(())
            }
            GasMeter::Limited { limit, consumed } => {
                let total = consumed.checked_add(amount).ok_or_else(|| AnteError::OutOfGas {
                    descriptor: format!("{} (overflow)", descriptor),
                    limit: *limit,
                    used: u64::MAX,
                })?;
                *consumed = total;
                if total > *limit {
                    return Err(AnteError::OutOfGas {
                        descriptor: descriptor.to_string(),
                        limit: *limit,
                        used: total,
                    });
                }
                Ok(())
            }
        }
    }
}

impl Default for GasMeter {
    fn default() -> Self {
        GasMeter::infinite()
    }
}
