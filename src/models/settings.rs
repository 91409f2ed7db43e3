use serde::{Deserialize, Serialize};

pub const DEFAULT_COMMISSION_RATE: f64 = 10.0;
pub const MIN_COMMISSION_RATE: f64 = 0.0;
pub const MAX_COMMISSION_RATE: f64 = 50.0;

/// Singleton platform settings row. The commission rate is read at settlement
/// time and snapshotted onto each payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    pub commission_rate: f64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
        }
    }
}
