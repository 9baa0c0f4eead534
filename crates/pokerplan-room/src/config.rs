//! Room lifetime configuration.

use std::time::Duration;

/// Thresholds for the expiry reaper.
#[derive(Debug, Clone)]
pub struct RoomsConfig {
    /// How long a zero-occupancy room is kept before eviction.
    pub idle_empty_grace: Duration,

    /// Absolute lifetime cap, regardless of occupancy.
    pub max_age: Duration,

    /// How often the reaper sweeps the registry.
    pub sweep_interval: Duration,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            idle_empty_grace: Duration::from_secs(10 * 60),
            max_age: Duration::from_secs(2 * 60 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoomsConfig::default();
        assert_eq!(config.idle_empty_grace, Duration::from_secs(600));
        assert_eq!(config.max_age, Duration::from_secs(7200));
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
    }
}
