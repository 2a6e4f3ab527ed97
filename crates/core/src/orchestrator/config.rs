//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the bulk install orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Pause between install triggers (milliseconds).
    /// Lets the device's install-confirmation prompt settle before the next
    /// one is pushed at it.
    #[serde(default = "default_inter_trigger_delay")]
    pub inter_trigger_delay_ms: u64,

    /// How often the completion loop re-inspects package statuses
    /// (milliseconds). The loop never times out on its own; cancellation is
    /// the caller's responsibility.
    #[serde(default = "default_completion_poll_interval")]
    pub completion_poll_interval_ms: u64,
}

fn default_inter_trigger_delay() -> u64 {
    2500 // 2.5 seconds
}

fn default_completion_poll_interval() -> u64 {
    1000 // 1 second
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            inter_trigger_delay_ms: default_inter_trigger_delay(),
            completion_poll_interval_ms: default_completion_poll_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.inter_trigger_delay_ms, 2500);
        assert_eq!(config.completion_poll_interval_ms, 1000);
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            inter_trigger_delay_ms = 100
        "#;
        let config: OrchestratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.inter_trigger_delay_ms, 100);
        assert_eq!(config.completion_poll_interval_ms, 1000);
    }
}
