use super::types::{Config, ConfigError, SignerBackend, TriggerBackend};

/// Semantic validation beyond what deserialization enforces.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.installer.advertised_host.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "installer.advertised_host must not be empty".to_string(),
        ));
    }

    if config.orchestrator.completion_poll_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "orchestrator.completion_poll_interval_ms must be greater than zero".to_string(),
        ));
    }

    if config.signing.backend == SignerBackend::Command
        && config.signing.command.as_deref().unwrap_or("").is_empty()
    {
        return Err(ConfigError::Invalid(
            "signing.command is required when signing.backend = \"command\"".to_string(),
        ));
    }

    if config.trigger.backend == TriggerBackend::Command
        && config.trigger.command.as_deref().unwrap_or("").is_empty()
    {
        return Err(ConfigError::Invalid(
            "trigger.command is required when trigger.backend = \"command\"".to_string(),
        ));
    }

    Ok(())
}
