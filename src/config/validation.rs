//! Configuration validation logic

use super::Config;
use crate::constants::MAX_CLIENTS_LIMIT;
use crate::errors::{FloodError, Result};

/// Validate the configuration
pub fn validate(config: &Config) -> Result<()> {
    validate_target(config)?;
    validate_run_config(config)?;
    Ok(())
}

/// Validate target configuration
fn validate_target(config: &Config) -> Result<()> {
    if config.target.host.trim().is_empty() {
        return Err(FloodError::config("Target host cannot be empty"));
    }

    if config.target.port == 0 {
        return Err(FloodError::config("Target port must be greater than 0"));
    }

    Ok(())
}

/// Validate run scheduling configuration
fn validate_run_config(config: &Config) -> Result<()> {
    if config.run.client_count == 0 {
        return Err(FloodError::config(
            "Number of sessions must be greater than 0",
        ));
    }

    if config.run.client_count > MAX_CLIENTS_LIMIT {
        return Err(FloodError::config(format!(
            "Number of sessions cannot exceed {}",
            MAX_CLIENTS_LIMIT
        )));
    }

    if config.run.connect_timeout.is_zero() {
        return Err(FloodError::config("Connect timeout must be greater than 0"));
    }

    if config.run.response_timeout.is_zero() {
        return Err(FloodError::config(
            "Response timeout must be greater than 0",
        ));
    }

    Ok(())
}
