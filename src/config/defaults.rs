//! Preset configuration constructors

use super::{Config, OutputConfig, RunConfig, TargetConfig};
use crate::constants::{CONNECT_TIMEOUT_SECS, RESPONSE_TIMEOUT_SECS, SPAWN_STAGGER_MS};
use crate::profile::ProfilePlan;
use std::time::Duration;

impl Config {
    /// Create a configuration with default pacing for the given target and
    /// profile plan. Tests override the duration fields to compress time.
    pub fn preset(host: &str, port: u16, clients: u32, profile: ProfilePlan) -> Self {
        Self {
            target: TargetConfig {
                host: host.to_string(),
                port,
            },
            run: RunConfig {
                client_count: clients,
                spawn_stagger: Duration::from_millis(SPAWN_STAGGER_MS),
                connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
                response_timeout: Duration::from_secs(RESPONSE_TIMEOUT_SECS),
            },
            profile,
            output: OutputConfig { verbose: false },
        }
    }
}
