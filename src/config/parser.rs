//! Command-line argument parsing for Flood configuration

use clap::{Parser, ValueEnum};
use std::time::Duration;

use super::{Config, OutputConfig, RunConfig, TargetConfig};
use crate::constants::{CONNECT_TIMEOUT_SECS, RESPONSE_TIMEOUT_SECS, SPAWN_STAGGER_MS};
use crate::errors::{FloodError, Result};
use crate::profile::ProfilePlan;

/// Behavior profile selection for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Send numbered messages and wait for each echo
    EchoStress,
    /// Send periodic heartbeats and expect to survive the idle timeout
    Heartbeat,
    /// Go silent past the idle timeout and expect to be kicked
    ZombieIdle,
    /// Join a chat room, send one message and linger for broadcasts
    RoomJoiner,
}

/// Raw configuration from command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flood",
    version,
    about = "A concurrent load and behavior testing harness for line-oriented TCP chat servers",
    long_about = None
)]
pub struct RawConfig {
    /// Target host
    #[arg(value_name = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Target port
    #[arg(value_name = "PORT", default_value = "9000")]
    pub port: u16,

    /// Number of concurrent client sessions
    #[arg(value_name = "CLIENTS", default_value = "100")]
    pub clients: u32,

    /// Behavior profile every session runs. Profile parameters (message
    /// counts, durations) are compiled into the scenario, not taken from
    /// flags.
    #[arg(
        short = 'p',
        long = "profile",
        value_enum,
        default_value = "echo-stress"
    )]
    pub profile: ProfileArg,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl RawConfig {
    /// Parse from command line arguments
    pub fn parse_from_args() -> Result<Self> {
        Ok(Self::parse())
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = FloodError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let profile = match raw.profile {
            ProfileArg::EchoStress => ProfilePlan::echo_stress(),
            ProfileArg::Heartbeat => ProfilePlan::heartbeat(),
            ProfileArg::ZombieIdle => ProfilePlan::zombie_idle(),
            ProfileArg::RoomJoiner => ProfilePlan::room_joiner(),
        };

        Ok(Config {
            target: TargetConfig {
                host: raw.host,
                port: raw.port,
            },
            run: RunConfig {
                client_count: raw.clients,
                spawn_stagger: Duration::from_millis(SPAWN_STAGGER_MS),
                connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
                response_timeout: Duration::from_secs(RESPONSE_TIMEOUT_SECS),
            },
            output: OutputConfig {
                verbose: raw.verbose,
            },
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_positional_defaults() {
        let raw = RawConfig::try_parse_from(["flood"]).expect("defaults should parse");
        assert_eq!(raw.host, "127.0.0.1");
        assert_eq!(raw.port, 9000);
        assert_eq!(raw.clients, 100);
        assert_eq!(raw.profile, ProfileArg::EchoStress);
        assert!(!raw.verbose);
    }

    #[test]
    fn test_positional_overrides() {
        let raw = RawConfig::try_parse_from(["flood", "10.0.0.5", "4000", "25", "-p", "heartbeat"])
            .expect("arguments should parse");
        assert_eq!(raw.host, "10.0.0.5");
        assert_eq!(raw.port, 4000);
        assert_eq!(raw.clients, 25);
        assert_eq!(raw.profile, ProfileArg::Heartbeat);
    }

    #[test]
    fn test_raw_config_conversion() {
        let raw = RawConfig::try_parse_from(["flood", "localhost", "9000", "3", "-p", "zombie-idle"])
            .expect("arguments should parse");
        let config: Config = raw.try_into().expect("conversion should succeed");

        assert_eq!(config.target.addr(), "localhost:9000");
        assert_eq!(config.run.client_count, 3);
        assert_eq!(config.profile, ProfilePlan::zombie_idle());
        assert_eq!(
            config.run.spawn_stagger,
            Duration::from_millis(SPAWN_STAGGER_MS)
        );
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(RawConfig::try_parse_from(["flood", "127.0.0.1", "not-a-port"]).is_err());
    }
}
