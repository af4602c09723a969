//! Configuration management for the Flood harness
//!
//! This module provides a clean, layered approach to configuration:
//! - Core structures
//! - CLI argument parsing
//! - Configuration validation
//! - Preset constructors

pub mod defaults;
pub mod parser;
pub mod validation;

use crate::errors::Result;
use crate::profile::ProfilePlan;
use std::time::Duration;

/// Target server configuration
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub host: String,
    pub port: u16,
}

impl TargetConfig {
    /// Target address in `host:port` form
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Run scheduling and timeout configuration
///
/// All pacing lives here as named durations so tests can run the harness
/// with compressed time.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub client_count: u32,
    pub spawn_stagger: Duration,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub verbose: bool,
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub target: TargetConfig,
    pub run: RunConfig,
    pub profile: ProfilePlan,
    pub output: OutputConfig,
}

impl Config {
    /// Parse and validate configuration from command line arguments
    pub fn from_args() -> Result<Self> {
        let raw_config = parser::RawConfig::parse_from_args()?;
        let config = raw_config.try_into()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("🌊 Flood Test Configuration:");
        println!("   Target:            {}", self.target.addr());
        println!("   Sessions:          {}", self.run.client_count);
        println!("   Profile:           {}", self.profile.label());
        println!(
            "   Spawn stagger:     {}ms",
            self.run.spawn_stagger.as_millis()
        );
        println!(
            "   Connect timeout:   {}s",
            self.run.connect_timeout.as_secs()
        );
        println!(
            "   Response timeout:  {}s",
            self.run.response_timeout.as_secs()
        );
        println!();
    }
}
