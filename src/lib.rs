//! Flood is a load and behavior testing harness for line-oriented TCP chat
//! servers. It spawns many concurrent client sessions against a target
//! host:port, drives each through a scripted behavior profile, and aggregates
//! the per-session outcomes into a final report.

pub mod common;
pub mod config;
pub mod constants;
pub mod errors;
pub mod metrics;
pub mod profile;
pub mod session;
