//! Application-wide constants and configuration values

// Session limits
pub const MAX_CLIENTS_LIMIT: u32 = 10_000;

// Scheduling constants
pub const SPAWN_STAGGER_MS: u64 = 150;

// Timeout constants
pub const CONNECT_TIMEOUT_SECS: u64 = 5;
pub const RESPONSE_TIMEOUT_SECS: u64 = 5;
pub const WELCOME_DRAIN_MS: u64 = 500;

// Scenario parameters, compiled into the chosen profile rather than exposed
// as flags
pub const ECHO_MESSAGES_PER_SESSION: u32 = 10;
pub const HEARTBEAT_INTERVAL_SECS: u64 = 1;
pub const HEARTBEAT_DURATION_SECS: u64 = 10;
pub const ZOMBIE_IDLE_SECS: u64 = 7;
pub const ROOM_COUNT: u32 = 2;
pub const ROOM_LINGER_SECS: u64 = 3;
