//! Scripted behavior profiles executed by sessions
//!
//! A profile is pure data describing what a session sends, when it waits and
//! what it expects back. The interpreter that turns a profile into socket I/O
//! lives in the session module; profiles never touch shared state.

use crate::common::SessionId;
use crate::constants::*;
use std::time::Duration;

/// One session's scripted interaction sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorProfile {
    /// Send sequentially numbered messages, waiting for an echoed response
    /// after each one. Aborts on the first missed response.
    EchoStress { message_count: u32 },

    /// Send a heartbeat every `interval` for `total_duration`. The session
    /// must stay connected the whole time; a missed echo is tolerated, a
    /// peer close is not.
    ActiveHeartbeat {
        interval: Duration,
        total_duration: Duration,
    },

    /// Connect, go silent for `idle_duration`, then probe the connection
    /// once. The passing outcome is that the server has already kicked us.
    ZombieIdle { idle_duration: Duration },

    /// Read the welcome text, join a room, send one chat message and linger
    /// to collect any room broadcasts before disconnecting.
    RoomJoiner {
        room_id: u32,
        chat_message: String,
        linger: Duration,
    },
}

impl BehaviorProfile {
    /// Short name used in logs and the config summary
    pub fn label(&self) -> &'static str {
        match self {
            BehaviorProfile::EchoStress { .. } => "echo-stress",
            BehaviorProfile::ActiveHeartbeat { .. } => "heartbeat",
            BehaviorProfile::ZombieIdle { .. } => "zombie-idle",
            BehaviorProfile::RoomJoiner { .. } => "room-joiner",
        }
    }
}

/// Scenario selection for a whole run, with its compiled-in parameters.
///
/// The plan is the profile factory: it assigns each session ordinal its
/// concrete `BehaviorProfile` (room ids alternate across sessions, message
/// payloads embed the session id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePlan {
    EchoStress {
        message_count: u32,
    },
    ActiveHeartbeat {
        interval: Duration,
        total_duration: Duration,
    },
    ZombieIdle {
        idle_duration: Duration,
    },
    RoomJoiner {
        room_count: u32,
        linger: Duration,
    },
}

impl ProfilePlan {
    /// Default echo-stress scenario
    pub fn echo_stress() -> Self {
        ProfilePlan::EchoStress {
            message_count: ECHO_MESSAGES_PER_SESSION,
        }
    }

    /// Default heartbeat-survival scenario
    pub fn heartbeat() -> Self {
        ProfilePlan::ActiveHeartbeat {
            interval: Duration::from_secs(HEARTBEAT_INTERVAL_SECS),
            total_duration: Duration::from_secs(HEARTBEAT_DURATION_SECS),
        }
    }

    /// Default idle-timeout-violation scenario
    pub fn zombie_idle() -> Self {
        ProfilePlan::ZombieIdle {
            idle_duration: Duration::from_secs(ZOMBIE_IDLE_SECS),
        }
    }

    /// Default room-join-and-chat scenario
    pub fn room_joiner() -> Self {
        ProfilePlan::RoomJoiner {
            room_count: ROOM_COUNT,
            linger: Duration::from_secs(ROOM_LINGER_SECS),
        }
    }

    /// Build the concrete profile for one session ordinal
    pub fn for_session(&self, id: SessionId) -> BehaviorProfile {
        match self {
            ProfilePlan::EchoStress { message_count } => BehaviorProfile::EchoStress {
                message_count: *message_count,
            },
            ProfilePlan::ActiveHeartbeat {
                interval,
                total_duration,
            } => BehaviorProfile::ActiveHeartbeat {
                interval: *interval,
                total_duration: *total_duration,
            },
            ProfilePlan::ZombieIdle { idle_duration } => BehaviorProfile::ZombieIdle {
                idle_duration: *idle_duration,
            },
            ProfilePlan::RoomJoiner { room_count, linger } => {
                // Spread sessions evenly across rooms, ids are 1-based
                let rooms = (*room_count).max(1);
                let room_id = (id.get() % rooms) + 1;
                BehaviorProfile::RoomJoiner {
                    room_id,
                    chat_message: format!("Hello room {}! I am client {}.", room_id, id),
                    linger: *linger,
                }
            }
        }
    }

    /// Short name used in logs and the config summary
    pub fn label(&self) -> &'static str {
        match self {
            ProfilePlan::EchoStress { .. } => "echo-stress",
            ProfilePlan::ActiveHeartbeat { .. } => "heartbeat",
            ProfilePlan::ZombieIdle { .. } => "zombie-idle",
            ProfilePlan::RoomJoiner { .. } => "room-joiner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_assignment_alternates() {
        let plan = ProfilePlan::RoomJoiner {
            room_count: 2,
            linger: Duration::from_secs(1),
        };

        let rooms: Vec<u32> = (0..4)
            .map(|i| match plan.for_session(SessionId::new(i)) {
                BehaviorProfile::RoomJoiner { room_id, .. } => room_id,
                other => panic!("unexpected profile: {:?}", other),
            })
            .collect();

        assert_eq!(rooms, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_chat_message_embeds_session_id() {
        let plan = ProfilePlan::room_joiner();
        match plan.for_session(SessionId::new(7)) {
            BehaviorProfile::RoomJoiner { chat_message, .. } => {
                assert!(chat_message.contains("client 7"));
            }
            other => panic!("unexpected profile: {:?}", other),
        }
    }

    #[test]
    fn test_default_plans_use_compiled_parameters() {
        match ProfilePlan::echo_stress() {
            ProfilePlan::EchoStress { message_count } => {
                assert_eq!(message_count, ECHO_MESSAGES_PER_SESSION);
            }
            other => panic!("unexpected plan: {:?}", other),
        }

        match ProfilePlan::heartbeat() {
            ProfilePlan::ActiveHeartbeat {
                interval,
                total_duration,
            } => {
                assert_eq!(interval, Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
                assert_eq!(
                    total_duration,
                    Duration::from_secs(HEARTBEAT_DURATION_SECS)
                );
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(ProfilePlan::echo_stress().label(), "echo-stress");
        assert_eq!(ProfilePlan::zombie_idle().label(), "zombie-idle");
        assert_eq!(
            ProfilePlan::room_joiner()
                .for_session(SessionId::new(0))
                .label(),
            "room-joiner"
        );
    }
}
