//! Shared identifiers used across the codebase

/// Type-safe wrapper for a session ordinal to prevent confusion with other
/// numeric types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u32);

impl SessionId {
    /// Create a new SessionId
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying u32 value
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for SessionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<SessionId> for u32 {
    fn from(session_id: SessionId) -> Self {
        session_id.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
