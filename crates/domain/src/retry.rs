//! Retry policy for commands that lose an optimistic concurrency race.

/// How often a command is re-run after a concurrency conflict.
///
/// A retry reloads the flight and decides again against fresh state, so a
/// booking that fitted the stale snapshot may now be rejected as an overbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Surface the first conflict to the caller.
    Never,

    /// Reload and re-run the command once.
    #[default]
    Once,
}

impl RetryPolicy {
    /// Builds a policy from an on/off switch.
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Once } else { Self::Never }
    }

    /// Maximum number of attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Never => 1,
            Self::Once => 2,
        }
    }

    /// Returns true if another attempt may follow attempt number `attempt` (1-based).
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }
}
