//! Capacity limits for an arena.
//!
//! An arena never frees individual slots, so these limits are the whole
//! memory contract: once either pool is spent, every allocating call fails
//! with an exhaustion code until the arena is reset.

/// Capacity limits for an [`Arena`](super::Arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaLimits {
    /// Maximum number of slots (the root node is not counted) (E001)
    pub max_slots: u64,
    /// Maximum total bytes of copied strings, keys and raw payloads (E002)
    pub max_string_bytes: u64,
    /// Maximum container nesting accepted on import, and walked when
    /// comparing, copying or serializing (E101)
    pub max_nesting_depth: u64,
}

impl ArenaLimits {
    /// Small fixed budget for memory-constrained targets.
    pub const fn embedded() -> Self {
        Self {
            max_slots: 512,             // 512 slots
            max_string_bytes: 8 * 1024, // 8 KiB
            max_nesting_depth: 10,      // 10 levels
        }
    }

    /// Generous limits for host-side tooling.
    pub const fn lenient() -> Self {
        Self {
            max_slots: 1 << 20,                // ~1M slots
            max_string_bytes: 64 * 1024 * 1024, // 64 MiB
            max_nesting_depth: 128,            // 128 levels
        }
    }

    /// Remaining string bytes given the number already used.
    pub fn string_bytes_available(&self, used: u64) -> u64 {
        self.max_string_bytes.saturating_sub(used)
    }
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self::embedded()
    }
}
