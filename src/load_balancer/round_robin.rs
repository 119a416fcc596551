//! Round-robin selection.

use crate::load_balancer::endpoint::Endpoint;

/// Round-robin selector.
/// Holds the monotonic cursor; callers serialize access (the registry lock).
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: u64,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick `active[cursor % len]` and advance the cursor.
    ///
    /// The cursor is left untouched when `active` is empty.
    pub fn next<'a>(&mut self, active: &'a [Endpoint]) -> Option<&'a Endpoint> {
        if active.is_empty() {
            return None;
        }

        let index = (self.cursor % active.len() as u64) as usize;
        self.cursor = self.cursor.wrapping_add(1);
        active.get(index)
    }

    /// Number of selections made so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }
}
