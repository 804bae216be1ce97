//! Creation-time identifier allocation.

use crate::model::EntityId;
use chrono::{DateTime, Utc};

/// Issues strictly increasing ids derived from the creation clock.
///
/// A new id is the creation time in epoch milliseconds, or one past the
/// previous id when the clock has not advanced (or went backwards).
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last_issued: EntityId,
}

impl IdAllocator {
    /// Starts after `floor`, normally the highest id already stored.
    pub fn starting_after(floor: EntityId) -> Self {
        Self { last_issued: floor }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> EntityId {
        let candidate = now.timestamp_millis().max(self.last_issued.saturating_add(1));
        self.last_issued = candidate;
        candidate
    }

    pub fn last_issued(&self) -> EntityId {
        self.last_issued
    }
}
