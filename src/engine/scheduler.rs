//! Gapless playback scheduling for streamed audio chunks.
//!
//! Chunks arrive at irregular network intervals but must play back-to-back.
//! A single cursor on the output clock marks where the next chunk begins:
//! each chunk starts at `max(cursor, now)` and pushes the cursor forward by
//! exactly its own duration. A late chunk therefore plays immediately instead
//! of waiting on a cursor that fell behind the clock, and the cursor never
//! drifts with wall time.

use super::audio::SourceId;
use std::collections::BTreeSet;

/// Where a chunk landed on the output clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledSlot {
    pub id: SourceId,
    pub start: f64,
    pub duration: f64,
}

impl ScheduledSlot {
    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    next_start_time: f64,
    pending: BTreeSet<SourceId>,
    next_id: u64,
}

impl PlaybackScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot for a chunk of `duration` seconds given the
    /// output clock reads `now`. The slot is tracked as pending until
    /// [`release`](Self::release) or [`interrupt`](Self::interrupt).
    pub fn plan(&mut self, now: f64, duration: f64) -> ScheduledSlot {
        let start = self.next_start_time.max(now);
        self.next_start_time = start + duration;
        let id = SourceId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id);
        ScheduledSlot { id, start, duration }
    }

    /// Forget a source that finished playing. Returns whether it was pending.
    pub fn release(&mut self, id: SourceId) -> bool {
        self.pending.remove(&id)
    }

    /// Barge-in: drop every pending source and rewind the cursor to zero.
    /// Returns the sources the caller must silence.
    pub fn interrupt(&mut self) -> Vec<SourceId> {
        self.next_start_time = 0.0;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    #[must_use]
    pub const fn next_start_time(&self) -> f64 {
        self.next_start_time
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_pending(&self, id: SourceId) -> bool {
        self.pending.contains(&id)
    }
}
