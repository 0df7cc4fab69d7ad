//! The atomic sliding-window evaluation procedure.
//!
//! Everything correctness-critical in the crate lives here: prune stale
//! entries, count survivors, decide, conditionally record, and compute the
//! next-available time, as one procedure. The mutating (`admit`) and
//! read-only paths share this single definition so they cannot silently
//! diverge in pruning or next-available-time computation. Engines are
//! responsible for running it as an indivisible unit per key.

use std::collections::BTreeSet;

use crate::decision::Decision;

/// One admitted event.
///
/// The timestamp orders entries and decides window membership; the sequence
/// number only distinguishes admissions that land on the same millisecond,
/// so a store keyed by the full entry never coalesces simultaneous
/// admissions into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventEntry {
    /// Admission time in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Tie-breaker for entries sharing a timestamp.
    pub seq: u64,
}

/// Per-identifier window state: an ordered set of admitted events plus the
/// store-level expiry deadline.
///
/// Entries are write-once: created by an admitting evaluation, read and
/// pruned by any evaluation, destroyed wholesale by a delete. Nothing is
/// ever mutated in place.
#[derive(Debug, Default)]
pub struct WindowLog {
    entries: BTreeSet<EventEntry>,
    expires_at_ms: u64,
    next_seq: u64,
}

impl WindowLog {
    /// Whether the log currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries currently held, live or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Run the sliding-window evaluation against this log.
    ///
    /// 1. Drop every entry with `timestamp < now_ms - window_ms`. This
    ///    happens on every call, admitting or not; staleness is enforced
    ///    lazily rather than by a background sweep.
    /// 2. `remaining = max_requests - surviving count`.
    /// 3. `is_limited = remaining <= 0`, decided before anything is
    ///    recorded.
    /// 4. If `admit` and not limited: record an entry at `now_ms`, consume
    ///    one unit of capacity, and push the store expiry out to one full
    ///    window past the newest entry.
    /// 5. Next-available time is the oldest survivor's timestamp plus the
    ///    window, or `now_ms` when nothing survives.
    ///
    /// An entry aged exactly `window_ms` still counts; it falls out one
    /// millisecond later.
    pub fn evaluate(
        &mut self,
        now_ms: u64,
        window_ms: u64,
        max_requests: u64,
        admit: bool,
    ) -> Decision {
        // A log whose store expiry has passed would already have been
        // reclaimed by a real store.
        if now_ms > self.expires_at_ms {
            self.entries.clear();
        }

        let cutoff = now_ms.saturating_sub(window_ms);
        self.entries = self.entries.split_off(&EventEntry {
            timestamp_ms: cutoff,
            seq: 0,
        });

        let count = self.entries.len() as i64;
        let mut remaining = max_requests as i64 - count;
        let is_limited = remaining <= 0;

        if admit && !is_limited {
            self.entries.insert(EventEntry {
                timestamp_ms: now_ms,
                seq: self.next_seq,
            });
            self.next_seq = self.next_seq.wrapping_add(1);
            remaining -= 1;
            self.expires_at_ms = now_ms + window_ms;
        }

        let next_available_at = match self.entries.iter().next() {
            Some(oldest) => oldest.timestamp_ms + window_ms,
            None => now_ms,
        };

        Decision {
            remaining_requests: remaining,
            next_available_at,
            is_limited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: u64 = 60_000;
    const MAX: u64 = 10;

    #[test]
    fn test_admit_consumes_capacity() {
        let mut log = WindowLog::default();

        let decision = log.evaluate(1_000, WINDOW, MAX, true);
        assert!(!decision.is_limited);
        assert_eq!(decision.remaining_requests, 9);
        assert_eq!(decision.next_available_at, 1_000 + WINDOW);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_observe_counts_without_recording() {
        let mut log = WindowLog::default();
        log.evaluate(1_000, WINDOW, MAX, true);

        let decision = log.evaluate(1_000, WINDOW, MAX, false);
        assert!(!decision.is_limited);
        assert_eq!(decision.remaining_requests, 9);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_limited_call_does_not_record() {
        let mut log = WindowLog::default();
        for i in 0..MAX {
            let decision = log.evaluate(1_000 + i, WINDOW, MAX, true);
            assert!(!decision.is_limited);
        }

        let decision = log.evaluate(2_000, WINDOW, MAX, true);
        assert!(decision.is_limited);
        assert_eq!(decision.remaining_requests, 0);
        assert_eq!(log.len(), MAX as usize);
    }

    #[test]
    fn test_entry_survives_exactly_one_window() {
        let mut log = WindowLog::default();
        log.evaluate(1_000, WINDOW, MAX, true);

        // Aged exactly window_ms: still counted.
        let decision = log.evaluate(1_000 + WINDOW, WINDOW, MAX, false);
        assert_eq!(decision.remaining_requests, 9);

        // One millisecond later: pruned.
        let decision = log.evaluate(1_000 + WINDOW + 1, WINDOW, MAX, false);
        assert_eq!(decision.remaining_requests, 10);
        assert!(log.is_empty());
    }

    #[test]
    fn test_expiry_frees_one_unit_per_entry() {
        let mut log = WindowLog::default();
        for i in 0..MAX {
            log.evaluate(1_000 * (i + 1), WINDOW, MAX, true);
        }

        // Oldest entry (t=1000) has just aged out; exactly one unit frees.
        let decision = log.evaluate(1_001 + WINDOW, WINDOW, MAX, true);
        assert!(!decision.is_limited);
        assert_eq!(decision.remaining_requests, 0);
        assert_eq!(decision.next_available_at, 2_000 + WINDOW);
    }

    #[test]
    fn test_same_millisecond_admissions_are_distinct() {
        let mut log = WindowLog::default();

        let first = log.evaluate(5_000, WINDOW, MAX, true);
        let second = log.evaluate(5_000, WINDOW, MAX, true);

        assert_eq!(first.remaining_requests, 9);
        assert_eq!(second.remaining_requests, 8);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_next_available_without_survivors_is_now() {
        let mut log = WindowLog::default();
        let decision = log.evaluate(42_000, WINDOW, MAX, false);
        assert_eq!(decision.next_available_at, 42_000);
    }

    #[test]
    fn test_lowered_capacity_reports_deficit() {
        let mut log = WindowLog::default();
        for _ in 0..5 {
            log.evaluate(1_000, WINDOW, 5, true);
        }

        // Capacity drops below the live count between calls.
        let decision = log.evaluate(1_500, WINDOW, 3, true);
        assert!(decision.is_limited);
        assert_eq!(decision.remaining_requests, -2);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_store_expiry_clears_stale_log() {
        let mut log = WindowLog::default();
        log.evaluate(1_000, WINDOW, MAX, true);

        // Past the store expiry the log reads as never seen.
        let decision = log.evaluate(1_000 + WINDOW + 1, WINDOW, MAX, false);
        assert_eq!(decision.remaining_requests, 10);
        assert_eq!(decision.next_available_at, 1_000 + WINDOW + 1);
        assert!(log.is_empty());
    }
}
