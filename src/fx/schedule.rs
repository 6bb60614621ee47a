//! One-shot timer arena
//!
//! Timers are plain records keyed by a monotonically allocated id. Firing and
//! cancellation both remove the record, so a cancelled timer can never fire.

use std::collections::BTreeMap;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone)]
struct Timer<E> {
    due_ms: f64,
    event: E,
}

/// Fixed-delay one-shot timers carrying an event payload
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    timers: BTreeMap<TimerId, Timer<E>>,
    next_id: u32,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Schedule `event` to fire at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, Timer { due_ms, event });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Remove and return every event due at `now_ms`, ordered by due time then id
    pub fn poll(&mut self, now_ms: f64) -> Vec<E> {
        let mut due: Vec<(f64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .map(|(id, t)| (t.due_ms, *id))
            .collect();
        due.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        due.into_iter()
            .filter_map(|(_, id)| self.timers.remove(&id).map(|t| t.event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300.0, "c");
        s.schedule(100.0, "a");
        s.schedule(100.0, "b");
        s.schedule(900.0, "late");

        assert!(s.poll(50.0).is_empty());
        assert_eq!(s.poll(300.0), ["a", "b", "c"]);
        assert_eq!(s.pending(), 1);
        assert!(s.poll(300.0).is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let a = s.schedule(10.0, 1);
        let b = s.schedule(20.0, 2);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert!(s.is_pending(b));
        assert_eq!(s.poll(100.0), [2]);
        assert!(!s.cancel(b));
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        for i in 0..10 {
            s.schedule(i as f64, i);
        }
        s.cancel_all();
        assert!(s.poll(f64::MAX).is_empty());
    }

    #[test]
    fn test_ids_not_reused() {
        let mut s = Scheduler::new();
        let a = s.schedule(0.0, ());
        s.poll(0.0);
        let b = s.schedule(0.0, ());
        assert_ne!(a, b);
    }
}
