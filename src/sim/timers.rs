//! Deferred effects
//!
//! Timers run on the game clock. Each scheduled effect gets a token that can
//! cancel it; clearing the scheduler drops every pending effect at once.

/// Cancellation token for a scheduled effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Effects that can be deferred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Clear the feedback message shown with this timer
    ClearMessage,
    /// Flip to game over after a life-depleting event
    EndGame,
    /// Resolve classification after an auto-jump has started
    Classify,
    /// Move the tutorial on after its goal was met
    AdvanceTutorial,
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    due: f64,
    effect: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `effect` to fire `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f64, effect: Deferred) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Scheduled {
            id,
            due: now + delay.max(0.0),
            effect,
        });
        id
    }

    /// Cancel a pending effect; false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Remove and return every effect due at `now`, earliest first
    pub fn take_due(&mut self, now: f64) -> Vec<(TimerId, Deferred)> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|s| (s.id, s.effect)).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1.0, 2.0, Deferred::ClearMessage);
        assert!(scheduler.take_due(2.9).is_empty());
        assert_eq!(scheduler.take_due(3.0), vec![(id, Deferred::ClearMessage)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(0.0, 0.1, Deferred::EndGame);
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.take_due(10.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(0.0, 2.0, Deferred::ClearMessage);
        let early = scheduler.schedule(0.0, 0.01, Deferred::Classify);
        let same = scheduler.schedule(0.0, 2.0, Deferred::AdvanceTutorial);
        let fired: Vec<TimerId> = scheduler.take_due(5.0).into_iter().map(|(id, _)| id).collect();
        assert_eq!(fired, vec![early, late, same]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 1.0, Deferred::ClearMessage);
        scheduler.schedule(0.0, 1.0, Deferred::EndGame);
        assert_eq!(scheduler.len(), 2);
        scheduler.clear();
        assert!(scheduler.take_due(100.0).is_empty());
    }

    #[test]
    fn test_ids_unique_after_clear() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(0.0, 1.0, Deferred::ClearMessage);
        scheduler.clear();
        let b = scheduler.schedule(0.0, 1.0, Deferred::ClearMessage);
        assert_ne!(a, b);
    }
}
