//! Repeating interval timers.
//!
//! The gameplay layer runs everything periodic — coin spawns, wolf steps —
//! off a `Scheduler` ticked once per fixed update.  Timers repeat until
//! cancelled; `tick` reports every firing, so a large `dt` can fire the same
//! timer more than once in a single call.

/// Stable handle for a scheduled timer.  Ids are never reused within one
/// `Scheduler`, so a stale handle after `cancel` is harmless.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    interval: f32,
    /// Seconds accumulated toward the next firing.
    elapsed: f32,
}

#[derive(Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u64,
}

impl Scheduler {
    /// Cap on how many times one timer fires per tick.  A huge `dt` (debugger
    /// pause, suspended laptop) should not unleash hundreds of catch-up
    /// firings in one frame.
    const MAX_FIRINGS_PER_TICK: u32 = 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repeating timer.  The first firing happens `interval`
    /// seconds from now.  Non-positive intervals are clamped to a millisecond
    /// so a zero interval cannot spin forever inside `tick`.
    pub fn schedule(&mut self, interval: f32) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            interval: interval.max(0.001),
            elapsed: 0.0,
        });
        id
    }

    /// Remove a timer.  Unknown ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    /// Change a timer's interval and restart its countdown from zero.
    /// Returns false if the id is no longer scheduled.
    pub fn reschedule(&mut self, id: TimerId, interval: f32) -> bool {
        match self.timers.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.interval = interval.max(0.001);
                t.elapsed = 0.0;
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Advance all timers by `dt` seconds and collect every firing, in
    /// registration order.  A timer that lapsed several intervals fires once
    /// per lapsed interval (capped), keeping the average rate right even
    /// when `dt` is larger than the interval.
    pub fn tick(&mut self, dt: f32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for t in &mut self.timers {
            t.elapsed += dt;
            let mut firings = 0;
            while t.elapsed >= t.interval && firings < Self::MAX_FIRINGS_PER_TICK {
                t.elapsed -= t.interval;
                fired.push(t.id);
                firings += 1;
            }
            if firings == Self::MAX_FIRINGS_PER_TICK {
                // Drop the remaining backlog rather than burst-firing later.
                t.elapsed = 0.0;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_does_not_fire_before_interval() {
        let mut s = Scheduler::new();
        let id = s.schedule(1.0);
        assert!(s.tick(0.5).is_empty());
        assert!(s.is_scheduled(id));
    }

    #[test]
    fn timer_fires_after_interval() {
        let mut s = Scheduler::new();
        let id = s.schedule(1.0);
        assert!(s.tick(0.6).is_empty());
        assert_eq!(s.tick(0.6), vec![id]);
    }

    #[test]
    fn timer_repeats() {
        let mut s = Scheduler::new();
        let id = s.schedule(0.5);
        assert_eq!(s.tick(0.5), vec![id]);
        assert_eq!(s.tick(0.5), vec![id]);
        assert_eq!(s.tick(0.5), vec![id]);
    }

    #[test]
    fn large_dt_fires_multiple_times() {
        let mut s = Scheduler::new();
        let id = s.schedule(0.2);
        assert_eq!(s.tick(0.65), vec![id, id, id]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let id = s.schedule(0.1);
        s.cancel(id);
        assert!(s.tick(10.0).is_empty());
        assert!(!s.is_scheduled(id));
    }

    #[test]
    fn reschedule_resets_countdown() {
        let mut s = Scheduler::new();
        let id = s.schedule(1.0);
        s.tick(0.9);
        // Countdown restarts: 0.9 s of credit is discarded.
        assert!(s.reschedule(id, 1.0));
        assert!(s.tick(0.9).is_empty());
        assert_eq!(s.tick(0.2), vec![id]);
    }

    #[test]
    fn reschedule_unknown_id_returns_false() {
        let mut s = Scheduler::new();
        let id = s.schedule(1.0);
        s.cancel(id);
        assert!(!s.reschedule(id, 0.5));
    }

    #[test]
    fn ids_are_unique_across_cancel() {
        let mut s = Scheduler::new();
        let a = s.schedule(1.0);
        s.cancel(a);
        let b = s.schedule(1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn catch_up_is_capped() {
        let mut s = Scheduler::new();
        s.schedule(0.01);
        // 10 s of backlog would be 1000 firings without the cap.
        let fired = s.tick(10.0);
        assert_eq!(fired.len(), 8);
        // Backlog is dropped, not deferred.
        assert!(s.tick(0.005).is_empty());
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut s = Scheduler::new();
        let id = s.schedule(0.0);
        let fired = s.tick(0.002);
        assert!(!fired.is_empty());
        assert!(fired.iter().all(|&f| f == id));
    }

    #[test]
    fn independent_timers_fire_independently() {
        let mut s = Scheduler::new();
        let fast = s.schedule(0.2);
        let slow = s.schedule(1.0);
        assert_eq!(s.tick(0.2), vec![fast]);
        assert_eq!(s.tick(0.8), vec![fast, fast, fast, fast, slow]);
    }
}
