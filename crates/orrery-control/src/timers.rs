//! Cancelable one-shot actions driven by simulation time.
//!
//! Nothing here spawns threads or reads the wall clock. The owning session
//! passes its elapsed time to [`DeferredActions::due`] once per tick, and
//! clears the queue on teardown so that no action fires against a session
//! that no longer exists.

use std::collections::HashMap;
use std::time::Duration;

use orrery_input::{Intent, IntentState};
use tracing::trace;

/// How long a one-shot pulse holds its intent.
pub const PULSE_DURATION: Duration = Duration::from_millis(200);

/// Handle to a scheduled action, used to cancel it.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<A> {
    handle: TimerHandle,
    due: Duration,
    action: A,
}

#[derive(Debug)]
pub struct DeferredActions<A> {
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for DeferredActions<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> DeferredActions<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay` has elapsed after `now`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due: now.saturating_add(delay),
            action,
        });
        handle
    }

    /// Cancel a pending action. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        before != self.pending.len()
    }

    /// Drop every pending action. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Remove and return actions due at `now`, earliest first. Actions due
    /// at the same instant keep their scheduling order.
    pub fn due(&mut self, now: Duration) -> Vec<(TimerHandle, A)> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                fired.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        fired.sort_by_key(|p| (p.due, p.handle.0));
        fired.into_iter().map(|p| (p.handle, p.action)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// One-shot intent pulses (UI buttons that tap turbo or brake).
///
/// A pulse sets its intent and schedules the release. Pulsing the same
/// intent again before the release fires cancels the pending release and
/// schedules a fresh one, so rapid taps always extend the pulse.
#[derive(Debug)]
pub struct IntentPulses {
    duration: Duration,
    timers: DeferredActions<Intent>,
    releases: HashMap<Intent, TimerHandle>,
}

impl Default for IntentPulses {
    fn default() -> Self {
        Self::new(PULSE_DURATION)
    }
}

impl IntentPulses {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            timers: DeferredActions::new(),
            releases: HashMap::new(),
        }
    }

    pub fn pulse(&mut self, intent: Intent, now: Duration, state: &mut IntentState) {
        state.set(intent, true);
        if let Some(previous) = self.releases.remove(&intent) {
            self.timers.cancel(previous);
            trace!(?intent, "Pulse re-armed");
        }
        let handle = self.timers.schedule(now, self.duration, intent);
        self.releases.insert(intent, handle);
    }

    /// Release every pulse whose window has ended. Returns the released
    /// intents.
    pub fn fire_due(&mut self, now: Duration, state: &mut IntentState) -> Vec<Intent> {
        let fired = self.timers.due(now);
        let mut released = Vec::with_capacity(fired.len());
        for (handle, intent) in fired {
            if self.releases.get(&intent) == Some(&handle) {
                self.releases.remove(&intent);
            }
            state.set(intent, false);
            released.push(intent);
        }
        released
    }

    /// Cancel every pending release without touching intent state.
    pub fn clear(&mut self) -> usize {
        self.releases.clear();
        self.timers.clear()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_action_fires_when_due() {
        let mut timers = DeferredActions::new();
        timers.schedule(ms(0), ms(100), "a");
        assert!(timers.due(ms(99)).is_empty());
        let fired = timers.due(ms(100));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, "a");
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut timers = DeferredActions::new();
        let h = timers.schedule(ms(0), ms(10), 1);
        assert!(timers.cancel(h));
        assert!(!timers.cancel(h));
        assert!(timers.due(ms(1000)).is_empty());
    }

    #[test]
    fn test_due_order_is_chronological() {
        let mut timers = DeferredActions::new();
        timers.schedule(ms(0), ms(30), 3);
        timers.schedule(ms(0), ms(10), 1);
        timers.schedule(ms(0), ms(20), 2);
        let order: Vec<_> = timers.due(ms(50)).into_iter().map(|(_, a)| a).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut timers = DeferredActions::new();
        timers.schedule(ms(0), ms(10), ());
        timers.schedule(ms(0), ms(20), ());
        assert_eq!(timers.clear(), 2);
        assert!(timers.due(ms(100)).is_empty());
    }

    #[test]
    fn test_pulse_holds_then_releases() {
        let mut pulses = IntentPulses::default();
        let mut state = IntentState::new();
        pulses.pulse(Intent::Turbo, ms(0), &mut state);
        assert!(state.turbo);
        assert!(pulses.fire_due(ms(199), &mut state).is_empty());
        assert!(state.turbo);
        assert_eq!(pulses.fire_due(ms(200), &mut state), vec![Intent::Turbo]);
        assert!(!state.turbo);
        assert_eq!(pulses.pending(), 0);
    }

    #[test]
    fn test_rapid_repulse_rearms() {
        let mut pulses = IntentPulses::default();
        let mut state = IntentState::new();
        pulses.pulse(Intent::Brake, ms(0), &mut state);
        pulses.pulse(Intent::Brake, ms(150), &mut state);
        assert_eq!(pulses.pending(), 1);
        // The first release was cancelled.
        assert!(pulses.fire_due(ms(200), &mut state).is_empty());
        assert!(state.brake);
        assert_eq!(pulses.fire_due(ms(350), &mut state), vec![Intent::Brake]);
        assert!(!state.brake);
    }

    #[test]
    fn test_clear_cancels_pending_releases() {
        let mut pulses = IntentPulses::default();
        let mut state = IntentState::new();
        pulses.pulse(Intent::Turbo, ms(0), &mut state);
        pulses.pulse(Intent::Forward, ms(0), &mut state);
        assert_eq!(pulses.clear(), 2);
        assert!(pulses.fire_due(ms(1000), &mut state).is_empty());
    }
}
