//! Virtual game clock
//!
//! Drives an [`Engine`] the way the browser's `setInterval`/`setTimeout` pair
//! would: one tick per interval while the round clock runs, plus one-shot
//! flip-back timers. Used by the headless runner and the tests.

use super::engine::{Engine, FlipBackTimer, RevealOutcome};
use super::state::TimerHandle;
use crate::persistence::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTimer {
    handle: TimerHandle,
    due_ms: u64,
}

/// Millisecond virtual clock with a tick accumulator and one-shot timers
#[derive(Debug, Clone)]
pub struct GameClock {
    now_ms: u64,
    tick_interval_ms: u64,
    /// Time since the last tick; only grows while the round clock runs
    accumulator_ms: u64,
    /// Deal the accumulator belongs to
    round: u64,
    timers: Vec<ScheduledTimer>,
}

enum Due {
    Timer(usize),
    Tick,
}

impl GameClock {
    pub fn new(tick_interval_ms: u32) -> Self {
        Self {
            now_ms: 0,
            tick_interval_ms: u64::from(tick_interval_ms.max(1)),
            accumulator_ms: 0,
            round: 0,
            timers: Vec::new(),
        }
    }

    /// Milliseconds since the clock was created
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm a one-shot timer
    pub fn schedule(&mut self, timer: FlipBackTimer) {
        self.timers.push(ScheduledTimer {
            handle: timer.handle,
            due_ms: self.now_ms + u64::from(timer.delay_ms),
        });
    }

    /// Arm whatever timer a reveal asked for
    pub fn arm(&mut self, outcome: &RevealOutcome) {
        if let RevealOutcome::Mismatched(timer) = outcome {
            self.schedule(*timer);
        }
    }

    /// Disarm a timer; false if it was not pending
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Advance time by `dt_ms`, delivering due timers and ticks in order
    ///
    /// Timers fire before a tick due at the same instant. Returns the number
    /// of ticks delivered.
    pub fn advance<S: KeyValueStore>(&mut self, engine: &mut Engine<S>, dt_ms: u64) -> u32 {
        let target = self.now_ms + dt_ms;
        let mut ticks = 0;

        loop {
            // A new deal may have started since the last call
            if !engine.clock_running() || self.round != engine.round() {
                self.accumulator_ms = 0;
                self.round = engine.round();
            }

            let next_timer = self
                .timers
                .iter()
                .enumerate()
                .min_by_key(|(_, t)| t.due_ms)
                .map(|(i, t)| (t.due_ms, Due::Timer(i)));
            let next_tick = engine
                .clock_running()
                .then(|| (self.now_ms + self.tick_interval_ms - self.accumulator_ms, Due::Tick));

            let next = match (next_timer, next_tick) {
                (Some(timer), Some(tick)) => Some(if timer.0 <= tick.0 { timer } else { tick }),
                (timer, tick) => timer.or(tick),
            };
            let Some((due_ms, due)) = next.filter(|(due_ms, _)| *due_ms <= target) else {
                break;
            };

            self.step_to(engine, due_ms);
            match due {
                Due::Timer(index) => {
                    let timer = self.timers.swap_remove(index);
                    engine.resolve_mismatch(timer.handle);
                }
                Due::Tick => {
                    self.accumulator_ms = 0;
                    engine.tick();
                    ticks += 1;
                }
            }
        }

        self.step_to(engine, target);
        ticks
    }

    fn step_to<S: KeyValueStore>(&mut self, engine: &Engine<S>, time_ms: u64) {
        if engine.clock_running() {
            self.accumulator_ms += time_ms - self.now_ms;
        }
        self.now_ms = time_ms;
    }
}
