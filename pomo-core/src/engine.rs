//! The countdown state machine.
//!
//! Remaining time is always derived from the wall clock as
//! `baseline - floor((now - run_start) / 1s)`, never by counting ticks, so a
//! late, early, or doubled tick cannot make the clock drift.

use crate::clock::{elapsed_whole_seconds, Clock, SystemClock};
use crate::format::progress_ratio;
use crate::scheduler::Scheduler;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(20);
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(10);
pub const MAX_TICK_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

/// A transition the engine actually went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Started,
    Resumed,
    Paused,
    Finished,
    Reset,
}

/// Point-in-time copy of the engine's state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub paused_remainder: u32,
}

pub struct TimerEngine<S: Scheduler, C: Clock = SystemClock> {
    total_seconds: u32,
    remaining_seconds: u32,
    run_start: Option<DateTime<Utc>>,
    paused_remainder: Option<u32>,
    phase: Phase,
    tick_period: Duration,
    run: Option<S::Handle>,
    scheduler: S,
    clock: C,
}

impl<S: Scheduler> TimerEngine<S, SystemClock> {
    pub fn new(total_seconds: u32, scheduler: S) -> Self {
        Self::with_clock(total_seconds, scheduler, SystemClock)
    }
}

impl<S: Scheduler, C: Clock> TimerEngine<S, C> {
    pub fn with_clock(total_seconds: u32, scheduler: S, clock: C) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            run_start: None,
            paused_remainder: None,
            phase: Phase::Idle,
            tick_period: DEFAULT_TICK_PERIOD,
            run: None,
            scheduler,
            clock,
        }
    }

    /// Sets how often the scheduler should call [`tick`](Self::tick).
    /// Takes effect from the next run.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period.clamp(MIN_TICK_PERIOD, MAX_TICK_PERIOD);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn paused_remainder(&self) -> u32 {
        self.paused_remainder.unwrap_or(0)
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn is_timing(&self) -> bool {
        self.phase == Phase::Running
    }

    /// True when switching away would throw away a session in progress.
    pub fn has_progress_to_lose(&self) -> bool {
        match self.phase {
            Phase::Running => true,
            Phase::Finished => false,
            Phase::Idle | Phase::Paused => self.remaining_seconds < self.total_seconds,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            paused_remainder: self.paused_remainder(),
        }
    }

    /// Percentage of the current session left, 100 at the start and 0 at the end.
    pub fn progress_ratio(&self) -> f64 {
        progress_ratio(self.remaining_seconds, self.total_seconds)
    }

    /// Begins counting from `Idle`, or picks up where a pause left off.
    pub fn start(&mut self) -> Option<TimerEvent> {
        if self.run.is_some() {
            return None;
        }
        let event = match self.phase {
            Phase::Idle => TimerEvent::Started,
            Phase::Paused => TimerEvent::Resumed,
            Phase::Running | Phase::Finished => return None,
        };
        self.run_start = Some(self.clock.now());
        self.run = Some(self.scheduler.schedule(self.tick_period));
        self.phase = Phase::Running;
        info!(baseline = self.baseline(), ?event, "countdown running");
        Some(event)
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        if self.recompute() == 0 {
            self.finish();
            return Some(TimerEvent::Finished);
        }
        self.cancel_run();
        self.run_start = None;
        self.paused_remainder = Some(self.remaining_seconds);
        self.phase = Phase::Paused;
        info!(remaining = self.remaining_seconds, "countdown paused");
        Some(TimerEvent::Paused)
    }

    /// Recomputes remaining time from the clock.
    ///
    /// Returns `Finished` on the one tick that reaches zero; every later call
    /// is a no-op because the engine has left `Running`.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        let before = self.remaining_seconds;
        let now = self.recompute();
        if now != before {
            debug!(remaining = now, "tick");
        }
        if now == 0 {
            self.finish();
            return Some(TimerEvent::Finished);
        }
        None
    }

    /// Starts, pauses, or restarts depending on the phase. This is the
    /// single start/pause control.
    pub fn toggle(&mut self) -> Option<TimerEvent> {
        match self.phase {
            Phase::Idle | Phase::Paused => self.start(),
            Phase::Running => self.pause(),
            Phase::Finished => self.restart(),
        }
    }

    /// Throws away the current run and counts down the full duration again.
    pub fn restart(&mut self) -> Option<TimerEvent> {
        self.reset_to(self.total_seconds);
        self.start()
    }

    /// Reconciles the engine with a new duration for the active mode.
    ///
    /// Only an actual change resets the countdown; re-applying the same value
    /// leaves a running session alone.
    pub fn apply_mode_or_config_change(&mut self, new_total_seconds: u32) -> Option<TimerEvent> {
        if new_total_seconds == self.total_seconds {
            return None;
        }
        info!(
            from = self.total_seconds,
            to = new_total_seconds,
            "duration changed, resetting countdown"
        );
        self.reset_to(new_total_seconds);
        Some(TimerEvent::Reset)
    }

    fn baseline(&self) -> u32 {
        self.paused_remainder.unwrap_or(self.total_seconds)
    }

    fn recompute(&mut self) -> u32 {
        if let Some(started) = self.run_start {
            let elapsed = elapsed_whole_seconds(started, self.clock.now());
            let remaining = self.baseline().saturating_sub(elapsed);
            self.remaining_seconds = remaining.min(self.remaining_seconds);
        }
        self.remaining_seconds
    }

    fn finish(&mut self) {
        self.cancel_run();
        self.run_start = None;
        self.paused_remainder = None;
        self.remaining_seconds = 0;
        self.phase = Phase::Finished;
        info!(total = self.total_seconds, "countdown finished");
    }

    fn reset_to(&mut self, total_seconds: u32) {
        self.cancel_run();
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
        self.run_start = None;
        self.paused_remainder = None;
        self.phase = Phase::Idle;
    }

    fn cancel_run(&mut self) {
        if let Some(handle) = self.run.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: Scheduler, C: Clock> Drop for TimerEngine<S, C> {
    fn drop(&mut self) {
        self.cancel_run();
    }
}
