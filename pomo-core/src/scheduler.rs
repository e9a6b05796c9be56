//! The repeating tick source behind a running countdown.

use std::time::Duration;

/// Something that can fire ticks at a fixed period until told to stop.
///
/// The engine holds at most one handle at a time and gives it back through
/// [`Scheduler::cancel`] on every path out of `Running`.
pub trait Scheduler {
    type Handle;

    fn schedule(&mut self, period: Duration) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    type Handle = S::Handle;

    fn schedule(&mut self, period: Duration) -> Self::Handle {
        (**self).schedule(period)
    }

    fn cancel(&mut self, handle: Self::Handle) {
        (**self).cancel(handle)
    }
}

/// Keeps a ledger of handed-out handles instead of firing anything.
///
/// Used for simulations where ticks are driven by hand.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    next_id: u64,
    live: Vec<u64>,
    scheduled: u64,
    cancelled: u64,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles that were scheduled and never cancelled.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl Scheduler for RecordingScheduler {
    type Handle = u64;

    fn schedule(&mut self, _period: Duration) -> u64 {
        self.next_id += 1;
        self.scheduled += 1;
        self.live.push(self.next_id);
        self.next_id
    }

    fn cancel(&mut self, handle: u64) {
        self.cancelled += 1;
        self.live.retain(|&id| id != handle);
    }
}
