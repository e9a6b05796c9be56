//! Event plumbing for the main loop: terminal input and countdown ticks both
//! arrive on one channel and are handled in order on a single task.

use crossterm::event::{self, Event};
use pomo_core::Scheduler;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    /// Carries the generation of the run that produced it.
    Tick(u64),
}

pub fn channel() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
    mpsc::unbounded_channel()
}

/// Forwards terminal input from a dedicated thread until the receiver is gone.
pub fn spawn_input_reader(tx: UnboundedSender<AppEvent>) {
    thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(Duration::from_millis(250)) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(AppEvent::Input(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Error reading terminal input: {}", e);
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                error!("Error polling terminal input: {}", e);
                break;
            }
        }
    });
}

pub struct TickHandle {
    generation: u64,
    task: JoinHandle<()>,
}

/// Spawns one interval task per run.
///
/// Aborting the task stops new ticks, but a tick may already be queued; the
/// generation check in [`TickScheduler::is_current`] drops those.
pub struct TickScheduler {
    tx: UnboundedSender<AppEvent>,
    next_generation: u64,
    live: Option<u64>,
}

impl TickScheduler {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            tx,
            next_generation: 0,
            live: None,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.live == Some(generation)
    }
}

impl Scheduler for TickScheduler {
    type Handle = TickHandle;

    fn schedule(&mut self, period: Duration) -> TickHandle {
        self.next_generation += 1;
        let generation = self.next_generation;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick(generation)).is_err() {
                    break;
                }
            }
        });
        debug!(generation, ?period, "tick task spawned");
        self.live = Some(generation);
        TickHandle { generation, task }
    }

    fn cancel(&mut self, handle: TickHandle) {
        handle.task.abort();
        if self.live == Some(handle.generation) {
            self.live = None;
        }
        debug!(generation = handle.generation, "tick task cancelled");
    }
}
