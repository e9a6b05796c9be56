//! Timer core shared by the pomo front-end.
//!
//! Nothing in here touches the terminal. Time comes in through a [`Clock`],
//! ticks are requested from a [`Scheduler`], and sound goes out through a
//! [`CuePlayer`], so every piece can be driven by hand.

pub mod clock;
pub mod editor;
pub mod engine;
pub mod error;
pub mod format;
pub mod mode;
pub mod scheduler;
pub mod selector;
pub mod settings;
pub mod sound;

pub use clock::{Clock, ManualClock, SystemClock};
pub use editor::{SettingsEditor, Step};
pub use engine::{Phase, TimerEngine, TimerEvent, TimerSnapshot, DEFAULT_TICK_PERIOD};
pub use error::ParseChoiceError;
pub use format::{format_clock, progress_ratio};
pub use mode::Mode;
pub use scheduler::{RecordingScheduler, Scheduler};
pub use selector::{ActionSelector, SwitchOutcome, SwitchPolicy};
pub use settings::{
    clamp_minutes, AccentColor, Font, Settings, SettingsStore, TimerConfig, MAX_MINUTES,
    MIN_MINUTES,
};
pub use sound::{Cue, CuePlayer, SoundSettings, SoundSettingsStore};
