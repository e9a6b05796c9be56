//! Sound preferences and the audio cues the app fires.

use crate::engine::TimerEvent;
use tracing::debug;

pub const DEFAULT_VOLUME: f32 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundSettings {
    /// Between 0.0 and 1.0.
    pub volume: f32,
    pub enabled: bool,
}

impl SoundSettings {
    pub fn audible(&self) -> bool {
        self.enabled && self.volume > 0.0
    }
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            enabled: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct SoundSettingsStore {
    current: SoundSettings,
}

impl SoundSettingsStore {
    pub fn new(initial: SoundSettings) -> Self {
        let mut store = Self { current: initial };
        store.set_volume(initial.volume);
        store
    }

    pub fn get(&self) -> &SoundSettings {
        &self.current
    }

    /// Swaps in a whole new snapshot. Volume is clamped like [`set_volume`](Self::set_volume).
    pub fn replace(&mut self, settings: SoundSettings) {
        self.current = settings;
        self.set_volume(settings.volume);
    }

    /// Flips mute and returns the new `enabled` flag.
    pub fn toggle_enabled(&mut self) -> bool {
        self.current.enabled = !self.current.enabled;
        debug!(enabled = self.current.enabled, "sound toggled");
        self.current.enabled
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.current.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Start,
    Pause,
    Finish,
    ModeSwitch,
    OpenSettings,
    CloseSettings,
    SoundOn,
    SoundOff,
}

impl Cue {
    pub fn for_event(event: TimerEvent) -> Option<Cue> {
        match event {
            TimerEvent::Started | TimerEvent::Resumed => Some(Cue::Start),
            TimerEvent::Paused => Some(Cue::Pause),
            TimerEvent::Finished => Some(Cue::Finish),
            TimerEvent::Reset => None,
        }
    }

    /// The mute toggle's own feedback plays regardless of the mute flag.
    pub fn ignores_mute(self) -> bool {
        matches!(self, Cue::SoundOn | Cue::SoundOff)
    }

    pub fn should_play(self, sound: &SoundSettings) -> bool {
        if self.ignores_mute() {
            sound.volume > 0.0
        } else {
            sound.audible()
        }
    }
}

/// Fire-and-forget audio feedback.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue, sound: &SoundSettings);
}
