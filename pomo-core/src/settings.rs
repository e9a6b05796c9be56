//! User-configured durations and appearance.

use crate::error::ParseChoiceError;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 60;

pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}

/// Session lengths in seconds, one per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub work_seconds: u32,
    pub short_break_seconds: u32,
    pub long_break_seconds: u32,
}

impl TimerConfig {
    pub fn from_minutes(work: u32, short_break: u32, long_break: u32) -> Self {
        Self {
            work_seconds: work.saturating_mul(60),
            short_break_seconds: short_break.saturating_mul(60),
            long_break_seconds: long_break.saturating_mul(60),
        }
    }

    pub fn seconds_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_seconds,
            Mode::ShortBreak => self.short_break_seconds,
            Mode::LongBreak => self.long_break_seconds,
        }
    }

    pub fn minutes_for(&self, mode: Mode) -> u32 {
        self.seconds_for(mode) / 60
    }

    pub fn with_minutes(mut self, mode: Mode, minutes: u32) -> Self {
        let seconds = minutes.saturating_mul(60);
        match mode {
            Mode::Work => self.work_seconds = seconds,
            Mode::ShortBreak => self.short_break_seconds = seconds,
            Mode::LongBreak => self.long_break_seconds = seconds,
        }
        self
    }

    /// Pulls every duration back into `[MIN_MINUTES, MAX_MINUTES]`.
    pub fn clamped(self) -> Self {
        Mode::ALL.into_iter().fold(self, |config, mode| {
            config.with_minutes(mode, clamp_minutes(config.minutes_for(mode)))
        })
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Font {
    #[default]
    Sans,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentColor {
    #[default]
    RedOrange,
    Teal,
    Violet,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Sans, Font::Serif, Font::Mono];

    pub fn name(self) -> &'static str {
        match self {
            Font::Sans => "sans",
            Font::Serif => "serif",
            Font::Mono => "mono",
        }
    }

    pub fn cycle(self, forward: bool) -> Font {
        cycle(&Font::ALL, self, forward)
    }
}

impl AccentColor {
    pub const ALL: [AccentColor; 3] = [AccentColor::RedOrange, AccentColor::Teal, AccentColor::Violet];

    pub fn name(self) -> &'static str {
        match self {
            AccentColor::RedOrange => "red-orange",
            AccentColor::Teal => "teal",
            AccentColor::Violet => "violet",
        }
    }

    pub fn cycle(self, forward: bool) -> AccentColor {
        cycle(&AccentColor::ALL, self, forward)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|&c| c == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Font {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Font::ALL
            .into_iter()
            .find(|font| font.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseChoiceError::new("font", s, "sans, serif, mono"))
    }
}

impl FromStr for AccentColor {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccentColor::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseChoiceError::new("color", s, "red-orange, teal, violet"))
    }
}

/// Everything the settings dialog edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub timer: TimerConfig,
    pub font: Font,
    pub color: AccentColor,
}

/// The committed settings every other component reads from.
///
/// Only ever replaced as a whole.
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: Settings,
    revision: u64,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            current: initial,
            revision: 0,
        }
    }

    pub fn get(&self) -> &Settings {
        &self.current
    }

    /// Bumped on every [`replace`](Self::replace).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace(&mut self, settings: Settings) {
        self.current = settings;
        self.revision += 1;
        info!(
            revision = self.revision,
            work = settings.timer.minutes_for(Mode::Work),
            short_break = settings.timer.minutes_for(Mode::ShortBreak),
            long_break = settings.timer.minutes_for(Mode::LongBreak),
            font = %settings.font,
            color = %settings.color,
            "settings committed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let config = TimerConfig::default();
        assert_eq!(config.seconds_for(Mode::Work), 1_500);
        assert_eq!(config.seconds_for(Mode::ShortBreak), 300);
        assert_eq!(config.seconds_for(Mode::LongBreak), 900);
    }

    #[test]
    fn test_clamped_pulls_values_into_range() {
        let config = TimerConfig::from_minutes(0, 90, 15).clamped();
        assert_eq!(config.minutes_for(Mode::Work), MIN_MINUTES);
        assert_eq!(config.minutes_for(Mode::ShortBreak), MAX_MINUTES);
        assert_eq!(config.minutes_for(Mode::LongBreak), 15);
    }

    #[test]
    fn test_huge_minutes_saturate_instead_of_wrapping() {
        let config = TimerConfig::from_minutes(u32::MAX, 5, 15);
        assert_eq!(config.seconds_for(Mode::Work), u32::MAX);
        assert_eq!(config.clamped().minutes_for(Mode::Work), MAX_MINUTES);
        let edited = TimerConfig::default().with_minutes(Mode::LongBreak, 100_000_000);
        assert_eq!(edited.clamped().minutes_for(Mode::LongBreak), MAX_MINUTES);
    }

    #[test]
    fn test_choice_names_round_trip_through_parse() {
        for font in Font::ALL {
            assert_eq!(font.name().parse::<Font>(), Ok(font));
        }
        assert_eq!("Red-Orange".parse::<AccentColor>(), Ok(AccentColor::RedOrange));
        assert!("green".parse::<AccentColor>().is_err());
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        assert_eq!(Font::Mono.cycle(true), Font::Sans);
        assert_eq!(Font::Sans.cycle(false), Font::Mono);
        assert_eq!(AccentColor::Teal.cycle(true), AccentColor::Violet);
    }

    #[test]
    fn test_replace_bumps_revision() {
        let mut store = SettingsStore::default();
        let mut next = *store.get();
        next.color = AccentColor::Teal;
        store.replace(next);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.get().color, AccentColor::Teal);
    }
}
