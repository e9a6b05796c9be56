use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use pomo_core::{
    clamp_minutes, AccentColor, Font, Mode, Settings, SoundSettings, SwitchPolicy, TimerConfig,
    MAX_MINUTES, MIN_MINUTES,
};
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Command line flags. Anything given here wins over the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "pomo")]
#[command(about = "A Pomodoro timer for the terminal", version)]
pub struct Cli {
    /// Pomodoro length in minutes (1-60)
    #[arg(short, long)]
    pub work: Option<u32>,

    /// Short break length in minutes (1-60)
    #[arg(short, long)]
    pub short_break: Option<u32>,

    /// Long break length in minutes (1-60)
    #[arg(short, long)]
    pub long_break: Option<u32>,

    /// How often the countdown is recomputed, in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Switching modes mid-session: "confirm" asks first, "discard" does not
    #[arg(long)]
    pub switch_policy: Option<SwitchPolicy>,

    /// Clock font: sans, serif or mono
    #[arg(long)]
    pub font: Option<Font>,

    /// Accent color: red-orange, teal or violet
    #[arg(long)]
    pub color: Option<AccentColor>,

    /// Start with sound turned off
    #[arg(long)]
    pub mute: bool,

    /// Cue volume between 0.0 and 1.0
    #[arg(long)]
    pub volume: Option<f32>,

    /// Skip the desktop notification when a session ends
    #[arg(long)]
    pub no_notify: bool,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub timer: TimerSection,
    pub appearance: AppearanceSection,
    pub sound: SoundSection,
    pub notifications: NotificationSection,
    pub theme: Theme,
    pub icons: Icons,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimerSection {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub tick_ms: u64,
    pub switch_policy: SwitchPolicy,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppearanceSection {
    pub font: Font,
    pub color: AccentColor,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SoundSection {
    pub volume: f32,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationSection {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub surface: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub gray: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub yellow: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub red_orange: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub teal: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub violet: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub play: String,
    pub pause: String,
    pub idle: String,
    pub finished: String,
    pub select: String,
    pub sound_on: String,
    pub sound_off: String,
    pub swatch: String,
    pub input_cursor: String,
    pub separator: String,
    pub header_left: String,
    pub header_right: String,
}

impl Default for TimerSection {
    fn default() -> Self {
        let defaults = TimerConfig::default();
        Self {
            work: defaults.minutes_for(Mode::Work),
            short_break: defaults.minutes_for(Mode::ShortBreak),
            long_break: defaults.minutes_for(Mode::LongBreak),
            tick_ms: pomo_core::DEFAULT_TICK_PERIOD.as_millis() as u64,
            switch_policy: SwitchPolicy::default(),
        }
    }
}

impl Default for SoundSection {
    fn default() -> Self {
        let defaults = SoundSettings::default();
        Self {
            volume: defaults.volume,
            enabled: defaults.enabled,
        }
    }
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(30, 33, 63),
            foreground: Color::Rgb(215, 224, 255),
            surface: Color::Rgb(22, 25, 50),
            gray: Color::Rgb(134, 141, 178),
            yellow: Color::Rgb(196, 178, 138),
            red_orange: Color::Rgb(248, 112, 112),
            teal: Color::Rgb(112, 243, 248),
            violet: Color::Rgb(216, 129, 248),
        }
    }
}

impl Theme {
    pub fn accent(&self, color: AccentColor) -> Color {
        match color {
            AccentColor::RedOrange => self.red_orange,
            AccentColor::Teal => self.teal,
            AccentColor::Violet => self.violet,
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            play: "▶".to_string(),
            pause: "⏸".to_string(),
            idle: "■".to_string(),
            finished: "✔".to_string(),
            select: "▸".to_string(),
            sound_on: "♪".to_string(),
            sound_off: "✕".to_string(),
            swatch: "●".to_string(),
            input_cursor: "▊".to_string(),
            separator: "│".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

impl Config {
    /// Overlays command line flags on top of the file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(work) = cli.work {
            self.timer.work = work;
        }
        if let Some(short_break) = cli.short_break {
            self.timer.short_break = short_break;
        }
        if let Some(long_break) = cli.long_break {
            self.timer.long_break = long_break;
        }
        if let Some(tick_ms) = cli.tick_ms {
            self.timer.tick_ms = tick_ms;
        }
        if let Some(policy) = cli.switch_policy {
            self.timer.switch_policy = policy;
        }
        if let Some(font) = cli.font {
            self.appearance.font = font;
        }
        if let Some(color) = cli.color {
            self.appearance.color = color;
        }
        if let Some(volume) = cli.volume {
            self.sound.volume = volume;
        }
        if cli.mute {
            self.sound.enabled = false;
        }
        if cli.no_notify {
            self.notifications.enabled = false;
        }
    }

    /// Startup settings. Durations outside 1-60 minutes are pulled back in range.
    pub fn settings(&self) -> Settings {
        let requested = [
            (Mode::Work, self.timer.work),
            (Mode::ShortBreak, self.timer.short_break),
            (Mode::LongBreak, self.timer.long_break),
        ];
        let mut timer = TimerConfig::default();
        for (mode, minutes) in requested {
            let used = clamp_minutes(minutes);
            if used != minutes {
                warn!(
                    %mode,
                    requested = minutes,
                    used,
                    "duration must be between {} and {} minutes",
                    MIN_MINUTES,
                    MAX_MINUTES
                );
            }
            timer = timer.with_minutes(mode, used);
        }
        Settings {
            timer,
            font: self.appearance.font,
            color: self.appearance.color,
        }
    }

    pub fn sound_settings(&self) -> SoundSettings {
        SoundSettings {
            volume: self.sound.volume,
            enabled: self.sound.enabled,
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timer.tick_ms)
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pomo", "pomo")
}

/// Reads `pomo.toml` from `path`, or from the platform config dir when no
/// path is given. A missing default file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => match project_dirs() {
            Some(dirs) => {
                let default = dirs.config_dir().join("pomo.toml");
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
            None => return Ok(Config::default()),
        },
    };
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    parse_config(&config_str).with_context(|| format!("Failed to parse config file at {:?}", path))
}

pub fn parse_config(source: &str) -> Result<Config> {
    Ok(toml::from_str(source)?)
}
