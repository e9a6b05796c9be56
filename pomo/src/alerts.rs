//! Sound cues and desktop notifications.

use pomo_core::{Cue, CuePlayer, Mode, SoundSettings};
use std::io::{self, Write};
use tracing::{debug, error, warn};

/// Plays cues on the terminal bell.
///
/// The bell has no volume control, so volume only decides between silent
/// and audible.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::Finish => 3,
            Cue::Start | Cue::Pause | Cue::SoundOn => 1,
            Cue::ModeSwitch | Cue::OpenSettings | Cue::CloseSettings | Cue::SoundOff => 0,
        }
    }
}

impl CuePlayer for TerminalBell {
    fn play(&mut self, cue: Cue, sound: &SoundSettings) {
        if !cue.should_play(sound) {
            return;
        }
        debug!(?cue, volume = sound.volume, "cue");
        let rings = Self::rings(cue);
        if rings == 0 {
            return;
        }
        let mut out = io::stdout();
        let result = out
            .write_all("\x07".repeat(rings).as_bytes())
            .and_then(|_| out.flush());
        if let Err(e) = result {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

pub fn notify_finished(mode: Mode) {
    let body = match mode {
        Mode::Work => "Pomodoro finished. Time for a break!",
        Mode::ShortBreak | Mode::LongBreak => "Break is over. Back to work!",
    };
    send_notification("pomo", body);
}

fn send_notification(title: &str, body: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .summary(title)
        .body(body)
        .appname("pomo")
        .show()
    {
        error!("Failed to send notification: {}", e);
    }
}
