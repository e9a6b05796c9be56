use crate::error::ParseChoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which countdown is selected. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    #[serde(alias = "pomodoro")]
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortBreak, Mode::LongBreak];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "pomodoro",
            Mode::ShortBreak => "short break",
            Mode::LongBreak => "long break",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Mode::Work => 0,
            Mode::ShortBreak => 1,
            Mode::LongBreak => 2,
        }
    }

    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }

    pub fn prev(self) -> Mode {
        Mode::ALL[(self.index() + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "work" | "pomodoro" => Ok(Mode::Work),
            "short-break" | "short" => Ok(Mode::ShortBreak),
            "long-break" | "long" => Ok(Mode::LongBreak),
            _ => Err(ParseChoiceError::new(
                "mode",
                s,
                "pomodoro, short-break, long-break",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Mode::Work.next(), Mode::ShortBreak);
        assert_eq!(Mode::LongBreak.next(), Mode::Work);
        assert_eq!(Mode::Work.prev(), Mode::LongBreak);
    }

    #[test]
    fn test_parse_accepts_labels_and_names() {
        assert_eq!("pomodoro".parse::<Mode>(), Ok(Mode::Work));
        assert_eq!("short break".parse::<Mode>(), Ok(Mode::ShortBreak));
        assert_eq!("Long_Break".parse::<Mode>(), Ok(Mode::LongBreak));
        assert!("nap".parse::<Mode>().is_err());
    }
}
