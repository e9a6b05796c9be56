//! Tracks the active mode and gates switching away from a session in progress.

use crate::clock::Clock;
use crate::engine::TimerEngine;
use crate::error::ParseChoiceError;
use crate::mode::Mode;
use crate::scheduler::Scheduler;
use crate::settings::TimerConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// What to do when the user picks another mode while a session is underway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchPolicy {
    /// Drop the session silently.
    Discard,
    /// Ask first; declining leaves everything as it was.
    #[default]
    Confirm,
}

impl FromStr for SwitchPolicy {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(SwitchPolicy::Discard),
            "confirm" => Ok(SwitchPolicy::Confirm),
            _ => Err(ParseChoiceError::new("switch policy", s, "discard, confirm")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    AlreadyActive,
    Switched,
    /// Held until [`ActionSelector::confirm`] or [`ActionSelector::decline`].
    AwaitingConfirmation,
}

#[derive(Debug, Default)]
pub struct ActionSelector {
    active: Mode,
    policy: SwitchPolicy,
    pending: Option<Mode>,
}

impl ActionSelector {
    pub fn new(policy: SwitchPolicy) -> Self {
        Self {
            active: Mode::Work,
            policy,
            pending: None,
        }
    }

    pub fn active(&self) -> Mode {
        self.active
    }

    pub fn policy(&self) -> SwitchPolicy {
        self.policy
    }

    /// The mode waiting on a yes/no answer, if any.
    pub fn pending(&self) -> Option<Mode> {
        self.pending
    }

    pub fn select<S: Scheduler, C: Clock>(
        &mut self,
        mode: Mode,
        engine: &mut TimerEngine<S, C>,
        config: &TimerConfig,
    ) -> SwitchOutcome {
        if mode == self.active {
            self.pending = None;
            return SwitchOutcome::AlreadyActive;
        }
        // An equal duration keeps the countdown going, so there is nothing to lose.
        let resets = config.seconds_for(mode) != engine.total();
        if self.policy == SwitchPolicy::Confirm && resets && engine.has_progress_to_lose() {
            info!(from = %self.active, to = %mode, "mode switch needs confirmation");
            self.pending = Some(mode);
            return SwitchOutcome::AwaitingConfirmation;
        }
        self.switch_to(mode, engine, config);
        SwitchOutcome::Switched
    }

    /// Accepts the pending switch. Returns the mode now active, or `None`
    /// when nothing was pending.
    pub fn confirm<S: Scheduler, C: Clock>(
        &mut self,
        engine: &mut TimerEngine<S, C>,
        config: &TimerConfig,
    ) -> Option<Mode> {
        let mode = self.pending.take()?;
        self.switch_to(mode, engine, config);
        Some(mode)
    }

    /// Drops the pending switch without touching the engine.
    pub fn decline(&mut self) -> Option<Mode> {
        self.pending.take()
    }

    fn switch_to<S: Scheduler, C: Clock>(
        &mut self,
        mode: Mode,
        engine: &mut TimerEngine<S, C>,
        config: &TimerConfig,
    ) {
        info!(from = %self.active, to = %mode, "mode switched");
        self.active = mode;
        self.pending = None;
        engine.apply_mode_or_config_change(config.seconds_for(mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::engine::Phase;
    use crate::scheduler::RecordingScheduler;

    type Engine = TimerEngine<RecordingScheduler, ManualClock>;

    fn setup(policy: SwitchPolicy) -> (ActionSelector, Engine, ManualClock, TimerConfig) {
        let config = TimerConfig::default();
        let clock = ManualClock::default();
        let engine = TimerEngine::with_clock(
            config.seconds_for(Mode::Work),
            RecordingScheduler::new(),
            clock.clone(),
        );
        (ActionSelector::new(policy), engine, clock, config)
    }

    #[test]
    fn test_idle_switch_needs_no_confirmation() {
        let (mut selector, mut engine, _, config) = setup(SwitchPolicy::Confirm);
        let outcome = selector.select(Mode::ShortBreak, &mut engine, &config);
        assert_eq!(outcome, SwitchOutcome::Switched);
        assert_eq!(selector.active(), Mode::ShortBreak);
        assert_eq!(engine.total(), 300);
        assert_eq!(engine.remaining(), 300);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_running_switch_waits_for_answer() {
        let (mut selector, mut engine, clock, config) = setup(SwitchPolicy::Confirm);
        engine.start();
        clock.advance_secs(5);
        engine.tick();

        let outcome = selector.select(Mode::LongBreak, &mut engine, &config);
        assert_eq!(outcome, SwitchOutcome::AwaitingConfirmation);
        assert_eq!(selector.pending(), Some(Mode::LongBreak));
        assert_eq!(selector.active(), Mode::Work);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_declining_leaves_state_untouched() {
        let (mut selector, mut engine, clock, config) = setup(SwitchPolicy::Confirm);
        engine.start();
        clock.advance_secs(5);
        engine.pause();
        let before = engine.snapshot();

        selector.select(Mode::ShortBreak, &mut engine, &config);
        assert_eq!(selector.decline(), Some(Mode::ShortBreak));
        assert_eq!(selector.active(), Mode::Work);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_confirming_discards_progress() {
        let (mut selector, mut engine, clock, config) = setup(SwitchPolicy::Confirm);
        engine.start();
        clock.advance_secs(5);

        selector.select(Mode::ShortBreak, &mut engine, &config);
        assert_eq!(selector.confirm(&mut engine, &config), Some(Mode::ShortBreak));
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.remaining(), 300);
        assert_eq!(engine.scheduler().live(), 0);
        assert_eq!(selector.confirm(&mut engine, &config), None);
    }

    #[test]
    fn test_discard_policy_switches_immediately() {
        let (mut selector, mut engine, clock, config) = setup(SwitchPolicy::Discard);
        engine.start();
        clock.advance_secs(5);

        let outcome = selector.select(Mode::LongBreak, &mut engine, &config);
        assert_eq!(outcome, SwitchOutcome::Switched);
        assert_eq!(engine.total(), 900);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_finished_session_switches_without_prompt() {
        let (mut selector, mut engine, clock, config) = setup(SwitchPolicy::Confirm);
        engine.start();
        clock.advance_secs(1_500);
        engine.tick();
        assert_eq!(engine.phase(), Phase::Finished);

        let outcome = selector.select(Mode::ShortBreak, &mut engine, &config);
        assert_eq!(outcome, SwitchOutcome::Switched);
    }

    #[test]
    fn test_equal_duration_switch_skips_prompt() {
        let (mut selector, mut engine, clock, _) = setup(SwitchPolicy::Confirm);
        let config = TimerConfig::from_minutes(15, 5, 15);
        engine.apply_mode_or_config_change(config.seconds_for(Mode::Work));
        engine.start();
        clock.advance_secs(60);
        engine.tick();

        let outcome = selector.select(Mode::LongBreak, &mut engine, &config);
        assert_eq!(outcome, SwitchOutcome::Switched);
        assert_eq!(selector.pending(), None);
        assert_eq!(selector.active(), Mode::LongBreak);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.remaining(), 840);
    }

    #[test]
    fn test_selecting_active_mode_is_a_no_op() {
        let (mut selector, mut engine, _, config) = setup(SwitchPolicy::Confirm);
        engine.start();
        let outcome = selector.select(Mode::Work, &mut engine, &config);
        assert_eq!(outcome, SwitchOutcome::AlreadyActive);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_policy_parses() {
        assert_eq!("Confirm".parse::<SwitchPolicy>(), Ok(SwitchPolicy::Confirm));
        assert!("ask".parse::<SwitchPolicy>().is_err());
    }
}
