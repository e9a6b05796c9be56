use pomo_core::{
    ActionSelector, Cue, CuePlayer, ManualClock, Mode, Phase, RecordingScheduler,
    SettingsEditor, SettingsStore, SoundSettings, SoundSettingsStore, Step, SwitchOutcome,
    SwitchPolicy, TimerEngine, TimerEvent,
};

type Engine = TimerEngine<RecordingScheduler, ManualClock>;

#[derive(Default)]
struct RecordingPlayer {
    played: Vec<Cue>,
}

impl CuePlayer for RecordingPlayer {
    fn play(&mut self, cue: Cue, sound: &SoundSettings) {
        if cue.should_play(sound) {
            self.played.push(cue);
        }
    }
}

fn work_engine(store: &SettingsStore) -> (Engine, ManualClock) {
    let clock = ManualClock::default();
    let engine = TimerEngine::with_clock(
        store.get().timer.seconds_for(Mode::Work),
        RecordingScheduler::new(),
        clock.clone(),
    );
    (engine, clock)
}

#[test]
fn countdown_is_independent_of_tick_rate() {
    let store = SettingsStore::default();
    let (mut fine, fine_clock) = work_engine(&store);
    let (mut coarse, coarse_clock) = work_engine(&store);
    fine.start();
    coarse.start();

    let mut last = fine.remaining();
    for step in 1..=3_000 {
        fine_clock.advance_millis(20);
        fine.tick();
        assert!(fine.remaining() <= last);
        last = fine.remaining();
        assert_eq!(fine.remaining(), 1_500 - (step * 20 / 1_000) as u32);
    }
    for _ in 0..60 {
        coarse_clock.advance_millis(1_000);
        coarse.tick();
    }
    assert_eq!(fine.remaining(), 1_440);
    assert_eq!(coarse.remaining(), fine.remaining());

    // Switching tick rate mid-run keeps both on the same curve.
    for _ in 0..7 {
        fine_clock.advance_millis(1_000);
        fine.tick();
    }
    for _ in 0..350 {
        coarse_clock.advance_millis(20);
        coarse.tick();
    }
    assert_eq!(fine.remaining(), 1_433);
    assert_eq!(coarse.remaining(), 1_433);
}

#[test]
fn pause_and_resume_are_accurate() {
    let store = SettingsStore::default();
    let (mut engine, clock) = work_engine(&store);

    engine.start();
    clock.advance_secs(10);
    engine.tick();
    engine.pause();
    assert_eq!(engine.remaining(), 1_490);

    clock.advance_secs(5);
    engine.start();
    clock.advance_secs(3);
    engine.tick();
    assert_eq!(engine.remaining(), 1_487);
}

#[test]
fn unrelated_setting_change_does_not_reset_running_timer() {
    let mut store = SettingsStore::default();
    let (mut engine, clock) = work_engine(&store);
    let selector = ActionSelector::new(SwitchPolicy::Confirm);
    engine.start();
    clock.advance_secs(42);
    engine.tick();
    let before = engine.snapshot();

    let mut editor = SettingsEditor::open(&store);
    editor.cycle_font(true);
    editor.increment_field(Mode::LongBreak, Step::Increase);
    let committed = editor.commit(&mut store);

    let total = committed.timer.seconds_for(selector.active());
    assert_eq!(engine.apply_mode_or_config_change(total), None);
    assert_eq!(engine.apply_mode_or_config_change(total), None);
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.phase(), Phase::Running);
}

#[test]
fn committing_new_work_length_resets_the_work_timer() {
    let mut store = SettingsStore::default();
    let (mut engine, clock) = work_engine(&store);
    let selector = ActionSelector::new(SwitchPolicy::Confirm);
    engine.start();
    clock.advance_secs(42);

    let mut editor = SettingsEditor::open(&store);
    editor.update_field(Mode::Work, 30);
    let committed = editor.commit(&mut store);

    let event = engine.apply_mode_or_config_change(committed.timer.seconds_for(selector.active()));
    assert_eq!(event, Some(TimerEvent::Reset));
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(engine.remaining(), 1_800);
    assert_eq!(engine.scheduler().live(), 0);
}

#[test]
fn finish_fires_once_with_one_cue() {
    let store = SettingsStore::default();
    let sound = SoundSettingsStore::default();
    let mut player = RecordingPlayer::default();
    let (mut engine, clock) = work_engine(&store);

    if let Some(cue) = engine.start().and_then(Cue::for_event) {
        player.play(cue, sound.get());
    }
    clock.advance_secs(2_000);
    for _ in 0..5 {
        if let Some(cue) = engine.tick().and_then(Cue::for_event) {
            player.play(cue, sound.get());
        }
    }

    assert_eq!(engine.remaining(), 0);
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(player.played, vec![Cue::Start, Cue::Finish]);
}

#[test]
fn muted_session_plays_only_the_toggle_feedback() {
    let store = SettingsStore::default();
    let mut sound = SoundSettingsStore::default();
    let mut player = RecordingPlayer::default();
    let (mut engine, clock) = work_engine(&store);

    sound.toggle_enabled();
    player.play(Cue::SoundOff, sound.get());
    if let Some(cue) = engine.start().and_then(Cue::for_event) {
        player.play(cue, sound.get());
    }
    clock.advance_secs(1_500);
    if let Some(cue) = engine.tick().and_then(Cue::for_event) {
        player.play(cue, sound.get());
    }
    assert_eq!(player.played, vec![Cue::SoundOff]);
}

#[test]
fn progress_ratio_boundaries() {
    let store = SettingsStore::default();
    let (mut engine, clock) = work_engine(&store);
    assert_eq!(engine.progress_ratio(), 100.0);

    engine.start();
    clock.advance_secs(750);
    engine.tick();
    assert_eq!(engine.progress_ratio(), 50.0);

    clock.advance_secs(750);
    engine.tick();
    assert_eq!(engine.progress_ratio(), 0.0);

    let zero = TimerEngine::with_clock(0, RecordingScheduler::new(), ManualClock::default());
    assert_eq!(zero.progress_ratio(), 0.0);
    assert!(zero.progress_ratio().is_finite());
}

#[test]
fn short_break_from_idle_work_needs_no_prompt() {
    let store = SettingsStore::default();
    let (mut engine, _) = work_engine(&store);
    let mut selector = ActionSelector::new(SwitchPolicy::Confirm);

    let outcome = selector.select(Mode::ShortBreak, &mut engine, &store.get().timer);
    assert_eq!(outcome, SwitchOutcome::Switched);
    assert_eq!(engine.total(), 300);
    assert_eq!(engine.remaining(), 300);
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(selector.pending(), None);
}

#[test]
fn no_scheduler_outlives_a_non_running_phase() {
    let mut store = SettingsStore::default();
    let (mut engine, clock) = work_engine(&store);
    let mut selector = ActionSelector::new(SwitchPolicy::Discard);

    engine.start();
    assert_eq!(engine.scheduler().live(), 1);
    engine.pause();
    assert_eq!(engine.scheduler().live(), 0);

    engine.start();
    selector.select(Mode::LongBreak, &mut engine, &store.get().timer);
    assert_eq!(engine.scheduler().live(), 0);

    engine.start();
    let mut editor = SettingsEditor::open(&store);
    editor.update_field(Mode::LongBreak, 20);
    let committed = editor.commit(&mut store);
    engine.apply_mode_or_config_change(committed.timer.seconds_for(selector.active()));
    assert_eq!(engine.scheduler().live(), 0);

    engine.start();
    clock.advance_secs(1_200);
    engine.tick();
    assert_eq!(engine.phase(), Phase::Finished);
    assert_eq!(engine.scheduler().live(), 0);
    assert_eq!(engine.scheduler().scheduled(), engine.scheduler().cancelled());
}
