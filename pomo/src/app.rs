use crate::alerts;
use crate::config::Config;
use crate::ticker::{AppEvent, TickScheduler};
use crate::ui::UiLayout;
use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pomo_core::{
    format_clock, ActionSelector, Cue, CuePlayer, Mode, SettingsEditor, SettingsStore,
    SoundSettingsStore, Step, SwitchOutcome, TimerEngine, TimerEvent,
};
use ratatui::layout::Rect;
use std::time::Instant;
use tachyonfx::{fx, EffectManager, Motion};
use tracing::info;

pub enum AppMode {
    Normal,
    Settings(SettingsForm),
    ConfirmSwitch,
}

impl AppMode {
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Normal => "TIMER",
            AppMode::Settings(_) => "SETTINGS",
            AppMode::ConfirmSwitch => "CONFIRM",
        }
    }
}

/// A row of the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Duration(Mode),
    Font,
    Color,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Duration(Mode::Work),
        FormField::Duration(Mode::ShortBreak),
        FormField::Duration(Mode::LongBreak),
        FormField::Font,
        FormField::Color,
    ];

    fn position(self) -> usize {
        FormField::ALL.iter().position(|&f| f == self).unwrap_or(0)
    }
}

/// The open settings dialog: the draft plus which row has focus.
pub struct SettingsForm {
    pub editor: SettingsEditor,
    pub focus: FormField,
    pub input_buffer: String,
}

impl SettingsForm {
    fn new(editor: SettingsEditor) -> Self {
        Self {
            editor,
            focus: FormField::ALL[0],
            input_buffer: String::new(),
        }
    }

    fn move_focus(&mut self, down: bool) {
        let len = FormField::ALL.len();
        let pos = self.focus.position();
        let next = if down { (pos + 1) % len } else { (pos + len - 1) % len };
        self.focus = FormField::ALL[next];
        self.input_buffer.clear();
    }

    fn step(&mut self, forward: bool) {
        self.input_buffer.clear();
        match self.focus {
            FormField::Duration(mode) => {
                let step = if forward { Step::Increase } else { Step::Decrease };
                self.editor.increment_field(mode, step);
            }
            FormField::Font => {
                self.editor.cycle_font(forward);
            }
            FormField::Color => {
                self.editor.cycle_color(forward);
            }
        }
    }

    fn type_digit(&mut self, c: char) {
        let FormField::Duration(mode) = self.focus else {
            return;
        };
        if self.input_buffer.len() >= 2 {
            self.input_buffer.clear();
        }
        self.input_buffer.push(c);
        if let Ok(minutes) = self.input_buffer.parse() {
            self.editor.update_field(mode, minutes);
        }
    }

    fn backspace(&mut self) {
        let FormField::Duration(mode) = self.focus else {
            return;
        };
        self.input_buffer.pop();
        if let Ok(minutes) = self.input_buffer.parse() {
            self.editor.update_field(mode, minutes);
        }
    }
}

pub struct App {
    pub settings: SettingsStore,
    pub sound: SoundSettingsStore,
    pub engine: TimerEngine<TickScheduler>,
    pub selector: ActionSelector,
    pub mode: AppMode,
    /// Announces state changes. Written on transitions only, never per tick.
    pub announcement: String,
    pub config: Config,
    pub effect_manager: EffectManager<u32>,
    pub layout: UiLayout,
    pub last_frame: Instant,
    pub should_quit: bool,
    player: Box<dyn CuePlayer>,
}

impl App {
    pub fn new(config: Config, scheduler: TickScheduler, player: Box<dyn CuePlayer>) -> Self {
        let settings = SettingsStore::new(config.settings());
        let sound = SoundSettingsStore::new(config.sound_settings());
        let selector = ActionSelector::new(config.timer.switch_policy);
        let engine = TimerEngine::new(settings.get().timer.seconds_for(selector.active()), scheduler)
            .with_tick_period(config.tick_period());
        Self {
            settings,
            sound,
            engine,
            selector,
            mode: AppMode::Normal,
            announcement: String::from("Ready"),
            config,
            effect_manager: EffectManager::default(),
            layout: UiLayout::default(),
            last_frame: Instant::now(),
            should_quit: false,
            player,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick(generation) => self.handle_tick(generation),
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key)
            }
            AppEvent::Input(_) => {}
        }
    }

    pub fn handle_tick(&mut self, generation: u64) {
        if !self.engine.scheduler().is_current(generation) {
            return;
        }
        if let Some(event) = self.engine.tick() {
            self.on_timer_event(event);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.mode {
            AppMode::Normal => self.handle_normal_key(key.code),
            AppMode::Settings(_) => self.handle_settings_key(key.code),
            AppMode::ConfirmSwitch => self.handle_confirm_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_timer(),
            KeyCode::Char('1') => self.select_mode(Mode::Work),
            KeyCode::Char('2') => self.select_mode(Mode::ShortBreak),
            KeyCode::Char('3') => self.select_mode(Mode::LongBreak),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.select_mode(self.selector.active().next())
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.select_mode(self.selector.active().prev())
            }
            KeyCode::Char('s') => self.open_settings(),
            KeyCode::Char('m') => self.toggle_sound(),
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.close_settings(false),
            KeyCode::Enter => self.close_settings(true),
            _ => {
                let AppMode::Settings(form) = &mut self.mode else {
                    return;
                };
                match code {
                    KeyCode::Up | KeyCode::Char('k') => form.move_focus(false),
                    KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => form.move_focus(true),
                    KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => form.step(false),
                    KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => form.step(true),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Char(c) if c.is_ascii_digit() => form.type_digit(c),
                    _ => {}
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let timer = self.settings.get().timer;
                if let Some(mode) = self.selector.confirm(&mut self.engine, &timer) {
                    self.on_mode_switched(mode);
                }
                self.mode = AppMode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.selector.decline();
                self.announce(format!("Kept {} session", self.selector.active()));
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
    }

    pub fn toggle_timer(&mut self) {
        if let Some(event) = self.engine.toggle() {
            self.on_timer_event(event);
        }
    }

    pub fn select_mode(&mut self, mode: Mode) {
        let timer = self.settings.get().timer;
        match self.selector.select(mode, &mut self.engine, &timer) {
            SwitchOutcome::AlreadyActive => {}
            SwitchOutcome::Switched => self.on_mode_switched(mode),
            SwitchOutcome::AwaitingConfirmation => {
                self.announce(format!(
                    "Switch to {}? The current session will be lost",
                    mode
                ));
                self.mode = AppMode::ConfirmSwitch;
            }
        }
    }

    pub fn open_settings(&mut self) {
        self.play(Cue::OpenSettings);
        self.mode = AppMode::Settings(SettingsForm::new(SettingsEditor::open(&self.settings)));
    }

    /// Closes the dialog, publishing the draft when `apply` is set.
    pub fn close_settings(&mut self, apply: bool) {
        let AppMode::Settings(form) = std::mem::replace(&mut self.mode, AppMode::Normal) else {
            return;
        };
        self.play(Cue::CloseSettings);
        if !apply {
            form.editor.cancel();
            return;
        }
        let committed = form.editor.commit(&mut self.settings);
        let total = committed.timer.seconds_for(self.selector.active());
        match self.engine.apply_mode_or_config_change(total) {
            Some(event) => self.on_timer_event(event),
            None => self.announce("Settings applied".to_string()),
        }
    }

    pub fn toggle_sound(&mut self) {
        let enabled = self.sound.toggle_enabled();
        self.play(if enabled { Cue::SoundOn } else { Cue::SoundOff });
        self.announce(if enabled { "Sound on" } else { "Sound off" }.to_string());
    }

    fn on_mode_switched(&mut self, mode: Mode) {
        self.play(Cue::ModeSwitch);
        self.announce(format!(
            "{} selected, {}",
            mode,
            format_clock(self.engine.remaining())
        ));
        self.trigger_mode_change_effect(self.layout.tabs);
    }

    fn on_timer_event(&mut self, event: TimerEvent) {
        if let Some(cue) = Cue::for_event(event) {
            self.play(cue);
        }
        let mode = self.selector.active();
        let message = match event {
            TimerEvent::Started => format!("{} started", mode),
            TimerEvent::Resumed => format!("{} resumed", mode),
            TimerEvent::Paused => {
                format!("{} paused at {}", mode, format_clock(self.engine.remaining()))
            }
            TimerEvent::Finished => {
                format!("{} finished at {}", mode, Local::now().format("%H:%M"))
            }
            TimerEvent::Reset => {
                format!("{} reset to {}", mode, format_clock(self.engine.remaining()))
            }
        };
        self.announce(message);
        if event == TimerEvent::Finished {
            if self.config.notifications.enabled {
                alerts::notify_finished(mode);
            }
            self.trigger_finish_effect(self.layout.clock);
        }
    }

    fn announce(&mut self, message: String) {
        info!("{}", message);
        self.announcement = message;
    }

    fn play(&mut self, cue: Cue) {
        self.player.play(cue, self.sound.get());
    }

    pub fn trigger_mode_change_effect(&mut self, area: Rect) {
        let accent = self.config.theme.accent(self.settings.get().color);
        let effect = fx::slide_in(Motion::LeftToRight, 8, 4, accent, 300).with_area(area);
        self.effect_manager.add_effect(effect);
    }

    pub fn trigger_finish_effect(&mut self, area: Rect) {
        let accent = self.config.theme.accent(self.settings.get().color);
        self.effect_manager
            .add_effect(fx::fade_to_fg(accent, 800).with_area(area));
    }
}
