//! Draft copy of the settings while the dialog is open.
//!
//! Edits land in the draft only. The committed [`SettingsStore`] is written
//! in a single assignment on [`SettingsEditor::commit`]; dismissing the
//! dialog throws the draft away.

use crate::mode::Mode;
use crate::settings::{clamp_minutes, AccentColor, Font, Settings, SettingsStore};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increase,
    Decrease,
}

#[derive(Debug, Clone)]
pub struct SettingsEditor {
    draft: Settings,
    opened_from: Settings,
}

impl SettingsEditor {
    pub fn open(store: &SettingsStore) -> Self {
        let snapshot = *store.get();
        Self {
            draft: snapshot,
            opened_from: snapshot,
        }
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.opened_from
    }

    /// Replaces one duration, clamped to the allowed range. Returns the
    /// value that was stored.
    pub fn update_field(&mut self, field: Mode, minutes: u32) -> u32 {
        let minutes = clamp_minutes(minutes);
        self.draft.timer = self.draft.timer.with_minutes(field, minutes);
        minutes
    }

    pub fn increment_field(&mut self, field: Mode, step: Step) -> u32 {
        let current = self.draft.timer.minutes_for(field);
        let next = match step {
            Step::Increase => current.saturating_add(1),
            Step::Decrease => current.saturating_sub(1),
        };
        self.update_field(field, next)
    }

    pub fn set_font(&mut self, font: Font) {
        self.draft.font = font;
    }

    pub fn set_color(&mut self, color: AccentColor) {
        self.draft.color = color;
    }

    pub fn cycle_font(&mut self, forward: bool) -> Font {
        self.draft.font = self.draft.font.cycle(forward);
        self.draft.font
    }

    pub fn cycle_color(&mut self, forward: bool) -> AccentColor {
        self.draft.color = self.draft.color.cycle(forward);
        self.draft.color
    }

    /// Publishes the draft and closes the editor.
    pub fn commit(self, store: &mut SettingsStore) -> Settings {
        store.replace(self.draft);
        self.draft
    }

    /// Closes the editor without publishing anything.
    pub fn cancel(self) {
        debug!(dirty = self.is_dirty(), "settings draft discarded");
    }
}
