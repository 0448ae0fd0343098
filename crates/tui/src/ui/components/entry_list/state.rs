use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};
use uploadvalidator_engine::{EditOutcome, PanelError, SettingsPanel};
use uploadvalidator_types::SettingDescriptor;

use crate::ui::components::common::TextInputState;

/// View state for one setting's entry list: the add input plus row selection.
///
/// The entries themselves live in the engine's editor; this state only
/// tracks what the user is typing and which row is highlighted.
#[derive(Debug)]
pub struct EntryListViewState {
    pub descriptor: &'static SettingDescriptor,
    container: FocusFlag,
    input: TextInputState,
    list_state: ListState,
}

impl EntryListViewState {
    pub fn new(descriptor: &'static SettingDescriptor) -> Self {
        Self {
            descriptor,
            container: FocusFlag::named(descriptor.key),
            input: TextInputState::new(),
            list_state: ListState::default(),
        }
    }

    pub fn setting(&self) -> &'static str {
        self.descriptor.key
    }

    pub fn is_focused(&self) -> bool {
        self.container.get()
    }

    pub fn input(&self) -> &TextInputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TextInputState {
        &mut self.input
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Submits the typed text as a new entry.
    ///
    /// The input is cleared whatever the outcome, so a rejected duplicate
    /// does not linger in the field.
    pub fn submit(&mut self, panel: &mut SettingsPanel) -> Result<EditOutcome, PanelError> {
        let candidate = self.input.take();
        let outcome = panel.add_entry(self.descriptor.key, &candidate)?;
        if let EditOutcome::Changed(change) = &outcome {
            self.list_state.select(Some(change.all_entries.len().saturating_sub(1)));
        }
        Ok(outcome)
    }

    /// Deletes the highlighted row.
    pub fn delete_selected(&mut self, panel: &mut SettingsPanel) -> Result<EditOutcome, PanelError> {
        let Some(position) = self.list_state.selected() else {
            return Ok(EditOutcome::Ignored);
        };
        let outcome = panel.delete_at(self.descriptor.key, position)?;
        if let EditOutcome::Changed(change) = &outcome {
            let remaining = change.all_entries.len();
            self.list_state
                .select((remaining > 0).then(|| position.min(remaining - 1)));
        }
        Ok(outcome)
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let next = self.list_state.selected().map_or(0, |index| (index + 1).min(len - 1));
        self.list_state.select(Some(next));
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let prev = self.list_state.selected().map_or(0, |index| index.saturating_sub(1));
        self.list_state.select(Some(prev.min(len - 1)));
    }

    /// Resets typing and selection, used when a new repository is activated.
    pub fn reset(&mut self) {
        self.input.clear();
        self.list_state.select(None);
    }

    /// Keeps the selection inside `len` rows after the entries were replaced.
    pub fn clamp_selection(&mut self, len: usize) {
        let clamped = self.list_state.selected().filter(|_| len > 0).map(|index| index.min(len - 1));
        self.list_state.select(clamped);
    }
}

impl HasFocus for EntryListViewState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
