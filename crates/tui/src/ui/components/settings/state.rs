use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use uploadvalidator_engine::SettingsPanel;
use uploadvalidator_types::SETTINGS;

use crate::ui::components::entry_list::EntryListViewState;

/// View state for the settings screen: one entry list per catalog setting,
/// in catalog order.
#[derive(Debug)]
pub struct SettingsViewState {
    container: FocusFlag,
    pub editors: Vec<EntryListViewState>,
}

impl Default for SettingsViewState {
    fn default() -> Self {
        Self {
            container: FocusFlag::named("settings"),
            editors: SETTINGS.iter().map(EntryListViewState::new).collect(),
        }
    }
}

impl SettingsViewState {
    pub fn focused_index(&self) -> Option<usize> {
        self.editors.iter().position(EntryListViewState::is_focused)
    }

    pub fn focused_mut(&mut self) -> Option<&mut EntryListViewState> {
        self.editors.iter_mut().find(|editor| editor.is_focused())
    }

    pub fn reset(&mut self) {
        self.editors.iter_mut().for_each(EntryListViewState::reset);
    }

    /// Re-aligns row selections after the panel replaced its entries.
    pub fn sync_with(&mut self, panel: &SettingsPanel) {
        for view in &mut self.editors {
            let len = panel
                .editor(view.setting())
                .map_or(0, |row| row.editor.entries().len());
            view.clamp_selection(len);
        }
    }
}

impl HasFocus for SettingsViewState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for editor in &self.editors {
            builder.widget(editor);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
