//! Renders one setting's entry list and routes editing keys to it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};
use uploadvalidator_types::Effect;

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme;

/// Component bound to the editor at `index` in the settings view.
#[derive(Debug, Clone, Copy)]
pub struct EntryListComponent {
    index: usize,
}

impl EntryListComponent {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Component for EntryListComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(setting) = app.settings.editors.get(self.index).map(|view| view.setting()) else {
            return Vec::new();
        };
        let len = app.entry_count(setting);
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        let input_empty = app.settings.editors[self.index].input().is_empty();

        match key.code {
            KeyCode::Enter => return app.submit_focused(),
            KeyCode::Char('d') if control => return app.delete_focused(),
            KeyCode::Delete if input_empty => return app.delete_focused(),
            _ => {}
        }

        let view = &mut app.settings.editors[self.index];
        match key.code {
            KeyCode::Delete => view.input_mut().delete(),
            KeyCode::Char(c) if !control => view.input_mut().insert_char(c),
            KeyCode::Backspace => view.input_mut().backspace(),
            KeyCode::Left => view.input_mut().move_left(),
            KeyCode::Right => view.input_mut().move_right(),
            KeyCode::Home => view.input_mut().move_home(),
            KeyCode::End => view.input_mut().move_end(),
            KeyCode::Up => view.select_prev(len),
            KeyCode::Down => view.select_next(len),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(view) = app.settings.editors.get_mut(self.index) else {
            return;
        };
        let Some(row) = app.panel.editor(view.descriptor.key) else {
            return;
        };
        let theme = app.theme.as_ref();
        let focused = view.is_focused();
        let disabled = row.editor.is_disabled();

        let title = match (disabled, row.populated) {
            (true, _) => format!("{} (locked)", view.descriptor.display_name),
            (false, false) => format!("{} (not set)", view.descriptor.display_name),
            (false, true) => view.descriptor.display_name.to_string(),
        };
        let block = theme::block(theme, Some(&title), focused);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [list_area, input_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let entry_style = if disabled {
            theme.text_muted_style()
        } else {
            theme.text_primary_style()
        };
        let items: Vec<ListItem> = row
            .editor
            .entries()
            .iter()
            .map(|entry| ListItem::new(Span::styled(entry.clone(), entry_style)))
            .collect();
        let list = if items.is_empty() {
            List::new(vec![ListItem::new(Span::styled("no entries", theme.text_muted_style()))])
        } else {
            List::new(items)
                .highlight_style(theme.selection_style())
                .highlight_symbol("> ")
        };
        frame.render_stateful_widget(list, list_area, view.list_state_mut());

        if disabled {
            return;
        }
        let prompt = Span::styled("+ ", theme.accent_style());
        let text = if view.input().is_empty() && !focused {
            Span::styled("type a value, Enter to add", theme.text_muted_style())
        } else {
            Span::styled(view.input().input().to_string(), theme.text_primary_style())
        };
        frame.render_widget(Paragraph::new(Line::from(vec![prompt, text])), input_area);
        if focused {
            let x = input_area.x.saturating_add(2).saturating_add(view.input().cursor_columns());
            frame.set_cursor_position((x.min(input_area.right().saturating_sub(1)), input_area.y));
        }
    }
}
