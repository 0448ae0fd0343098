//! Settings screen: a grid of entry lists, one per catalog setting.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use uploadvalidator_engine::PanelState;
use uploadvalidator_types::{Effect, NoticeLevel};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::components::entry_list::EntryListComponent;

const GRID_COLUMNS: usize = 2;

#[derive(Debug, Default)]
pub struct SettingsComponent;

impl Component for SettingsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            _ => match app.settings.focused_index() {
                Some(index) => EntryListComponent::new(index).handle_key_events(app, key),
                None => Vec::new(),
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [header, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(rect);
        render_header(frame, header, app);

        match app.panel.state() {
            PanelState::Unloaded | PanelState::Loading => {
                let text = Paragraph::new(Span::styled("Loading settings...", app.theme.text_muted_style()));
                frame.render_widget(text, body);
                return;
            }
            PanelState::Empty => {
                let text = Paragraph::new(Span::styled(
                    "The uploadvalidator plugin has no configuration for this project.",
                    app.theme.text_muted_style(),
                ));
                frame.render_widget(text, body);
                return;
            }
            _ => {}
        }

        let count = app.settings.editors.len();
        let rows = count.div_ceil(GRID_COLUMNS);
        let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows.max(1) as u32); rows]).split(body);
        for (row_index, row_area) in row_areas.iter().enumerate() {
            let cells = Layout::horizontal(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS]).split(*row_area);
            for (column, cell) in cells.iter().enumerate() {
                let index = row_index * GRID_COLUMNS + column;
                if index < count {
                    EntryListComponent::new(index).render(frame, *cell, app);
                }
            }
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let repo = app.panel.repo_name().unwrap_or("-");
    let mut spans = vec![
        Span::styled("uploadvalidator ", app.theme.accent_style()),
        Span::styled(repo.to_string(), app.theme.text_primary_style()),
        Span::styled(format!("  {}", app.server_url), app.theme.text_muted_style()),
    ];
    if app.panel.is_dirty() {
        spans.push(Span::styled("  [modified]", app.theme.notice_style(NoticeLevel::Warning)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
